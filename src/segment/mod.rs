//! POSIX shared memory segment lifecycle
//!
//! One `Segment` handle per process per named OS object. The handle that
//! created the object owns its lifecycle and is the only one allowed to
//! unlink it; attaching handles come and go without affecting the object.

pub mod handle;

pub use handle::{unlink, Segment};
