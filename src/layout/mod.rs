//! Schema-driven layout compilation
//!
//! A declarative schema document (segment name, scalar entries, array
//! entries) compiles into a `LayoutSpec`: an ordered list of field
//! descriptors with byte-exact offsets and a total segment size. The same
//! schema always compiles to the same layout, which is what lets two
//! independent processes agree on offsets without a runtime handshake.

pub mod compiler;
pub mod descriptor;
pub mod schema;

pub use compiler::LayoutSpec;
pub use descriptor::FieldDescriptor;
pub use schema::{ArrayEntry, ScalarEntry, SchemaDocument};
