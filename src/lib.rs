//! # Seurat - Schema-Driven Shared Memory Layout Compiler
//!
//! Seurat lets two independently-built processes share a single POSIX
//! shared memory segment with a declarative schema as the single source of
//! truth for both sides' layout: a dynamic side using this crate's typed
//! views, and a statically compiled side using a generated C++ header.
//!
//! ## Features
//!
//! - **Layout compilation**: byte-exact offsets from a JSON schema
//!   (scalars first, then arrays, packed with no padding)
//! - **Segment lifecycle**: create-or-replace vs. attach semantics with
//!   explicit ownership of OS object teardown
//! - **Zero-copy typed views**: name-keyed, shape- and type-checked
//!   windows over the segment
//! - **Cross-language codegen**: deterministic C++ header with
//!   compile-time `field_info<Tag>` offset lookup
//! - **No runtime negotiation**: both sides derive the same layout from
//!   the same schema; the only shared state is the named OS object
//!
//! ## Architecture
//!
//! ```text
//!              ┌────────────────────────────┐
//!              │       schema (JSON)        │
//!              └─────────────┬──────────────┘
//!                            ▼
//!              ┌────────────────────────────┐
//!              │   Layout Compiler          │
//!              │   (offsets, total size)    │
//!              └──────┬──────────┬──────────┘
//!                     │          │
//!            ▼────────┘          └────────▼
//! ┌─────────────────────┐    ┌─────────────────────┐
//! │ Segment + ViewMap   │    │ C++ Header Codegen  │
//! │ (this process)      │    │ (static process)    │
//! └─────────────────────┘    └─────────────────────┘
//! ```
//!
//! The segment itself carries no locks and no versioning: concurrent
//! access discipline is a contract between the collaborating processes.

// Core modules
pub mod allocator;
pub mod codegen;
pub mod error;
pub mod layout;
pub mod registry;
pub mod segment;
pub mod views;

// Main API re-exports
pub use allocator::SharedMemoryAllocator;
pub use codegen::{write_header, CppHeaderGenerator};
pub use error::{Result, SeuratError};
pub use layout::{ArrayEntry, FieldDescriptor, LayoutSpec, ScalarEntry, SchemaDocument};
pub use registry::{Element, ElementType, NumericKind};
pub use segment::Segment;
pub use views::{FieldView, ViewMap};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const VERSION_MAJOR: u32 = 0;
pub const VERSION_MINOR: u32 = 2;
pub const VERSION_PATCH: u32 = 0;

/// Default configuration constants
pub mod config {
    /// Default permissions for created segments (owner read/write)
    pub const DEFAULT_PERMISSIONS: u32 = 0o600;

    /// Maximum segment name length (NAME_MAX minus the leading slash)
    pub const MAX_SEGMENT_NAME_LEN: usize = 254;
}
