//! Zero-copy typed views over a segment
//!
//! Binding a compiled layout onto a segment yields one `FieldView` per
//! field, collected in a `ViewMap` keyed by field name. Views are raw
//! windows into the segment's mapping: they have no independent lifetime
//! and are invalid once the segment is closed.

pub mod field_view;
pub mod map;

pub use field_view::FieldView;
pub use map::ViewMap;
