//! Compiled field descriptors

use serde::{Deserialize, Serialize};

use crate::registry::ElementType;

/// One named, typed, fixed-size region within a compiled layout
///
/// Descriptors are produced once by the layout compiler and are immutable
/// afterward. An empty shape denotes a scalar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name, unique within the layout
    pub name: String,
    /// Element type resolved from the registry
    pub element_type: ElementType,
    /// Dimension sizes; empty for scalars
    pub shape: Vec<usize>,
    /// Byte offset from the start of the segment
    pub offset: usize,
    /// Total byte size of the field
    pub byte_size: usize,
}

impl FieldDescriptor {
    /// Whether this field is a scalar (rank 0)
    pub fn is_scalar(&self) -> bool {
        self.shape.is_empty()
    }

    /// Number of elements (1 for scalars, product of dimensions otherwise)
    pub fn element_count(&self) -> usize {
        self.shape.iter().product()
    }

    /// Rank of the field (0 for scalars)
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Byte range `[offset, offset + byte_size)` covered by this field
    pub fn byte_range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.byte_size
    }
}
