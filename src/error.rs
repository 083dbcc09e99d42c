//! Error types and handling for Seurat

/// Result type alias for Seurat operations
pub type Result<T> = std::result::Result<T, SeuratError>;

/// Error types for the shared memory layout compiler and segment manager
#[derive(Debug, thiserror::Error)]
pub enum SeuratError {
    /// I/O related errors (file operations, mmap, etc.)
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Schema references a type outside the fixed registry
    #[error("Unsupported type: '{name}'")]
    UnsupportedType { name: String },

    /// Array shape is empty or contains a non-positive dimension
    #[error("Invalid shape for field '{field}': {message}")]
    InvalidShape { field: String, message: String },

    /// Two schema entries share a name
    #[error("Duplicate field name: '{name}'")]
    DuplicateFieldName { name: String },

    /// Invalid parameters or configuration
    #[error("Invalid parameter: {parameter} - {message}")]
    InvalidParameter { parameter: String, message: String },

    /// Malformed schema document
    #[error("Schema error: {message}")]
    Schema { message: String },

    /// Attach target does not exist
    #[error("Segment not found: {name}")]
    SegmentNotFound { name: String },

    /// OS-level failure while creating a segment
    #[error("Segment create failed: {name} - {message}")]
    SegmentCreateFailed { name: String, message: String },

    /// Compiled layout is larger than the attached segment
    #[error("Layout exceeds segment: layout needs {layout_size} bytes, segment has {segment_size}")]
    LayoutExceedsSegment {
        layout_size: usize,
        segment_size: usize,
    },

    /// Lookup of a field name outside the compiled layout
    #[error("Field not found: '{name}'")]
    FieldNotFound { name: String },

    /// Typed access with a Rust type that does not match the descriptor
    #[error("Type mismatch on field '{field}': expected {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// Alignment requirements not met
    #[error("Alignment error: address {address:#x} not aligned to {alignment}")]
    Alignment { address: usize, alignment: usize },
}

impl SeuratError {
    /// Create an I/O error from a standard I/O error
    pub fn from_io(source: std::io::Error, context: &str) -> Self {
        Self::Io {
            message: format!("{}: {}", context, source),
            source: Some(source),
        }
    }

    /// Create an unsupported type error
    pub fn unsupported_type(name: impl Into<String>) -> Self {
        Self::UnsupportedType { name: name.into() }
    }

    /// Create an invalid shape error
    pub fn invalid_shape(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidShape {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a duplicate field name error
    pub fn duplicate_field_name(name: impl Into<String>) -> Self {
        Self::DuplicateFieldName { name: name.into() }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create a schema error
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    /// Create a segment not found error
    pub fn segment_not_found(name: impl Into<String>) -> Self {
        Self::SegmentNotFound { name: name.into() }
    }

    /// Create a segment create failed error
    pub fn segment_create_failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SegmentCreateFailed {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a layout exceeds segment error
    pub fn layout_exceeds_segment(layout_size: usize, segment_size: usize) -> Self {
        Self::LayoutExceedsSegment {
            layout_size,
            segment_size,
        }
    }

    /// Create a field not found error
    pub fn field_not_found(name: impl Into<String>) -> Self {
        Self::FieldNotFound { name: name.into() }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(
        field: impl Into<String>,
        expected: &'static str,
        actual: &'static str,
    ) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected,
            actual,
        }
    }

    /// Create an alignment error
    pub fn alignment(address: usize, alignment: usize) -> Self {
        Self::Alignment { address, alignment }
    }
}

// Convert from common error types
impl From<std::io::Error> for SeuratError {
    fn from(err: std::io::Error) -> Self {
        Self::from_io(err, "I/O operation failed")
    }
}

impl From<serde_json::Error> for SeuratError {
    fn from(err: serde_json::Error) -> Self {
        Self::schema(format!("JSON error: {}", err))
    }
}
