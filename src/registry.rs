//! Fixed-width numeric type registry
//!
//! Maps schema type names to element descriptors. The set is closed: both
//! sides of a layout (this crate and the generated static header) resolve
//! widths from the same registry, so adding a type means extending this
//! enum and the C++ mapping in `codegen` together.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SeuratError};

/// Numeric kind of a registered element type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericKind {
    /// Signed integer
    Signed,
    /// Unsigned integer
    Unsigned,
    /// IEEE-754 floating point
    Float,
}

/// Fixed-width element types available to schemas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
}

impl ElementType {
    /// All registered element types, in registry order
    pub const ALL: [ElementType; 10] = [
        ElementType::Int8,
        ElementType::UInt8,
        ElementType::Int16,
        ElementType::UInt16,
        ElementType::Int32,
        ElementType::UInt32,
        ElementType::Int64,
        ElementType::UInt64,
        ElementType::Float32,
        ElementType::Float64,
    ];

    /// Resolve a schema type name to an element type
    pub fn resolve(name: &str) -> Result<Self> {
        match name {
            "int8" => Ok(ElementType::Int8),
            "uint8" => Ok(ElementType::UInt8),
            "int16" => Ok(ElementType::Int16),
            "uint16" => Ok(ElementType::UInt16),
            "int32" => Ok(ElementType::Int32),
            "uint32" => Ok(ElementType::UInt32),
            "int64" => Ok(ElementType::Int64),
            "uint64" => Ok(ElementType::UInt64),
            "float32" => Ok(ElementType::Float32),
            "float64" => Ok(ElementType::Float64),
            other => Err(SeuratError::unsupported_type(other)),
        }
    }

    /// Canonical schema name for this type
    pub fn type_name(&self) -> &'static str {
        match self {
            ElementType::Int8 => "int8",
            ElementType::UInt8 => "uint8",
            ElementType::Int16 => "int16",
            ElementType::UInt16 => "uint16",
            ElementType::Int32 => "int32",
            ElementType::UInt32 => "uint32",
            ElementType::Int64 => "int64",
            ElementType::UInt64 => "uint64",
            ElementType::Float32 => "float32",
            ElementType::Float64 => "float64",
        }
    }

    /// Element width in bytes
    pub fn width_bytes(&self) -> usize {
        match self {
            ElementType::Int8 | ElementType::UInt8 => 1,
            ElementType::Int16 | ElementType::UInt16 => 2,
            ElementType::Int32 | ElementType::UInt32 | ElementType::Float32 => 4,
            ElementType::Int64 | ElementType::UInt64 | ElementType::Float64 => 8,
        }
    }

    /// Numeric kind of this type
    pub fn kind(&self) -> NumericKind {
        match self {
            ElementType::Int8 | ElementType::Int16 | ElementType::Int32 | ElementType::Int64 => {
                NumericKind::Signed
            }
            ElementType::UInt8
            | ElementType::UInt16
            | ElementType::UInt32
            | ElementType::UInt64 => NumericKind::Unsigned,
            ElementType::Float32 | ElementType::Float64 => NumericKind::Float,
        }
    }

    /// Natural alignment of this type (equal to its width for all
    /// registered types)
    pub fn align_bytes(&self) -> usize {
        self.width_bytes()
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Rust scalar types usable for typed view access
///
/// The associated constant ties a Rust type to its registry entry so view
/// accessors can reject mismatched access at run time.
pub trait Element: Copy + Sized + 'static {
    /// Registry entry corresponding to `Self`
    const ELEMENT_TYPE: ElementType;
}

macro_rules! impl_element {
    ($($rust:ty => $variant:ident),* $(,)?) => {
        $(
            impl Element for $rust {
                const ELEMENT_TYPE: ElementType = ElementType::$variant;
            }
        )*
    };
}

impl_element! {
    i8 => Int8,
    u8 => UInt8,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
}
