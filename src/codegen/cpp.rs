//! C++ layout header emission

use crate::error::Result;
use crate::layout::{FieldDescriptor, LayoutSpec};
use crate::registry::ElementType;

/// Generator for the static-side C++ layout header
///
/// The emitted header is self-contained: segment name and size constants,
/// one tag struct per field, `field_info<Tag>` specializations exposing
/// `{type, offset}` at compile time, a single-field `MAP_SHM` binding
/// macro, and a `MAP_ALL_SHARED_MEMORY_FIELDS` batch macro declaring one
/// typed reference per field. The consuming side resolves references
/// through its `SharedMemoryAccess::get<Tag>()` accessor.
pub struct CppHeaderGenerator;

impl CppHeaderGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate header text for a compiled layout
    pub fn generate(&self, layout: &LayoutSpec) -> Result<String> {
        let mut out = String::new();

        out.push_str("// Auto-generated shared memory layout -- DO NOT EDIT.\n");
        out.push_str("// Regenerate from the schema whenever it changes.\n");
        out.push_str(&format!(
            "// Segment \"{}\": {} fields, {} bytes.\n",
            layout.segment_name,
            layout.fields.len(),
            layout.total_size
        ));
        out.push_str("#pragma once\n\n");
        out.push_str("#include <cstddef>\n");
        out.push_str("#include <cstdint>\n\n");

        out.push_str(&format!(
            "constexpr const char* SHM_NAME = \"{}\";\n",
            layout.posix_name()
        ));
        out.push_str(&format!(
            "constexpr std::size_t SHM_SIZE = {};\n\n",
            layout.total_size
        ));

        out.push_str("namespace SharedMemoryLayout {\n\n");

        for field in &layout.fields {
            out.push_str(&format!("    struct {}_tag {{}};\n", field.name));
        }

        out.push_str("\n    template <typename Tag>\n    struct field_info;\n\n");

        for field in &layout.fields {
            out.push_str(&format!(
                "    template <>\n    struct field_info<{name}_tag> {{\n        using type = {ty};\n        static constexpr std::size_t offset = {offset};\n    }};\n\n",
                name = field.name,
                ty = cpp_field_type(field),
                offset = field.offset
            ));
        }

        out.push_str("} // namespace SharedMemoryLayout\n\n");

        out.push_str("#define MAP_SHM(TAG, NAME) \\\n");
        out.push_str("    auto& NAME = SharedMemoryAccess::get<SharedMemoryLayout::TAG##_tag>();\n\n");

        if layout.fields.is_empty() {
            out.push_str("#define MAP_ALL_SHARED_MEMORY_FIELDS\n");
        } else {
            out.push_str("#define MAP_ALL_SHARED_MEMORY_FIELDS \\\n");
            let bindings: Vec<String> = layout
                .fields
                .iter()
                .map(|field| {
                    format!(
                        "    inline auto& {name} = SharedMemoryAccess::get<SharedMemoryLayout::{name}_tag>();",
                        name = field.name
                    )
                })
                .collect();
            out.push_str(&bindings.join(" \\\n"));
            out.push('\n');
        }

        Ok(out)
    }
}

impl Default for CppHeaderGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// C++ counterpart of a registered element type
///
/// Kept in lockstep with the registry: both sides share the closed
/// `ElementType` enum, so a type without a counterpart is unrepresentable.
fn cpp_scalar_type(ty: ElementType) -> &'static str {
    match ty {
        ElementType::Int8 => "std::int8_t",
        ElementType::UInt8 => "std::uint8_t",
        ElementType::Int16 => "std::int16_t",
        ElementType::UInt16 => "std::uint16_t",
        ElementType::Int32 => "std::int32_t",
        ElementType::UInt32 => "std::uint32_t",
        ElementType::Int64 => "std::int64_t",
        ElementType::UInt64 => "std::uint64_t",
        ElementType::Float32 => "float",
        ElementType::Float64 => "double",
    }
}

/// Full C++ type of a field: scalar type, or fixed-size array type
/// matching the shape (e.g. `float[4][4]`)
fn cpp_field_type(field: &FieldDescriptor) -> String {
    let scalar = cpp_scalar_type(field.element_type);
    if field.is_scalar() {
        scalar.to_string()
    } else {
        let dims: String = field.shape.iter().map(|d| format!("[{}]", d)).collect();
        format!("{}{}", scalar, dims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::SchemaDocument;

    fn demo_layout() -> LayoutSpec {
        let json = r#"{
            "segment_name": "demo",
            "variables": [{"name": "dt", "type": "float64"}],
            "arrays": [{"name": "c", "type": "float32", "shape": [4, 4]}]
        }"#;
        LayoutSpec::compile(&SchemaDocument::from_json(json).unwrap()).unwrap()
    }

    #[test]
    fn test_generated_constants() {
        let header = CppHeaderGenerator::new().generate(&demo_layout()).unwrap();
        assert!(header.contains("constexpr const char* SHM_NAME = \"/demo\";"));
        assert!(header.contains("constexpr std::size_t SHM_SIZE = 72;"));
        assert!(header.contains("DO NOT EDIT"));
        assert!(header.contains("#pragma once"));
    }

    #[test]
    fn test_generated_field_info() {
        let header = CppHeaderGenerator::new().generate(&demo_layout()).unwrap();
        assert!(header.contains("struct dt_tag {};"));
        assert!(header.contains("struct c_tag {};"));
        assert!(header.contains("struct field_info<dt_tag> {"));
        assert!(header.contains("using type = double;"));
        assert!(header.contains("static constexpr std::size_t offset = 0;"));
        assert!(header.contains("struct field_info<c_tag> {"));
        assert!(header.contains("using type = float[4][4];"));
        assert!(header.contains("static constexpr std::size_t offset = 8;"));
    }

    #[test]
    fn test_generated_macros() {
        let header = CppHeaderGenerator::new().generate(&demo_layout()).unwrap();
        assert!(header.contains("#define MAP_SHM(TAG, NAME)"));
        assert!(header.contains("#define MAP_ALL_SHARED_MEMORY_FIELDS \\"));
        assert!(header
            .contains("inline auto& dt = SharedMemoryAccess::get<SharedMemoryLayout::dt_tag>();"));
        assert!(header
            .contains("inline auto& c = SharedMemoryAccess::get<SharedMemoryLayout::c_tag>();"));
    }

    #[test]
    fn test_determinism() {
        let layout = demo_layout();
        let gen = CppHeaderGenerator::new();
        let a = gen.generate(&layout).unwrap();
        let b = gen.generate(&layout).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_scalar_type_mapping() {
        assert_eq!(cpp_scalar_type(ElementType::Int8), "std::int8_t");
        assert_eq!(cpp_scalar_type(ElementType::UInt64), "std::uint64_t");
        assert_eq!(cpp_scalar_type(ElementType::Float32), "float");
        assert_eq!(cpp_scalar_type(ElementType::Float64), "double");
    }

    #[test]
    fn test_empty_layout_batch_macro() {
        let layout = LayoutSpec::from_json(r#"{"segment_name": "empty"}"#).unwrap();
        let header = CppHeaderGenerator::new().generate(&layout).unwrap();
        assert!(header.contains("#define MAP_ALL_SHARED_MEMORY_FIELDS\n"));
        assert!(header.contains("constexpr std::size_t SHM_SIZE = 0;"));
    }
}
