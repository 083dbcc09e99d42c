//! Layout compilation: schema document to byte-exact field offsets

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SeuratError};
use crate::registry::ElementType;

use super::descriptor::FieldDescriptor;
use super::schema::{is_identifier, SchemaDocument};

/// A compiled shared memory layout
///
/// Fields are packed back to back in declaration order (scalars first,
/// then arrays) with no padding: `offset[i]` is the sum of the byte sizes
/// of all preceding fields. Compiling the same schema twice yields an
/// identical layout; every process touching the segment relies on that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSpec {
    /// Segment name from the schema
    pub segment_name: String,
    /// Ordered field descriptors
    pub fields: Vec<FieldDescriptor>,
    /// Total segment size in bytes
    pub total_size: usize,
}

impl LayoutSpec {
    /// Compile a schema document into a layout
    pub fn compile(doc: &SchemaDocument) -> Result<Self> {
        validate_segment_name(&doc.segment_name)?;

        let mut fields = Vec::with_capacity(doc.entry_count());
        let mut seen: HashSet<&str> = HashSet::with_capacity(doc.entry_count());
        let mut offset = 0usize;

        for entry in &doc.variables {
            validate_field_name(&entry.name, &mut seen)?;
            let element_type = ElementType::resolve(&entry.type_name)?;
            let byte_size = element_type.width_bytes();
            fields.push(FieldDescriptor {
                name: entry.name.clone(),
                element_type,
                shape: Vec::new(),
                offset,
                byte_size,
            });
            offset += byte_size;
        }

        for entry in &doc.arrays {
            validate_field_name(&entry.name, &mut seen)?;
            let element_type = ElementType::resolve(&entry.type_name)?;
            let shape = validate_shape(&entry.name, &entry.shape)?;
            let count: usize = shape.iter().product();
            let byte_size = element_type.width_bytes() * count;
            fields.push(FieldDescriptor {
                name: entry.name.clone(),
                element_type,
                shape,
                offset,
                byte_size,
            });
            offset += byte_size;
        }

        Ok(Self {
            segment_name: doc.segment_name.clone(),
            fields,
            total_size: offset,
        })
    }

    /// Compile directly from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Self::compile(&SchemaDocument::from_json(json)?)
    }

    /// Compile directly from a schema file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::compile(&SchemaDocument::from_file(path)?)
    }

    /// Look up a field descriptor by name
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Number of fields in the layout
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Segment name in POSIX shared memory form (single leading slash)
    ///
    /// Both the segment manager and the generated header use this form, so
    /// the two sides open the same OS object.
    pub fn posix_name(&self) -> String {
        posix_name(&self.segment_name)
    }
}

/// Normalize a segment name to the leading-slash POSIX form
pub fn posix_name(name: &str) -> String {
    if let Some(stripped) = name.strip_prefix('/') {
        format!("/{}", stripped)
    } else {
        format!("/{}", name)
    }
}

fn validate_segment_name(name: &str) -> Result<()> {
    let bare = name.strip_prefix('/').unwrap_or(name);
    if bare.is_empty() {
        return Err(SeuratError::invalid_parameter(
            "segment_name",
            "Segment name cannot be empty",
        ));
    }
    if bare.contains('/') {
        return Err(SeuratError::invalid_parameter(
            "segment_name",
            "Segment name cannot contain '/'",
        ));
    }
    if bare.len() > crate::config::MAX_SEGMENT_NAME_LEN {
        return Err(SeuratError::invalid_parameter(
            "segment_name",
            "Segment name too long",
        ));
    }
    Ok(())
}

fn validate_field_name<'a>(name: &'a str, seen: &mut HashSet<&'a str>) -> Result<()> {
    if !is_identifier(name) {
        return Err(SeuratError::invalid_parameter(
            "name",
            format!("Field name '{}' is not a valid identifier", name),
        ));
    }
    if !seen.insert(name) {
        return Err(SeuratError::duplicate_field_name(name));
    }
    Ok(())
}

fn validate_shape(field: &str, shape: &[i64]) -> Result<Vec<usize>> {
    if shape.is_empty() {
        return Err(SeuratError::invalid_shape(field, "Shape cannot be empty"));
    }
    let mut dims = Vec::with_capacity(shape.len());
    for &dim in shape {
        if dim <= 0 {
            return Err(SeuratError::invalid_shape(
                field,
                format!("Dimension {} is not positive", dim),
            ));
        }
        dims.push(dim as usize);
    }
    Ok(dims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::schema::{ArrayEntry, ScalarEntry};

    fn demo_schema() -> SchemaDocument {
        SchemaDocument {
            segment_name: "demo".to_string(),
            variables: vec![ScalarEntry {
                name: "dt".to_string(),
                type_name: "float64".to_string(),
            }],
            arrays: vec![ArrayEntry {
                name: "c".to_string(),
                type_name: "float32".to_string(),
                shape: vec![4, 4],
            }],
        }
    }

    #[test]
    fn test_demo_layout() {
        let layout = LayoutSpec::compile(&demo_schema()).unwrap();
        assert_eq!(layout.segment_name, "demo");
        assert_eq!(layout.field_count(), 2);

        let dt = layout.field("dt").unwrap();
        assert_eq!(dt.offset, 0);
        assert_eq!(dt.byte_size, 8);
        assert!(dt.is_scalar());

        let c = layout.field("c").unwrap();
        assert_eq!(c.offset, 8);
        assert_eq!(c.byte_size, 64);
        assert_eq!(c.shape, vec![4, 4]);

        assert_eq!(layout.total_size, 72);
    }

    #[test]
    fn test_packing_is_gap_free() {
        let json = r#"{
            "segment_name": "packed",
            "variables": [
                {"name": "a", "type": "int8"},
                {"name": "b", "type": "float64"},
                {"name": "c", "type": "uint16"}
            ],
            "arrays": [
                {"name": "d", "type": "int32", "shape": [3]},
                {"name": "e", "type": "uint8", "shape": [5, 2]}
            ]
        }"#;
        let layout = LayoutSpec::from_json(json).unwrap();

        let mut running = 0usize;
        for field in &layout.fields {
            assert_eq!(field.offset, running);
            running += field.byte_size;
        }
        assert_eq!(layout.total_size, running);

        // scalars keep declaration order ahead of arrays, no padding
        assert_eq!(layout.field("b").unwrap().offset, 1);
        assert_eq!(layout.field("c").unwrap().offset, 9);
        assert_eq!(layout.field("d").unwrap().offset, 11);
        assert_eq!(layout.field("e").unwrap().offset, 23);
        assert_eq!(layout.total_size, 33);
    }

    #[test]
    fn test_determinism() {
        let doc = demo_schema();
        let a = LayoutSpec::compile(&doc).unwrap();
        let b = LayoutSpec::compile(&doc).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unsupported_type() {
        let mut doc = demo_schema();
        doc.variables[0].type_name = "int128".to_string();
        let err = LayoutSpec::compile(&doc).unwrap_err();
        assert!(matches!(err, SeuratError::UnsupportedType { name } if name == "int128"));
    }

    #[test]
    fn test_duplicate_field_name() {
        let mut doc = demo_schema();
        doc.arrays.push(ArrayEntry {
            name: "c".to_string(),
            type_name: "float32".to_string(),
            shape: vec![2],
        });
        let err = LayoutSpec::compile(&doc).unwrap_err();
        assert!(matches!(err, SeuratError::DuplicateFieldName { name } if name == "c"));
    }

    #[test]
    fn test_duplicate_across_sections() {
        let mut doc = demo_schema();
        doc.arrays[0].name = "dt".to_string();
        let err = LayoutSpec::compile(&doc).unwrap_err();
        assert!(matches!(err, SeuratError::DuplicateFieldName { .. }));
    }

    #[test]
    fn test_invalid_shape() {
        let mut doc = demo_schema();
        doc.arrays[0].shape = vec![4, 0];
        assert!(matches!(
            LayoutSpec::compile(&doc).unwrap_err(),
            SeuratError::InvalidShape { .. }
        ));

        doc.arrays[0].shape = vec![-1];
        assert!(matches!(
            LayoutSpec::compile(&doc).unwrap_err(),
            SeuratError::InvalidShape { .. }
        ));

        doc.arrays[0].shape = vec![];
        assert!(matches!(
            LayoutSpec::compile(&doc).unwrap_err(),
            SeuratError::InvalidShape { .. }
        ));
    }

    #[test]
    fn test_invalid_field_name() {
        let mut doc = demo_schema();
        doc.variables[0].name = "my field".to_string();
        assert!(matches!(
            LayoutSpec::compile(&doc).unwrap_err(),
            SeuratError::InvalidParameter { .. }
        ));
    }

    #[test]
    fn test_invalid_segment_name() {
        let mut doc = demo_schema();
        doc.segment_name = "a/b".to_string();
        assert!(LayoutSpec::compile(&doc).is_err());

        doc.segment_name = String::new();
        assert!(LayoutSpec::compile(&doc).is_err());
    }

    #[test]
    fn test_posix_name_normalization() {
        assert_eq!(posix_name("demo"), "/demo");
        assert_eq!(posix_name("/demo"), "/demo");
    }
}
