//! Schema document types

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SeuratError};

/// A scalar field entry in a schema document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalarEntry {
    /// Field name, unique within the schema
    pub name: String,
    /// Registered type name (e.g. "float64")
    #[serde(rename = "type")]
    pub type_name: String,
}

/// An array field entry in a schema document
///
/// Dimensions are carried as signed integers so that a schema declaring a
/// non-positive dimension surfaces as `InvalidShape` at compile time rather
/// than as a deserialization failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrayEntry {
    /// Field name, unique within the schema
    pub name: String,
    /// Registered type name (e.g. "float32")
    #[serde(rename = "type")]
    pub type_name: String,
    /// Ordered dimension sizes, all positive
    pub shape: Vec<i64>,
}

/// A declarative shared memory schema
///
/// The document is the single source of truth for the layout on both sides
/// of a segment. `shm_name` is accepted as an alias for `segment_name` for
/// compatibility with older schema files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDocument {
    /// Name of the shared memory segment
    #[serde(alias = "shm_name")]
    pub segment_name: String,
    /// Scalar fields, in declaration order
    #[serde(default)]
    pub variables: Vec<ScalarEntry>,
    /// Array fields, in declaration order
    #[serde(default)]
    pub arrays: Vec<ArrayEntry>,
}

impl SchemaDocument {
    /// Parse a schema document from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a schema document from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| SeuratError::from_io(e, &format!("Failed to read schema {:?}", path)))?;
        Self::from_json(&text)
    }

    /// Serialize the document back to pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Total number of field entries (scalars plus arrays)
    pub fn entry_count(&self) -> usize {
        self.variables.len() + self.arrays.len()
    }
}

/// Check that a name is usable as an identifier on both sides of the layout
///
/// Field names become C++ identifiers in the generated header, so the rule
/// is the common subset: `[A-Za-z_][A-Za-z0-9_]*`.
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_schema() {
        let json = r#"{
            "segment_name": "demo",
            "variables": [{"name": "dt", "type": "float64"}],
            "arrays": [{"name": "c", "type": "float32", "shape": [4, 4]}]
        }"#;
        let doc = SchemaDocument::from_json(json).unwrap();
        assert_eq!(doc.segment_name, "demo");
        assert_eq!(doc.variables.len(), 1);
        assert_eq!(doc.arrays.len(), 1);
        assert_eq!(doc.variables[0].type_name, "float64");
        assert_eq!(doc.arrays[0].shape, vec![4, 4]);
    }

    #[test]
    fn test_shm_name_alias() {
        let json = r#"{"shm_name": "legacy", "variables": [], "arrays": []}"#;
        let doc = SchemaDocument::from_json(json).unwrap();
        assert_eq!(doc.segment_name, "legacy");
    }

    #[test]
    fn test_missing_sections_default_empty() {
        let doc = SchemaDocument::from_json(r#"{"segment_name": "bare"}"#).unwrap();
        assert!(doc.variables.is_empty());
        assert!(doc.arrays.is_empty());
        assert_eq!(doc.entry_count(), 0);
    }

    #[test]
    fn test_malformed_json() {
        let err = SchemaDocument::from_json("{not json").unwrap_err();
        assert!(matches!(err, SeuratError::Schema { .. }));
    }

    #[test]
    fn test_identifier_check() {
        assert!(is_identifier("dt"));
        assert!(is_identifier("_lambda_n"));
        assert!(is_identifier("c2"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("2c"));
        assert!(!is_identifier("my field"));
        assert!(!is_identifier("a-b"));
    }
}
