//! Cross-language header generation
//!
//! A pure function of the compiled layout: the same `LayoutSpec` always
//! yields byte-identical header text, so the generated artifact is
//! reproducible and diffable. Writing the artifact to disk is a separate
//! step owned by whichever build process consumes it.

pub mod cpp;

pub use cpp::CppHeaderGenerator;

use std::path::Path;

use crate::error::{Result, SeuratError};
use crate::layout::LayoutSpec;

/// Generate the C++ header for a layout and write it to `path`
///
/// The file is replaced wholesale; the emitted text carries a non-editable
/// marker and is considered stale whenever the schema changes.
pub fn write_header(layout: &LayoutSpec, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let text = CppHeaderGenerator::new().generate(layout)?;
    std::fs::write(path, text)
        .map_err(|e| SeuratError::from_io(e, &format!("Failed to write header {:?}", path)))
}
