//! Name-keyed view mapping built once at bind time

use std::collections::HashMap;

use crate::error::{Result, SeuratError};
use crate::layout::LayoutSpec;
use crate::segment::Segment;

use super::field_view::FieldView;

/// All of a layout's views over one segment, keyed by field name
///
/// The mapping is built once at bind time from the validated layout; the
/// set of names is fixed afterward. Views live exactly as long as the
/// segment they were bound over.
#[derive(Debug)]
pub struct ViewMap {
    views: HashMap<String, FieldView>,
}

impl ViewMap {
    /// Bind a compiled layout onto a segment
    ///
    /// Fails with `LayoutExceedsSegment` if the layout needs more bytes
    /// than the segment provides — a schema/segment version skew between
    /// creator and attacher that must never be silently truncated.
    pub fn bind(segment: &Segment, layout: &LayoutSpec) -> Result<Self> {
        if layout.total_size > segment.size() {
            return Err(SeuratError::layout_exceeds_segment(
                layout.total_size,
                segment.size(),
            ));
        }

        let base = segment.base_ptr()?;
        let mut views = HashMap::with_capacity(layout.fields.len());
        for descriptor in &layout.fields {
            let view = unsafe { FieldView::new(base, descriptor.clone()) };
            views.insert(descriptor.name.clone(), view);
        }

        Ok(Self { views })
    }

    /// An empty map (no bound views)
    pub(crate) fn empty() -> Self {
        Self {
            views: HashMap::new(),
        }
    }

    /// Look up a view by field name
    pub fn view(&self, name: &str) -> Result<&FieldView> {
        self.views
            .get(name)
            .ok_or_else(|| SeuratError::field_not_found(name))
    }

    /// Look up a mutable view by field name
    pub fn view_mut(&mut self, name: &str) -> Result<&mut FieldView> {
        self.views
            .get_mut(name)
            .ok_or_else(|| SeuratError::field_not_found(name))
    }

    /// Whether a field name is present
    pub fn contains(&self, name: &str) -> bool {
        self.views.contains_key(name)
    }

    /// Number of bound views
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Whether the map holds no views
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Iterate over bound field names (unordered)
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.views.keys().map(String::as_str)
    }

    /// Iterate over bound views (unordered)
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldView)> {
        self.views.iter().map(|(k, v)| (k.as_str(), v))
    }
}
