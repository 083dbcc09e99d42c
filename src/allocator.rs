//! Allocator facade: schema in, live field views out
//!
//! Combines the layout compiler, segment lifecycle, and view mapper behind
//! the interface collaborating processes actually use: a mapping from
//! field name to live view plus `close(release)`.

use std::path::Path;

use crate::error::Result;
use crate::layout::{LayoutSpec, SchemaDocument};
use crate::segment::Segment;
use crate::views::ViewMap;

/// One process's handle on a schema-described shared memory segment
///
/// `create` builds a fresh owning segment sized to the compiled layout;
/// `attach` opens an existing one non-owningly. Both bind the full view
/// map once. Field views are reached through `fields()`/`fields_mut()`
/// and become invalid after `close`.
#[derive(Debug)]
pub struct SharedMemoryAllocator {
    layout: LayoutSpec,
    segment: Segment,
    views: ViewMap,
}

impl SharedMemoryAllocator {
    /// Compile the schema, create (or destructively replace) the segment,
    /// and bind views
    pub fn create(doc: &SchemaDocument) -> Result<Self> {
        let layout = LayoutSpec::compile(doc)?;
        Self::create_from_layout(layout)
    }

    /// Compile the schema from a JSON file, then create and bind
    pub fn create_from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::create(&SchemaDocument::from_file(path)?)
    }

    /// Create from an already-compiled layout
    pub fn create_from_layout(layout: LayoutSpec) -> Result<Self> {
        let segment = Segment::create_or_replace(&layout.posix_name(), layout.total_size)?;
        let views = ViewMap::bind(&segment, &layout)?;
        Ok(Self {
            layout,
            segment,
            views,
        })
    }

    /// Compile the schema, attach to the existing segment, and bind views
    ///
    /// Fails with `SegmentNotFound` if no segment of the schema's name
    /// exists, and with `LayoutExceedsSegment` if the existing segment is
    /// smaller than the compiled layout (schema skew between creator and
    /// attacher).
    pub fn attach(doc: &SchemaDocument) -> Result<Self> {
        let layout = LayoutSpec::compile(doc)?;
        Self::attach_from_layout(layout)
    }

    /// Compile the schema from a JSON file, then attach and bind
    pub fn attach_from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::attach(&SchemaDocument::from_file(path)?)
    }

    /// Attach from an already-compiled layout
    pub fn attach_from_layout(layout: LayoutSpec) -> Result<Self> {
        let segment = Segment::attach(&layout.posix_name())?;
        let views = ViewMap::bind(&segment, &layout)?;
        Ok(Self {
            layout,
            segment,
            views,
        })
    }

    /// The live field views, keyed by name
    pub fn fields(&self) -> &ViewMap {
        &self.views
    }

    /// The live field views, mutably
    pub fn fields_mut(&mut self) -> &mut ViewMap {
        &mut self.views
    }

    /// The compiled layout this handle was built from
    pub fn layout(&self) -> &LayoutSpec {
        &self.layout
    }

    /// The underlying segment handle
    pub fn segment(&self) -> &Segment {
        &self.segment
    }

    /// Whether this handle owns the segment's lifecycle
    pub fn owns_lifecycle(&self) -> bool {
        self.segment.owns_lifecycle()
    }

    /// Whether this handle has been closed
    pub fn is_closed(&self) -> bool {
        self.segment.is_closed()
    }

    /// Detach the mapping and drop all views; optionally destroy the OS
    /// object (owning handles only)
    ///
    /// Idempotent. All views handed out by this allocator are invalid
    /// afterward; the map is emptied so later lookups fail rather than
    /// dangle.
    pub fn close(&mut self, release: bool) -> Result<()> {
        self.views = ViewMap::empty();
        self.segment.close(release)
    }
}
