//! Typed, shaped window onto one field's byte range

use crate::error::{Result, SeuratError};
use crate::layout::FieldDescriptor;
use crate::registry::{Element, ElementType};

/// A zero-copy view of one field within a bound segment
///
/// The layout is packed with no padding, so a field may sit at an address
/// that is not naturally aligned for its element type. Scalar and
/// per-element accessors always use unaligned loads and stores and work at
/// any offset; `as_slice`/`as_mut_slice` require natural alignment and
/// fail otherwise.
#[derive(Debug)]
pub struct FieldView {
    descriptor: FieldDescriptor,
    ptr: *mut u8,
}

// Views are windows into shared memory that other processes mutate
// concurrently regardless; cross-thread movement of the window itself is
// no additional hazard. Same contract as the segment mapping.
unsafe impl Send for FieldView {}
unsafe impl Sync for FieldView {}

impl FieldView {
    /// Construct a view over `base + descriptor.offset`
    ///
    /// # Safety
    /// `base` must point to a live mapping of at least
    /// `descriptor.offset + descriptor.byte_size` bytes, and must remain
    /// valid for the lifetime of the view.
    pub(crate) unsafe fn new(base: *mut u8, descriptor: FieldDescriptor) -> Self {
        let ptr = base.add(descriptor.offset);
        Self { descriptor, ptr }
    }

    /// The descriptor this view was built from
    pub fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    /// Field name
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Element type of the field
    pub fn element_type(&self) -> ElementType {
        self.descriptor.element_type
    }

    /// Dimension sizes; empty for scalars
    pub fn shape(&self) -> &[usize] {
        &self.descriptor.shape
    }

    /// Whether the field is a scalar (rank 0)
    pub fn is_scalar(&self) -> bool {
        self.descriptor.is_scalar()
    }

    /// Number of elements in the field
    pub fn element_count(&self) -> usize {
        self.descriptor.element_count()
    }

    /// Byte offset of the field within its segment
    pub fn offset(&self) -> usize {
        self.descriptor.offset
    }

    /// Total byte size of the field
    pub fn byte_size(&self) -> usize {
        self.descriptor.byte_size
    }

    /// Read a scalar field
    pub fn get<T: Element>(&self) -> Result<T> {
        self.ensure_type::<T>()?;
        self.ensure_scalar()?;
        Ok(unsafe { self.ptr.cast::<T>().read_unaligned() })
    }

    /// Write a scalar field
    pub fn set<T: Element>(&mut self, value: T) -> Result<()> {
        self.ensure_type::<T>()?;
        self.ensure_scalar()?;
        unsafe { self.ptr.cast::<T>().write_unaligned(value) };
        Ok(())
    }

    /// Read one element by flat index (row-major)
    pub fn element<T: Element>(&self, index: usize) -> Result<T> {
        self.ensure_type::<T>()?;
        self.ensure_index(index)?;
        Ok(unsafe { self.ptr.cast::<T>().add(index).read_unaligned() })
    }

    /// Write one element by flat index (row-major)
    pub fn set_element<T: Element>(&mut self, index: usize, value: T) -> Result<()> {
        self.ensure_type::<T>()?;
        self.ensure_index(index)?;
        unsafe { self.ptr.cast::<T>().add(index).write_unaligned(value) };
        Ok(())
    }

    /// Write every element of the field
    pub fn fill<T: Element>(&mut self, value: T) -> Result<()> {
        self.ensure_type::<T>()?;
        let ptr = self.ptr.cast::<T>();
        for i in 0..self.element_count() {
            unsafe { ptr.add(i).write_unaligned(value) };
        }
        Ok(())
    }

    /// Borrow the field as a flat typed slice
    ///
    /// Fails with `Alignment` if the field's packed offset is not naturally
    /// aligned for `T`; use the element accessors in that case.
    pub fn as_slice<T: Element>(&self) -> Result<&[T]> {
        self.ensure_type::<T>()?;
        self.ensure_aligned::<T>()?;
        Ok(unsafe { std::slice::from_raw_parts(self.ptr as *const T, self.element_count()) })
    }

    /// Borrow the field as a flat mutable typed slice
    pub fn as_mut_slice<T: Element>(&mut self) -> Result<&mut [T]> {
        self.ensure_type::<T>()?;
        self.ensure_aligned::<T>()?;
        Ok(unsafe { std::slice::from_raw_parts_mut(self.ptr as *mut T, self.element_count()) })
    }

    /// Raw bytes of the field
    pub fn as_bytes(&self) -> &[u8] {
        unsafe { std::slice::from_raw_parts(self.ptr as *const u8, self.descriptor.byte_size) }
    }

    /// Raw mutable bytes of the field
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        unsafe { std::slice::from_raw_parts_mut(self.ptr, self.descriptor.byte_size) }
    }

    fn ensure_type<T: Element>(&self) -> Result<()> {
        if T::ELEMENT_TYPE != self.descriptor.element_type {
            return Err(SeuratError::type_mismatch(
                &self.descriptor.name,
                self.descriptor.element_type.type_name(),
                T::ELEMENT_TYPE.type_name(),
            ));
        }
        Ok(())
    }

    fn ensure_scalar(&self) -> Result<()> {
        if !self.is_scalar() {
            return Err(SeuratError::invalid_parameter(
                "field",
                format!(
                    "Field '{}' has rank {}, use element access",
                    self.descriptor.name,
                    self.descriptor.rank()
                ),
            ));
        }
        Ok(())
    }

    fn ensure_index(&self, index: usize) -> Result<()> {
        let count = self.element_count();
        if index >= count {
            return Err(SeuratError::invalid_parameter(
                "index",
                format!(
                    "Index {} out of range for field '{}' ({} elements)",
                    index, self.descriptor.name, count
                ),
            ));
        }
        Ok(())
    }

    fn ensure_aligned<T>(&self) -> Result<()> {
        let address = self.ptr as usize;
        let alignment = std::mem::align_of::<T>();
        if address % alignment != 0 {
            return Err(SeuratError::alignment(address, alignment));
        }
        Ok(())
    }
}
