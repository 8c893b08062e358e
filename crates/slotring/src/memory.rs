use crate::layout::CACHE_LINE;
use crate::RingError;
use std::alloc::{self, Layout};
use std::ptr::NonNull;

/// Backing memory of a ring: either allocated here or lent by the caller.
pub(crate) struct Storage {
    base: NonNull<u8>,
    size: usize,
    /// Set when this storage owns its allocation and must free it.
    layout: Option<Layout>,
}

impl Storage {
    /// Allocates `size` zeroed bytes aligned to the cache line.
    pub(crate) fn allocate(size: usize) -> Result<Self, RingError> {
        let layout = Layout::from_size_align(size, CACHE_LINE)
            .map_err(|_| RingError::AllocationFailure { size })?;

        // SAFETY: size is never zero, the header alone is several cache lines.
        let ptr = unsafe { alloc::alloc_zeroed(layout) };
        let base = NonNull::new(ptr).ok_or(RingError::AllocationFailure { size })?;

        Ok(Self {
            base,
            size,
            layout: Some(layout),
        })
    }

    /// Wraps caller-provided memory of `len` bytes, of which `required` will be used.
    ///
    /// # Safety
    ///
    /// `base` must be valid for reads and writes of `len` bytes for as long as
    /// the returned storage (and the ring built on it) is alive, and nothing
    /// else may access that memory in the meantime.
    pub(crate) unsafe fn borrowed(
        base: NonNull<u8>,
        len: usize,
        required: usize,
    ) -> Result<Self, RingError> {
        if len < required {
            return Err(RingError::StorageTooSmall {
                required,
                provided: len,
            });
        }
        if base.as_ptr() as usize % CACHE_LINE != 0 {
            return Err(RingError::MisalignedStorage { align: CACHE_LINE });
        }
        Ok(Self {
            base,
            size: required,
            layout: None,
        })
    }

    #[inline]
    pub(crate) fn as_ptr(&self) -> NonNull<u8> {
        self.base
    }

    #[inline]
    pub(crate) fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub(crate) fn is_owned(&self) -> bool {
        self.layout.is_some()
    }
}

impl Drop for Storage {
    fn drop(&mut self) {
        if let Some(layout) = self.layout {
            // SAFETY: base came from alloc_zeroed with this exact layout.
            unsafe { alloc::dealloc(self.base.as_ptr(), layout) };
        }
    }
}
