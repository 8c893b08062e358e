use std::ptr::NonNull;

/// A pointer-width value that can live in a ring slot.
///
/// The ring stores the raw word and never dereferences it. Whatever a stored
/// pointer refers to stays owned by the caller.
pub trait SlotValue: Copy {
    /// Converts the value into the raw slot word.
    fn into_slot(self) -> usize;

    /// Rebuilds the value from a raw slot word written by [`into_slot`](Self::into_slot).
    fn from_slot(raw: usize) -> Self;
}

impl SlotValue for usize {
    #[inline]
    fn into_slot(self) -> usize {
        self
    }

    #[inline]
    fn from_slot(raw: usize) -> Self {
        raw
    }
}

impl<T> SlotValue for *mut T {
    #[inline]
    fn into_slot(self) -> usize {
        self as usize
    }

    #[inline]
    fn from_slot(raw: usize) -> Self {
        raw as *mut T
    }
}

impl<T> SlotValue for *const T {
    #[inline]
    fn into_slot(self) -> usize {
        self as usize
    }

    #[inline]
    fn from_slot(raw: usize) -> Self {
        raw as *const T
    }
}

impl<T> SlotValue for Option<NonNull<T>> {
    #[inline]
    fn into_slot(self) -> usize {
        self.map_or(0, |ptr| ptr.as_ptr() as usize)
    }

    #[inline]
    fn from_slot(raw: usize) -> Self {
        NonNull::new(raw as *mut T)
    }
}
