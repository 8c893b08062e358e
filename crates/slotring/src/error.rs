//! Error types for ring construction and bulk operations.

use thiserror::Error;

/// Errors returned by [`Ring`](crate::Ring) construction and operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RingError {
    /// Capacity is zero, not a power of two, or above [`MAX_CAPACITY_MASK`](crate::MAX_CAPACITY_MASK).
    #[error(
        "invalid ring capacity {capacity}: must be a power of two no larger than {}",
        crate::MAX_CAPACITY_MASK
    )]
    InvalidCapacity {
        /// The rejected capacity.
        capacity: u32,
    },

    /// The name does not fit the fixed label budget (including its trailing NUL).
    #[error("ring name is {len} bytes, at most {max} allowed")]
    NameTooLong {
        /// Length of the rejected name in bytes.
        len: usize,
        /// Longest accepted name in bytes.
        max: usize,
    },

    /// The allocator could not supply the backing memory.
    #[error("failed to allocate {size} bytes of ring storage")]
    AllocationFailure {
        /// Requested allocation size in bytes.
        size: usize,
    },

    /// Caller-provided memory is smaller than [`compute_storage_size`](crate::compute_storage_size).
    #[error("ring storage too small: {required} bytes required, {provided} provided")]
    StorageTooSmall {
        /// Bytes needed for the requested capacity.
        required: usize,
        /// Bytes the caller supplied.
        provided: usize,
    },

    /// Caller-provided memory is not aligned to the cache line.
    #[error("ring storage must be aligned to {align} bytes")]
    MisalignedStorage {
        /// Required alignment in bytes.
        align: usize,
    },

    /// Watermark above the ring capacity. The previous watermark stays in effect.
    #[error("watermark {count} exceeds ring capacity {capacity}")]
    InvalidWatermark {
        /// The rejected watermark.
        count: u32,
        /// Capacity of the ring.
        capacity: u32,
    },

    /// `Fixed` enqueue did not fit. Nothing was written.
    #[error("insufficient space: {requested} requested, {free} free")]
    InsufficientSpace {
        /// Number of values the caller tried to enqueue.
        requested: usize,
        /// Free slots observed at reservation time.
        free: usize,
    },

    /// `Fixed` dequeue asked for more entries than were published. Nothing was removed.
    #[error("insufficient entries: {requested} requested, {available} available")]
    InsufficientEntries {
        /// Number of values the caller tried to dequeue.
        requested: usize,
        /// Published entries observed at reservation time.
        available: usize,
    },
}

impl RingError {
    /// Returns `true` for the transient full/empty conditions a caller may retry.
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InsufficientSpace { .. } | Self::InsufficientEntries { .. }
        )
    }

    /// Returns `true` if this error means no ring was produced.
    #[inline]
    pub fn is_construction(&self) -> bool {
        matches!(
            self,
            Self::InvalidCapacity { .. }
                | Self::NameTooLong { .. }
                | Self::AllocationFailure { .. }
                | Self::StorageTooSmall { .. }
                | Self::MisalignedStorage { .. }
        )
    }
}
