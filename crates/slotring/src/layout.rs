//! In-memory layout of a ring.
//!
//! A ring is one allocation:
//!
//! ```text
//! +---------------------------+  offset 0
//! | name | flags | watermark  |
//! +---------------------------+  cache-line aligned
//! | prod: size mask head tail |
//! +---------------------------+  cache-line aligned
//! | cons: size mask head tail |
//! +---------------------------+  cache-line aligned
//! | slot[0] .. slot[cap - 1]  |
//! +---------------------------+  rounded up to the cache line
//! ```
//!
//! Producer and consumer counters sit on separate cache lines so the two
//! sides do not false-share. The cache-line size is the one
//! `crossbeam_utils::CachePadded` uses for the target.

use crate::sync::{AtomicU32, AtomicUsize};
use crate::RingError;
use crossbeam_utils::CachePadded;
use std::mem::{align_of, size_of};

/// Largest accepted capacity mask. Capacities are powers of two not above this value.
pub const MAX_CAPACITY_MASK: u32 = 0x0fff_ffff;

/// Bytes reserved for the ring name, trailing NUL included.
pub const NAME_SIZE: usize = 32;

/// Alignment of the ring storage and of each block inside it.
pub const CACHE_LINE: usize = align_of::<CachePadded<u8>>();

/// One pointer-sized storage location.
pub(crate) type Slot = AtomicUsize;

/// Index state of one side of the ring.
///
/// `head` is the next sequence to reserve, `tail` the next sequence visible to
/// the opposite side. Both are free-running `u32` counters; the slot index is
/// `sequence & mask`.
#[repr(C)]
pub(crate) struct HeadTail {
    pub(crate) size: u32,
    pub(crate) mask: u32,
    pub(crate) head: AtomicU32,
    pub(crate) tail: AtomicU32,
}

impl HeadTail {
    fn new(capacity: u32) -> Self {
        Self {
            size: capacity,
            mask: capacity - 1,
            head: AtomicU32::new(0),
            tail: AtomicU32::new(0),
        }
    }
}

/// Fixed-size header at the start of the ring storage.
#[repr(C)]
pub(crate) struct RingHeader {
    pub(crate) name: [u8; NAME_SIZE],
    /// `RING_F_*` bits; the single source of the ring's producer/consumer mode.
    pub(crate) flags: u32,
    pub(crate) watermark: AtomicU32,
    pub(crate) prod: CachePadded<HeadTail>,
    pub(crate) cons: CachePadded<HeadTail>,
}

impl RingHeader {
    pub(crate) fn new(name: [u8; NAME_SIZE], capacity: u32, flags: u32) -> Self {
        Self {
            name,
            flags,
            watermark: AtomicU32::new(capacity),
            prod: CachePadded::new(HeadTail::new(capacity)),
            cons: CachePadded::new(HeadTail::new(capacity)),
        }
    }
}

/// Byte offset of `slot[0]` from the start of the storage.
#[inline]
pub(crate) const fn slots_offset() -> usize {
    // size_of is a multiple of align_of, which is the cache line here.
    size_of::<RingHeader>()
}

/// Rounds `value` up to a multiple of `align` (a power of two).
#[inline]
pub(crate) const fn align_up(value: usize, align: usize) -> usize {
    (value + align - 1) & !(align - 1)
}

/// Returns `true` if `capacity` is a power of two within [`MAX_CAPACITY_MASK`].
#[inline]
pub const fn is_valid_capacity(capacity: u32) -> bool {
    capacity.is_power_of_two() && capacity <= MAX_CAPACITY_MASK
}

/// Bytes of storage a ring of `capacity` slots needs: header plus slots,
/// rounded up to the cache line.
///
/// Size caller-provided memory with this before handing it to
/// [`Ring::init_in`](crate::Ring::init_in).
pub fn compute_storage_size(capacity: u32) -> Result<usize, RingError> {
    if !is_valid_capacity(capacity) {
        return Err(RingError::InvalidCapacity { capacity });
    }
    let size = slots_offset() + capacity as usize * size_of::<Slot>();
    Ok(align_up(size, CACHE_LINE))
}

/// Packs `name` into the fixed label, leaving room for a trailing NUL.
pub(crate) fn encode_name(name: &str) -> Result<[u8; NAME_SIZE], RingError> {
    let bytes = name.as_bytes();
    if bytes.len() >= NAME_SIZE {
        return Err(RingError::NameTooLong {
            len: bytes.len(),
            max: NAME_SIZE - 1,
        });
    }
    let mut label = [0u8; NAME_SIZE];
    label[..bytes.len()].copy_from_slice(bytes);
    Ok(label)
}

/// Reads the label back up to its first NUL.
pub(crate) fn decode_name(label: &[u8; NAME_SIZE]) -> &str {
    let len = label.iter().position(|&b| b == 0).unwrap_or(NAME_SIZE);
    std::str::from_utf8(&label[..len]).unwrap_or_default()
}
