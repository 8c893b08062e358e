//! Wrap-aware block copy between a caller buffer and the circular slot array.
//!
//! A range of `len` sequences starting at `start` maps to at most two linear
//! runs of slots: `[start & mask, capacity)` and then `[0, rest)`. Every
//! enqueue and dequeue path goes through [`for_each_run`] so that this is the
//! only place that does index arithmetic on the slot array.

use crate::layout::Slot;
use crate::sync::Ordering;
use crate::SlotValue;

/// Calls `f(run, offset)` for each linear run covering `len` slots from `start`.
///
/// `offset` is the position of the run's first slot within the caller buffer.
/// `slots.len()` must be a power of two and `len` must not exceed it.
#[inline]
fn for_each_run<F>(slots: &[Slot], start: u32, len: usize, mut f: F)
where
    F: FnMut(&[Slot], usize),
{
    debug_assert!(slots.len().is_power_of_two());
    debug_assert!(len <= slots.len());

    let mask = slots.len() - 1;
    let idx = start as usize & mask;
    let first = len.min(slots.len() - idx);

    f(&slots[idx..idx + first], 0);
    if first < len {
        f(&slots[..len - first], first);
    }
}

/// Writes `values` into the slots reserved at `start`.
#[inline]
pub(crate) fn write_slots<V: SlotValue>(slots: &[Slot], start: u32, values: &[V]) {
    for_each_run(slots, start, values.len(), |run, offset| {
        for (slot, value) in run.iter().zip(&values[offset..]) {
            slot.store(value.into_slot(), Ordering::Relaxed);
        }
    });
}

/// Reads the slots reserved at `start` into `out`.
#[inline]
pub(crate) fn read_slots<V: SlotValue>(slots: &[Slot], start: u32, out: &mut [V]) {
    let len = out.len();
    for_each_run(slots, start, len, |run, offset| {
        for (slot, value) in run.iter().zip(&mut out[offset..]) {
            *value = V::from_slot(slot.load(Ordering::Relaxed));
        }
    });
}

#[cfg(all(test, not(feature = "loom")))]
mod tests {
    use super::*;

    fn slots(capacity: usize) -> Vec<Slot> {
        (0..capacity).map(|_| Slot::new(0)).collect()
    }

    fn raw(slots: &[Slot]) -> Vec<usize> {
        slots.iter().map(|s| s.load(Ordering::Relaxed)).collect()
    }

    #[test]
    fn test_linear_copy() {
        let ring = slots(8);
        write_slots(&ring, 2, &[10usize, 11, 12]);
        assert_eq!(raw(&ring), vec![0, 0, 10, 11, 12, 0, 0, 0]);

        let mut out = [0usize; 3];
        read_slots(&ring, 2, &mut out);
        assert_eq!(out, [10, 11, 12]);
    }

    #[test]
    fn test_copy_wraps_at_capacity() {
        let ring = slots(8);
        // capacity 8, starting index 6, five values: 6, 7, 0, 1, 2
        write_slots(&ring, 6, &[1usize, 2, 3, 4, 5]);
        assert_eq!(raw(&ring), vec![3, 4, 5, 0, 0, 0, 1, 2]);

        let mut out = [0usize; 5];
        read_slots(&ring, 6, &mut out);
        assert_eq!(out, [1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_sequence_past_u32_wrap() {
        let ring = slots(4);
        let start = u32::MAX - 1; // slot 2
        write_slots(&ring, start, &[7usize, 8, 9]);
        assert_eq!(raw(&ring), vec![9, 0, 7, 8]);

        let mut out = [0usize; 3];
        read_slots(&ring, start, &mut out);
        assert_eq!(out, [7, 8, 9]);
    }

    #[test]
    fn test_full_ring_and_empty_copy() {
        let ring = slots(4);
        write_slots(&ring, 3, &[1usize, 2, 3, 4]);
        assert_eq!(raw(&ring), vec![2, 3, 4, 1]);

        write_slots::<usize>(&ring, 1, &[]);
        let mut out: [usize; 0] = [];
        read_slots(&ring, 1, &mut out);
        assert_eq!(raw(&ring), vec![2, 3, 4, 1]);
    }
}
