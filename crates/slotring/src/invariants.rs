//! Debug assertion macros for ring index invariants.
//!
//! Only active in debug builds (`debug_assert!`), so release builds pay nothing.
//! All counters are free-running `u32`s, so distances are taken with
//! `wrapping_sub`.

// =============================================================================
// Bounded occupancy
// =============================================================================

/// Assert that a reservation never takes more than the space it observed.
///
/// **Invariant**: `n ≤ free` and `free ≤ capacity` at reservation time
///
/// Used in: producer and consumer head moves, after clamping
macro_rules! debug_assert_fits {
    ($n:expr, $free:expr, $capacity:expr) => {
        debug_assert!(
            $n <= $free && $free <= $capacity,
            "reservation of {} slots exceeds observed room {} (capacity {})",
            $n,
            $free,
            $capacity
        )
    };
}

// =============================================================================
// In-order publish
// =============================================================================

/// Assert that a side's tail is exactly at the start of the range being published.
///
/// **Invariant**: `tail == reserved_head` when publishing `[reserved_head, next)`.
/// Holds trivially for single-producer/consumer rings and is what the
/// spin-wait establishes for the multi variants.
///
/// Used in: `publish()` right before the tail store
macro_rules! debug_assert_publish_in_order {
    ($side:literal, $tail:expr, $head:expr) => {
        debug_assert!(
            $tail == $head,
            "{} tail {} published out of order (reservation starts at {})",
            $side,
            $tail,
            $head
        )
    };
}

/// Assert that a published range is not longer than the ring.
///
/// **Invariant**: `next - head ≤ capacity` (wrapping)
///
/// Used in: `publish()`
macro_rules! debug_assert_bounded_range {
    ($head:expr, $next:expr, $capacity:expr) => {
        debug_assert!(
            $next.wrapping_sub($head) <= $capacity,
            "range [{}, {}) longer than capacity {}",
            $head,
            $next,
            $capacity
        )
    };
}

// =============================================================================
// Occupancy bounds
// =============================================================================

/// Assert that the published occupancy lies within `[0, capacity]`.
///
/// **Invariant**: `cons.tail ≤ prod.tail ≤ cons.tail + capacity` (wrapping).
/// A negative occupancy shows up as a huge wrapped distance, so one
/// comparison covers both bounds.
///
/// Checked between copy and publish. Until this thread publishes, the
/// opposite tail cannot pass its reservation, so the bound holds with other
/// threads running.
///
/// Used in: `do_enqueue()` (`cons.tail` vs `next`) and `do_dequeue()`
/// (`head` vs `prod.tail`), right before `publish()`
macro_rules! debug_assert_occupancy {
    ($cons_tail:expr, $prod_tail:expr, $capacity:expr) => {
        if cfg!(debug_assertions) {
            let cons_tail: u32 = $cons_tail;
            let prod_tail: u32 = $prod_tail;
            assert!(
                prod_tail.wrapping_sub(cons_tail) <= $capacity,
                "occupancy out of bounds: prod.tail {} cons.tail {} (capacity {})",
                prod_tail,
                cons_tail,
                $capacity
            );
        }
    };
}

pub(crate) use debug_assert_bounded_range;
pub(crate) use debug_assert_fits;
pub(crate) use debug_assert_occupancy;
pub(crate) use debug_assert_publish_in_order;

#[cfg(all(test, debug_assertions))]
mod tests {
    #[test]
    fn test_occupancy_within_bounds() {
        debug_assert_occupancy!(5u32, 5u32, 8u32);
        debug_assert_occupancy!(5u32, 13u32, 8u32);
        debug_assert_occupancy!(u32::MAX - 2, 5u32, 8u32);
    }

    #[test]
    #[should_panic(expected = "occupancy out of bounds")]
    fn test_occupancy_above_capacity() {
        debug_assert_occupancy!(0u32, 100u32, 8u32);
    }

    #[test]
    #[should_panic(expected = "occupancy out of bounds")]
    fn test_occupancy_negative() {
        debug_assert_occupancy!(5u32, 0u32, 8u32);
    }
}
