use crate::sync::spin_loop;

/// Exponential spin for the tail-publish wait.
///
/// Grows the number of PAUSE hints per round up to a cap and then keeps
/// spinning at that cap. It never yields or parks: a waiter stays on-CPU until
/// the reservation ahead of it is published. This makes the wait lock-free but
/// not starvation-free.
#[derive(Debug)]
pub(crate) struct Backoff {
    step: u32,
}

impl Backoff {
    // 2^6 = 64 hints per round at most. Under loom every hint is a yield point.
    const SPIN_LIMIT: u32 = if cfg!(feature = "loom") { 0 } else { 6 };

    #[inline]
    pub(crate) fn new() -> Self {
        Self { step: 0 }
    }

    /// One round of PAUSE hints, doubling up to the cap.
    #[inline]
    pub(crate) fn spin(&mut self) {
        for _ in 0..1u32 << self.step {
            spin_loop();
        }
        if self.step < Self::SPIN_LIMIT {
            self.step += 1;
        }
    }
}

#[cfg(all(test, not(feature = "loom")))]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_progression() {
        let mut b = Backoff::new();
        assert_eq!(b.step, 0);

        b.spin();
        assert_eq!(b.step, 1);

        for _ in 0..Backoff::SPIN_LIMIT {
            b.spin();
        }
        assert_eq!(b.step, Backoff::SPIN_LIMIT);

        // Stays at the cap
        b.spin();
        assert_eq!(b.step, Backoff::SPIN_LIMIT);
    }
}
