use crate::sync::{AtomicU64, Ordering};

/// Per-ring operation counters, kept only when `Config::enable_metrics` is set.
pub(crate) struct Metrics {
    enqueue_success_bulk: AtomicU64,
    enqueue_success_objs: AtomicU64,
    enqueue_quota_bulk: AtomicU64,
    enqueue_fail_bulk: AtomicU64,
    dequeue_success_bulk: AtomicU64,
    dequeue_success_objs: AtomicU64,
    dequeue_fail_bulk: AtomicU64,
}

impl Metrics {
    pub(crate) fn new() -> Self {
        Self {
            enqueue_success_bulk: AtomicU64::new(0),
            enqueue_success_objs: AtomicU64::new(0),
            enqueue_quota_bulk: AtomicU64::new(0),
            enqueue_fail_bulk: AtomicU64::new(0),
            dequeue_success_bulk: AtomicU64::new(0),
            dequeue_success_objs: AtomicU64::new(0),
            dequeue_fail_bulk: AtomicU64::new(0),
        }
    }

    #[inline]
    pub(crate) fn record_enqueue(&self, count: usize, congested: bool) {
        self.enqueue_success_bulk.fetch_add(1, Ordering::Relaxed);
        self.enqueue_success_objs
            .fetch_add(count as u64, Ordering::Relaxed);
        if congested {
            self.enqueue_quota_bulk.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[inline]
    pub(crate) fn record_enqueue_failure(&self) {
        self.enqueue_fail_bulk.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_dequeue(&self, count: usize) {
        self.dequeue_success_bulk.fetch_add(1, Ordering::Relaxed);
        self.dequeue_success_objs
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_dequeue_failure(&self) {
        self.dequeue_fail_bulk.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            enqueue_success_bulk: self.enqueue_success_bulk.load(Ordering::Relaxed),
            enqueue_success_objs: self.enqueue_success_objs.load(Ordering::Relaxed),
            enqueue_quota_bulk: self.enqueue_quota_bulk.load(Ordering::Relaxed),
            enqueue_fail_bulk: self.enqueue_fail_bulk.load(Ordering::Relaxed),
            dequeue_success_bulk: self.dequeue_success_bulk.load(Ordering::Relaxed),
            dequeue_success_objs: self.dequeue_success_objs.load(Ordering::Relaxed),
            dequeue_fail_bulk: self.dequeue_fail_bulk.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of a ring's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Successful enqueue calls (including zero-count `Partial` calls)
    pub enqueue_success_bulk: u64,
    /// Values written by successful enqueue calls
    pub enqueue_success_objs: u64,
    /// Successful enqueue calls that crossed the watermark
    pub enqueue_quota_bulk: u64,
    /// `Fixed` enqueue calls rejected for lack of space
    pub enqueue_fail_bulk: u64,
    /// Successful dequeue calls (including zero-count `Partial` calls)
    pub dequeue_success_bulk: u64,
    /// Values read by successful dequeue calls
    pub dequeue_success_objs: u64,
    /// `Fixed` dequeue calls rejected for lack of entries
    pub dequeue_fail_bulk: u64,
}

#[cfg(all(test, not(feature = "loom")))]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let metrics = Metrics::new();
        metrics.record_enqueue(3, false);
        metrics.record_enqueue(2, true);
        metrics.record_enqueue_failure();
        metrics.record_dequeue(4);
        metrics.record_dequeue_failure();

        let snap = metrics.snapshot();
        assert_eq!(snap.enqueue_success_bulk, 2);
        assert_eq!(snap.enqueue_success_objs, 5);
        assert_eq!(snap.enqueue_quota_bulk, 1);
        assert_eq!(snap.enqueue_fail_bulk, 1);
        assert_eq!(snap.dequeue_success_bulk, 1);
        assert_eq!(snap.dequeue_success_objs, 4);
        assert_eq!(snap.dequeue_fail_bulk, 1);
    }
}
