use crate::backoff::Backoff;
use crate::copy::{read_slots, write_slots};
use crate::invariants::{
    debug_assert_bounded_range, debug_assert_fits, debug_assert_occupancy,
    debug_assert_publish_in_order,
};
use crate::layout::{self, HeadTail, RingHeader, Slot, NAME_SIZE};
use crate::memory::Storage;
use crate::metrics::{Metrics, MetricsSnapshot};
use crate::sync::{spin_loop, Ordering};
use crate::trace_macro::ring_trace;
use crate::{Config, RingError, RingFlags, SlotValue};
use std::fmt;
use std::marker::PhantomData;
use std::ptr::{self, NonNull};
use std::slice;

// =============================================================================
// MEMORY ORDERING & SYNCHRONIZATION STRATEGY
// =============================================================================
//
// Each side (prod, cons) has a `head` and a `tail`. All four are free-running
// u32 counters; a slot index is `counter & mask`.
//
// ## Reservation
//
// A producer reserves `[head, next)` on `prod.head`:
// 1. Load `prod.head` with Relaxed
// 2. Load `cons.tail` with Acquire (consumers are done reading freed slots)
// 3. free = capacity - (head - cons.tail)
// 4. Single producer: plain store of `next`. Multi producer: CAS `head -> next`,
//    retrying immediately with fresh loads when another producer won.
//
// Consumers do the same on `cons.head`, against `prod.tail` (Acquire), so
// that slot contents written before the producer's publish are visible.
//
// ## Publish
//
// After copying, the reserving thread stores `tail = next` with Release. With
// several producers (or consumers) a thread first spins until `tail` equals
// its own reserved `head`, so tails only ever move over fully written ranges
// and in reservation order. That wait loads `tail` with Acquire: the next
// publisher's Release store then carries the earlier publishers' writes along
// with its own.
//
// ## Slots
//
// Slots are `AtomicUsize` accessed with Relaxed loads and stores. Ordering
// comes entirely from the tail Release/Acquire pairs above.
//
// ## Progress
//
// Lock-free, not starvation-free. A thread preempted between reservation and
// publish makes later publishers on the same side spin until it resumes.
//
// =============================================================================

/// How a bulk call treats a request that does not fit entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Behavior {
    /// All or nothing: fail without touching the ring if `n` values do not fit.
    #[default]
    Fixed,
    /// Move as many values as fit, possibly zero.
    Partial,
}

/// Result of a successful enqueue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnqueueOutcome {
    /// Values written.
    pub count: usize,
    /// Free slots left right after this reservation.
    pub free: usize,
    /// Occupancy after this enqueue is above the watermark.
    ///
    /// Soft backpressure: the values were written, but producers should
    /// throttle before the ring is physically full.
    pub congested: bool,
}

/// Result of a successful dequeue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DequeueOutcome {
    /// Values read into the front of the output slice.
    pub count: usize,
    /// Entries left right after this reservation.
    pub remaining: usize,
}

/// A range `[head, next)` claimed on one side, plus the room left after it.
#[derive(Debug, Clone, Copy)]
struct Reservation {
    head: u32,
    next: u32,
    room_after: u32,
}

impl Reservation {
    #[inline]
    fn len(&self) -> usize {
        self.next.wrapping_sub(self.head) as usize
    }
}

/// Fixed-capacity lock-free ring of pointer-sized values.
///
/// The producer and consumer modes are picked once, at creation, through
/// [`RingFlags`]; every enqueue and dequeue then dispatches on them.
///
/// Share a ring between threads with `Arc<Ring<V>>`. For single-producer
/// (resp. single-consumer) rings the caller must make sure only one thread
/// ever enqueues (resp. dequeues); the ring does not check this.
pub struct Ring<V: SlotValue = usize> {
    storage: Storage,
    metrics: Option<Metrics>,
    _marker: PhantomData<fn(V) -> V>,
}

// SAFETY: all shared state lives in atomics inside `storage`, and stored values
// are plain words the ring never dereferences.
unsafe impl<V: SlotValue> Send for Ring<V> {}
unsafe impl<V: SlotValue> Sync for Ring<V> {}

impl<V: SlotValue> Ring<V> {
    /// Creates a ring with `capacity` slots on freshly allocated, zeroed,
    /// cache-aligned memory.
    ///
    /// `capacity` must be a power of two no larger than
    /// [`MAX_CAPACITY_MASK`](crate::MAX_CAPACITY_MASK), and `name` must be
    /// shorter than [`NAME_SIZE`] bytes.
    pub fn create(name: &str, capacity: u32, flags: RingFlags) -> Result<Self, RingError> {
        Self::with_config(name, Config::new(capacity, flags))
    }

    /// Creates a ring from a full [`Config`].
    pub fn with_config(name: &str, config: Config) -> Result<Self, RingError> {
        let size = layout::compute_storage_size(config.capacity)?;
        let label = layout::encode_name(name)?;
        let storage = Storage::allocate(size)?;

        // SAFETY: the storage is fresh, `size` bytes long for this capacity,
        // and not visible to any other thread yet.
        Ok(unsafe { Self::init(storage, label, config) })
    }

    /// Creates a ring inside caller-provided memory, such as an `mmap`ed region.
    ///
    /// `len` must be at least [`compute_storage_size`](crate::compute_storage_size)
    /// for `capacity`, and `mem` must be aligned to [`CACHE_LINE`](crate::CACHE_LINE).
    /// The memory does not need to be zeroed. It is never freed by the ring.
    ///
    /// # Safety
    ///
    /// `mem` must be valid for reads and writes of `len` bytes for the whole
    /// lifetime of the returned ring, and nothing else may access it meanwhile.
    pub unsafe fn init_in(
        mem: NonNull<u8>,
        len: usize,
        name: &str,
        capacity: u32,
        flags: RingFlags,
    ) -> Result<Self, RingError> {
        let size = layout::compute_storage_size(capacity)?;
        let label = layout::encode_name(name)?;
        let storage = Storage::borrowed(mem, len, size)?;
        Ok(Self::init(storage, label, Config::new(capacity, flags)))
    }

    /// Writes the header and slots. Single-threaded, before the ring is shared.
    ///
    /// # Safety
    ///
    /// `storage` must be at least `compute_storage_size(config.capacity)` bytes,
    /// cache-aligned, and exclusively ours.
    unsafe fn init(storage: Storage, label: [u8; NAME_SIZE], config: Config) -> Self {
        let capacity = config.capacity;
        let base = storage.as_ptr().as_ptr();

        base.cast::<RingHeader>()
            .write(RingHeader::new(label, capacity, config.flags.bits()));
        let slots = base.add(layout::slots_offset()).cast::<Slot>();
        for i in 0..capacity as usize {
            slots.add(i).write(Slot::new(0));
        }

        ring_trace!(
            ring = layout::decode_name(&label),
            capacity,
            single_producer = config.flags.single_producer,
            single_consumer = config.flags.single_consumer,
            owned = storage.is_owned(),
            "ring created"
        );

        Self {
            storage,
            metrics: config.enable_metrics.then(Metrics::new),
            _marker: PhantomData,
        }
    }

    // ---------------------------------------------------------------------
    // LAYOUT ACCESS
    // ---------------------------------------------------------------------

    #[inline]
    fn header(&self) -> &RingHeader {
        // SAFETY: init wrote a RingHeader at the start of the storage, which
        // lives as long as self.
        unsafe { self.storage.as_ptr().cast::<RingHeader>().as_ref() }
    }

    /// The slot array, `capacity` entries long.
    #[inline]
    fn slots(&self) -> &[Slot] {
        // SAFETY: init wrote `capacity` slots at slots_offset(); the storage
        // lives as long as self.
        unsafe {
            let first = self
                .storage
                .as_ptr()
                .as_ptr()
                .add(layout::slots_offset())
                .cast::<Slot>();
            slice::from_raw_parts(first, self.header().prod.size as usize)
        }
    }

    // ---------------------------------------------------------------------
    // CONSTANTS & STATUS
    // ---------------------------------------------------------------------

    /// Returns the ring name.
    pub fn name(&self) -> &str {
        layout::decode_name(&self.header().name)
    }

    /// Returns the producer/consumer mode chosen at creation.
    #[inline]
    pub fn flags(&self) -> RingFlags {
        RingFlags::from_bits(self.header().flags)
    }

    /// Returns the number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.header().prod.size as usize
    }

    /// Returns the index mask (`capacity - 1`).
    #[inline]
    pub fn mask(&self) -> u32 {
        self.header().prod.mask
    }

    /// Returns the bytes of storage backing this ring.
    pub fn storage_size(&self) -> usize {
        self.storage.size()
    }

    /// Returns the number of published entries not yet freed by consumers.
    ///
    /// A snapshot: concurrent operations may change it right away.
    pub fn count(&self) -> usize {
        let header = self.header();
        // cons.tail first: reading it second could see it pass a stale prod.tail.
        let cons_tail = header.cons.tail.load(Ordering::Acquire);
        let prod_tail = header.prod.tail.load(Ordering::Acquire);
        prod_tail.wrapping_sub(cons_tail).min(header.prod.size) as usize
    }

    /// Returns the number of free slots.
    pub fn free_count(&self) -> usize {
        self.capacity() - self.count()
    }

    /// Returns true if the ring holds no published entries.
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Returns true if every slot is occupied.
    pub fn is_full(&self) -> bool {
        self.count() == self.capacity()
    }

    /// Returns the current watermark. Defaults to the capacity.
    pub fn watermark(&self) -> u32 {
        self.header().watermark.load(Ordering::Relaxed)
    }

    /// Sets the occupancy above which enqueues report `congested`.
    ///
    /// A plain store: enqueues racing with this call may use either value.
    pub fn set_watermark(&self, count: u32) -> Result<(), RingError> {
        let capacity = self.header().prod.size;
        if count > capacity {
            return Err(RingError::InvalidWatermark { count, capacity });
        }
        self.header().watermark.store(count, Ordering::Relaxed);
        Ok(())
    }

    /// Get a snapshot of metrics if enabled.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics
            .as_ref()
            .map_or_else(MetricsSnapshot::default, Metrics::snapshot)
    }

    // ---------------------------------------------------------------------
    // PRODUCER API
    // ---------------------------------------------------------------------

    /// Enqueues `values`, dispatching on the ring's producer mode.
    ///
    /// With [`Behavior::Fixed`] either every value is written or the call fails
    /// with [`RingError::InsufficientSpace`] and the ring is untouched. With
    /// [`Behavior::Partial`] as many values as fit are written, from the front
    /// of `values`, and the call never fails.
    pub fn enqueue_bulk(
        &self,
        values: &[V],
        behavior: Behavior,
    ) -> Result<EnqueueOutcome, RingError> {
        let result = self.do_enqueue(values, behavior, self.flags().single_producer);

        if let Some(metrics) = &self.metrics {
            match &result {
                Ok(outcome) => metrics.record_enqueue(outcome.count, outcome.congested),
                Err(_) => metrics.record_enqueue_failure(),
            }
        }

        result
    }

    /// Enqueues one value, all or nothing.
    #[inline]
    pub fn enqueue_one(&self, value: V) -> Result<EnqueueOutcome, RingError> {
        self.enqueue_bulk(&[value], Behavior::Fixed)
    }

    /// Enqueues as many of `values` as fit (the `Partial` bulk call).
    #[inline]
    pub fn enqueue_burst(&self, values: &[V]) -> EnqueueOutcome {
        self.enqueue_bulk(values, Behavior::Partial)
            .unwrap_or_default()
    }

    fn do_enqueue(
        &self,
        values: &[V],
        behavior: Behavior,
        single: bool,
    ) -> Result<EnqueueOutcome, RingError> {
        let header = self.header();
        let reservation = self.move_prod_head(values.len(), behavior, single)?;

        let n = reservation.len();
        if n == 0 {
            return Ok(EnqueueOutcome {
                count: 0,
                free: reservation.room_after as usize,
                congested: false,
            });
        }

        write_slots(self.slots(), reservation.head, &values[..n]);
        debug_assert_occupancy!(
            header.cons.tail.load(Ordering::Acquire),
            reservation.next,
            header.prod.size
        );
        publish(&header.prod, reservation, single);

        let used = header.prod.size - reservation.room_after;
        let watermark = header.watermark.load(Ordering::Relaxed);
        let congested = used > watermark;
        if congested {
            ring_trace!(used, watermark, "enqueue crossed watermark");
        }

        Ok(EnqueueOutcome {
            count: n,
            free: reservation.room_after as usize,
            congested,
        })
    }

    /// Claims up to `requested` producer slots.
    fn move_prod_head(
        &self,
        requested: usize,
        behavior: Behavior,
        single: bool,
    ) -> Result<Reservation, RingError> {
        let prod = &self.header().prod;
        let cons = &self.header().cons;
        let capacity = prod.size;

        loop {
            let head = prod.head.load(Ordering::Relaxed);
            let cons_tail = cons.tail.load(Ordering::Acquire);

            let used = head.wrapping_sub(cons_tail);
            if used > capacity {
                // Our head is older than cons_tail: another producer moved on.
                spin_loop();
                continue;
            }
            let free = capacity - used;

            let Some(n) = clamp(requested, free, behavior) else {
                ring_trace!(requested, free, "enqueue rejected, insufficient space");
                return Err(RingError::InsufficientSpace {
                    requested,
                    free: free as usize,
                });
            };
            debug_assert_fits!(n, free, capacity);

            let next = head.wrapping_add(n);
            let reservation = Reservation {
                head,
                next,
                room_after: free - n,
            };
            if n == 0 {
                return Ok(reservation);
            }

            if single {
                prod.head.store(next, Ordering::Relaxed);
                return Ok(reservation);
            }
            if prod
                .head
                .compare_exchange_weak(head, next, Ordering::Relaxed, Ordering::Relaxed)
                .is_ok()
            {
                return Ok(reservation);
            }
            // Lost the race: retry at once with fresh state.
        }
    }

    // ---------------------------------------------------------------------
    // CONSUMER API
    // ---------------------------------------------------------------------

    /// Dequeues into `out`, dispatching on the ring's consumer mode.
    ///
    /// With [`Behavior::Fixed`] either `out` is filled entirely or the call fails
    /// with [`RingError::InsufficientEntries`] and the ring is untouched. With
    /// [`Behavior::Partial`] the front `count` elements of `out` are filled with
    /// whatever is available and the rest are left as they were.
    pub fn dequeue_bulk(
        &self,
        out: &mut [V],
        behavior: Behavior,
    ) -> Result<DequeueOutcome, RingError> {
        let result = self.do_dequeue(out, behavior, self.flags().single_consumer);

        if let Some(metrics) = &self.metrics {
            match &result {
                Ok(outcome) => metrics.record_dequeue(outcome.count),
                Err(_) => metrics.record_dequeue_failure(),
            }
        }

        result
    }

    /// Dequeues one value.
    #[inline]
    pub fn dequeue_one(&self) -> Result<V, RingError> {
        let mut out = [V::from_slot(0)];
        self.dequeue_bulk(&mut out, Behavior::Fixed)?;
        Ok(out[0])
    }

    /// Dequeues as many values as are available, up to `out.len()` (the
    /// `Partial` bulk call).
    #[inline]
    pub fn dequeue_burst(&self, out: &mut [V]) -> DequeueOutcome {
        self.dequeue_bulk(out, Behavior::Partial)
            .unwrap_or_default()
    }

    fn do_dequeue(
        &self,
        out: &mut [V],
        behavior: Behavior,
        single: bool,
    ) -> Result<DequeueOutcome, RingError> {
        let reservation = self.move_cons_head(out.len(), behavior, single)?;

        let n = reservation.len();
        if n > 0 {
            let header = self.header();
            read_slots(self.slots(), reservation.head, &mut out[..n]);
            debug_assert_occupancy!(
                reservation.head,
                header.prod.tail.load(Ordering::Acquire),
                header.cons.size
            );
            publish(&header.cons, reservation, single);
        }

        Ok(DequeueOutcome {
            count: n,
            remaining: reservation.room_after as usize,
        })
    }

    /// Claims up to `requested` published entries.
    fn move_cons_head(
        &self,
        requested: usize,
        behavior: Behavior,
        single: bool,
    ) -> Result<Reservation, RingError> {
        let prod = &self.header().prod;
        let cons = &self.header().cons;
        let capacity = cons.size;

        loop {
            let head = cons.head.load(Ordering::Relaxed);
            let prod_tail = prod.tail.load(Ordering::Acquire);

            let entries = prod_tail.wrapping_sub(head);
            if entries > capacity {
                // Our head is older than the published range: another consumer moved on.
                spin_loop();
                continue;
            }

            let Some(n) = clamp(requested, entries, behavior) else {
                ring_trace!(requested, entries, "dequeue rejected, insufficient entries");
                return Err(RingError::InsufficientEntries {
                    requested,
                    available: entries as usize,
                });
            };
            debug_assert_fits!(n, entries, capacity);

            let next = head.wrapping_add(n);
            let reservation = Reservation {
                head,
                next,
                room_after: entries - n,
            };
            if n == 0 {
                return Ok(reservation);
            }

            if single {
                cons.head.store(next, Ordering::Relaxed);
                return Ok(reservation);
            }
            if cons
                .head
                .compare_exchange_weak(head, next, Ordering::Relaxed, Ordering::Relaxed)
                .is_ok()
            {
                return Ok(reservation);
            }
        }
    }
}

/// Number of slots a request may take, or `None` if a `Fixed` request does not fit.
#[inline]
fn clamp(requested: usize, room: u32, behavior: Behavior) -> Option<u32> {
    match behavior {
        Behavior::Fixed if requested > room as usize => None,
        // min() keeps the result within u32
        _ => Some(requested.min(room as usize) as u32),
    }
}

/// Advances `side.tail` over a filled reservation, in reservation order.
#[inline]
fn publish(side: &HeadTail, reservation: Reservation, single: bool) {
    if !single {
        // Wait for every earlier reservation on this side to publish.
        let mut backoff = Backoff::new();
        while side.tail.load(Ordering::Acquire) != reservation.head {
            backoff.spin();
        }
    }

    debug_assert_publish_in_order!(
        "ring",
        side.tail.load(Ordering::Relaxed),
        reservation.head
    );
    debug_assert_bounded_range!(reservation.head, reservation.next, side.size);

    side.tail.store(reservation.next, Ordering::Release);
}

impl<V: SlotValue> fmt::Debug for Ring<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = self.header();
        f.debug_struct("Ring")
            .field("name", &self.name())
            .field("flags", &self.flags())
            .field("capacity", &header.prod.size)
            .field("watermark", &self.watermark())
            .field("prod_head", &header.prod.head.load(Ordering::Relaxed))
            .field("prod_tail", &header.prod.tail.load(Ordering::Relaxed))
            .field("cons_head", &header.cons.head.load(Ordering::Relaxed))
            .field("cons_tail", &header.cons.tail.load(Ordering::Relaxed))
            .field("used", &self.count())
            .field("avail", &self.free_count())
            .field("storage_size", &self.storage.size())
            .field("owned_storage", &self.storage.is_owned())
            .finish()
    }
}

impl<V: SlotValue> Drop for Ring<V> {
    fn drop(&mut self) {
        let capacity = self.header().prod.size as usize;
        let base = self.storage.as_ptr().as_ptr();

        // SAFETY: init wrote a header and `capacity` slots there, and &mut self
        // means no reservation is in flight. The storage itself is released
        // (if owned) when the field drops after this.
        unsafe {
            let slots = base.add(layout::slots_offset()).cast::<Slot>();
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(slots, capacity));
            ptr::drop_in_place(base.cast::<RingHeader>());
        }
    }
}

#[cfg(all(test, not(feature = "loom")))]
mod tests {
    use super::*;

    fn spsc(capacity: u32) -> Ring {
        Ring::create("test", capacity, RingFlags::SPSC).unwrap()
    }

    #[test]
    fn test_create_initial_state() {
        let ring = Ring::<usize>::create("rx-queue", 16, RingFlags::MPSC).unwrap();
        assert_eq!(ring.name(), "rx-queue");
        assert_eq!(ring.capacity(), 16);
        assert_eq!(ring.mask(), 15);
        assert_eq!(ring.watermark(), 16);
        assert_eq!(ring.flags(), RingFlags::MPSC);
        assert!(ring.is_empty());
        assert_eq!(ring.free_count(), 16);
        assert_eq!(
            ring.storage_size(),
            layout::compute_storage_size(16).unwrap()
        );
    }

    #[test]
    fn test_create_rejects_bad_input() {
        assert_eq!(
            Ring::<usize>::create("r", 12, RingFlags::SPSC).err(),
            Some(RingError::InvalidCapacity { capacity: 12 })
        );
        assert_eq!(
            Ring::<usize>::create(&"n".repeat(NAME_SIZE), 8, RingFlags::SPSC).err(),
            Some(RingError::NameTooLong {
                len: NAME_SIZE,
                max: NAME_SIZE - 1
            })
        );
    }

    #[test]
    fn test_fixed_enqueue_is_all_or_nothing() {
        let ring = spsc(4);
        ring.enqueue_bulk(&[1, 2, 3], Behavior::Fixed).unwrap();

        let err = ring.enqueue_bulk(&[4, 5], Behavior::Fixed).unwrap_err();
        assert_eq!(
            err,
            RingError::InsufficientSpace {
                requested: 2,
                free: 1
            }
        );
        assert_eq!(ring.count(), 3);

        let mut out = [0; 3];
        ring.dequeue_bulk(&mut out, Behavior::Fixed).unwrap();
        assert_eq!(out, [1, 2, 3]);
    }

    #[test]
    fn test_partial_enqueue_clamps() {
        let ring = spsc(4);
        let outcome = ring.enqueue_bulk(&[1, 2, 3, 4, 5, 6], Behavior::Partial).unwrap();
        assert_eq!(outcome.count, 4);
        assert_eq!(outcome.free, 0);
        assert!(ring.is_full());

        let outcome = ring.enqueue_burst(&[7]);
        assert_eq!(outcome, EnqueueOutcome { count: 0, free: 0, congested: false });
    }

    #[test]
    fn test_partial_dequeue_clamps() {
        let ring = spsc(8);
        ring.enqueue_bulk(&[10, 20], Behavior::Fixed).unwrap();

        let mut out = [0; 5];
        let outcome = ring.dequeue_burst(&mut out);
        assert_eq!(outcome, DequeueOutcome { count: 2, remaining: 0 });
        assert_eq!(out, [10, 20, 0, 0, 0]);

        let outcome = ring.dequeue_burst(&mut out);
        assert_eq!(outcome.count, 0);
    }

    #[test]
    fn test_fixed_dequeue_is_all_or_nothing() {
        let ring = spsc(8);
        ring.enqueue_one(1).unwrap();

        let mut out = [0; 2];
        assert_eq!(
            ring.dequeue_bulk(&mut out, Behavior::Fixed),
            Err(RingError::InsufficientEntries {
                requested: 2,
                available: 1
            })
        );
        assert_eq!(ring.count(), 1);
        assert_eq!(ring.dequeue_one(), Ok(1));
        assert!(ring.dequeue_one().unwrap_err().is_recoverable());
    }

    #[test]
    fn test_zero_length_calls_are_noops() {
        let ring = spsc(4);
        let outcome = ring.enqueue_bulk(&[], Behavior::Fixed).unwrap();
        assert_eq!(outcome.count, 0);
        assert_eq!(outcome.free, 4);

        let mut out: [usize; 0] = [];
        assert_eq!(ring.dequeue_bulk(&mut out, Behavior::Fixed).unwrap().count, 0);
        assert!(ring.is_empty());
    }

    #[test]
    fn test_watermark_signal() {
        let ring = spsc(8);
        ring.set_watermark(4).unwrap();

        let outcome = ring.enqueue_bulk(&[1, 2, 3, 4], Behavior::Fixed).unwrap();
        assert!(!outcome.congested, "at the watermark is not above it");

        let outcome = ring.enqueue_one(5).unwrap();
        assert!(outcome.congested);
        assert_eq!(ring.count(), 5);
    }

    #[test]
    fn test_invalid_watermark_keeps_previous() {
        let ring = spsc(8);
        ring.set_watermark(6).unwrap();
        assert_eq!(
            ring.set_watermark(9),
            Err(RingError::InvalidWatermark {
                count: 9,
                capacity: 8
            })
        );
        assert_eq!(ring.watermark(), 6);
    }

    #[test]
    fn test_multi_paths_single_thread() {
        let ring = Ring::<usize>::create("mpmc", 8, RingFlags::MPMC).unwrap();
        for round in 0..10 {
            let values: Vec<usize> = (0..5).map(|i| round * 10 + i).collect();
            ring.enqueue_bulk(&values, Behavior::Fixed).unwrap();
            let mut out = [0; 5];
            ring.dequeue_bulk(&mut out, Behavior::Fixed).unwrap();
            assert_eq!(out.as_slice(), values.as_slice());
        }
        assert!(ring.is_empty());
    }

    #[test]
    fn test_metrics_disabled_by_default() {
        let ring = spsc(4);
        ring.enqueue_one(1).unwrap();
        assert_eq!(ring.metrics(), MetricsSnapshot::default());
    }

    #[test]
    fn test_metrics_enabled() {
        let config = Config::new(4, RingFlags::SPSC).with_metrics(true);
        let ring = Ring::<usize>::with_config("m", config).unwrap();
        ring.set_watermark(2).unwrap();

        ring.enqueue_bulk(&[1, 2, 3], Behavior::Fixed).unwrap();
        assert!(ring.enqueue_bulk(&[4, 5], Behavior::Fixed).is_err());
        let mut out = [0; 2];
        ring.dequeue_bulk(&mut out, Behavior::Fixed).unwrap();
        assert!(ring.dequeue_bulk(&mut out, Behavior::Fixed).is_err());

        let snap = ring.metrics();
        assert_eq!(snap.enqueue_success_bulk, 1);
        assert_eq!(snap.enqueue_success_objs, 3);
        assert_eq!(snap.enqueue_quota_bulk, 1);
        assert_eq!(snap.enqueue_fail_bulk, 1);
        assert_eq!(snap.dequeue_success_bulk, 1);
        assert_eq!(snap.dequeue_success_objs, 2);
        assert_eq!(snap.dequeue_fail_bulk, 1);
    }

    #[test]
    fn test_debug_dump() {
        let ring = spsc(4);
        ring.enqueue_bulk(&[1, 2], Behavior::Fixed).unwrap();
        let dump = format!("{ring:?}");
        assert!(dump.contains("name: \"test\""));
        assert!(dump.contains("used: 2"));
        assert!(dump.contains("avail: 2"));
        assert!(dump.contains("prod_tail: 2"));
    }

    #[test]
    fn test_counters_roll_over_u32() {
        for flags in [RingFlags::SPSC, RingFlags::MPMC] {
            let ring = Ring::<usize>::create("wrap", 8, flags).unwrap();
            let start = u32::MAX - 2;
            for side in [&ring.header().prod, &ring.header().cons] {
                side.head.store(start, Ordering::Relaxed);
                side.tail.store(start, Ordering::Relaxed);
            }
            ring.set_watermark(4).unwrap();

            let outcome = ring.enqueue_bulk(&[1, 2, 3, 4, 5, 6], Behavior::Fixed).unwrap();
            assert_eq!(outcome, EnqueueOutcome { count: 6, free: 2, congested: true });
            assert_eq!(ring.header().prod.tail.load(Ordering::Relaxed), start.wrapping_add(6));
            assert_eq!(ring.count(), 6, "{flags:?}");

            assert_eq!(
                ring.enqueue_bulk(&[7, 8, 9], Behavior::Fixed),
                Err(RingError::InsufficientSpace { requested: 3, free: 2 })
            );
            assert_eq!(ring.count(), 6);

            let outcome = ring.enqueue_bulk(&[7, 8, 9], Behavior::Partial).unwrap();
            assert_eq!(outcome.count, 2);
            assert_eq!(outcome.free, 0);
            assert!(ring.is_full());

            let mut out = [0; 3];
            let outcome = ring.dequeue_bulk(&mut out, Behavior::Fixed).unwrap();
            assert_eq!(outcome, DequeueOutcome { count: 3, remaining: 5 });
            assert_eq!(out, [1, 2, 3]);

            // Refill to 6 entries: above the watermark again.
            assert!(ring.enqueue_one(10).unwrap().congested);
            assert_eq!(ring.count(), 6);

            let mut out = [0; 8];
            assert_eq!(
                ring.dequeue_bulk(&mut out, Behavior::Fixed),
                Err(RingError::InsufficientEntries { requested: 8, available: 6 })
            );
            let outcome = ring.dequeue_burst(&mut out);
            assert_eq!(outcome.count, 6);
            assert_eq!(&out[..6], &[4, 5, 6, 7, 8, 10]);
            assert!(ring.is_empty(), "{flags:?}");
            assert_eq!(ring.header().cons.tail.load(Ordering::Relaxed), start.wrapping_add(9));
        }
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(3, 5, Behavior::Fixed), Some(3));
        assert_eq!(clamp(6, 5, Behavior::Fixed), None);
        assert_eq!(clamp(6, 5, Behavior::Partial), Some(5));
        assert_eq!(clamp(usize::MAX, 0, Behavior::Partial), Some(0));
    }
}
