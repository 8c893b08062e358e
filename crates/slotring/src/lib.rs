//! slotring - Fixed-Capacity Lock-Free Ring of Pointer-Sized Slots
//!
//! A bounded ring buffer for handing pointer-width values between any number
//! of producer and consumer threads without locks and without allocating on
//! the hot path.
//!
//! # Key Features
//!
//! - Four access patterns chosen once per ring: single or multi producer,
//!   single or multi consumer
//! - Bulk enqueue/dequeue, all-or-nothing (`Fixed`) or best-effort (`Partial`)
//! - Compare-and-swap head reservation plus in-order tail publish
//! - Watermark for soft backpressure before the ring is full
//! - One cache-aligned allocation: header, producer and consumer blocks on
//!   their own cache lines, then the slot array
//! - Can be laid out in caller-provided memory (see [`Ring::init_in`])
//!
//! # Example
//!
//! ```
//! use slotring::{Behavior, Ring, RingFlags};
//!
//! let ring = Ring::<usize>::create("work", 1024, RingFlags::MPMC).unwrap();
//!
//! // All-or-nothing bulk enqueue
//! ring.enqueue_bulk(&[1, 2, 3], Behavior::Fixed).unwrap();
//!
//! // Best-effort bulk dequeue
//! let mut out = [0usize; 8];
//! let outcome = ring.dequeue_bulk(&mut out, Behavior::Partial).unwrap();
//! assert_eq!(&out[..outcome.count], &[1, 2, 3]);
//! ```
//!
//! # Watermark
//!
//! ```
//! use slotring::{Ring, RingFlags};
//!
//! let ring = Ring::<usize>::create("rx", 8, RingFlags::SPSC).unwrap();
//! ring.set_watermark(2).unwrap();
//!
//! assert!(!ring.enqueue_one(1).unwrap().congested);
//! assert!(!ring.enqueue_one(2).unwrap().congested);
//! assert!(ring.enqueue_one(3).unwrap().congested); // written, but throttle
//! ```

mod trace_macro;

mod backoff;
mod config;
mod copy;
mod error;
mod invariants;
mod layout;
mod memory;
mod metrics;
mod ring;
mod sync;
mod value;

pub use config::{
    Config, RingFlags, HIGH_THROUGHPUT_CONFIG, LOW_LATENCY_CONFIG, RING_F_SC_DEQ, RING_F_SP_ENQ,
};
pub use error::RingError;
pub use layout::{compute_storage_size, is_valid_capacity, CACHE_LINE, MAX_CAPACITY_MASK, NAME_SIZE};
pub use metrics::MetricsSnapshot;
pub use ring::{Behavior, DequeueOutcome, EnqueueOutcome, Ring};
pub use value::SlotValue;
