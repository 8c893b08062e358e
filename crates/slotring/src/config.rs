/// Classic bit for "single-producer enqueue".
pub const RING_F_SP_ENQ: u32 = 0x0001;
/// Classic bit for "single-consumer dequeue".
pub const RING_F_SC_DEQ: u32 = 0x0002;

/// Producer/consumer mode, fixed when the ring is created.
///
/// Single-producer (resp. single-consumer) rings skip the compare-and-swap on
/// the head counter. The caller must guarantee that only one thread ever calls
/// the producer (resp. consumer) side; the ring does not detect violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RingFlags {
    /// Only one thread ever enqueues.
    pub single_producer: bool,
    /// Only one thread ever dequeues.
    pub single_consumer: bool,
}

impl RingFlags {
    /// Any number of producers and consumers.
    pub const MPMC: Self = Self::new(false, false);
    /// Any number of producers, one consumer.
    pub const MPSC: Self = Self::new(false, true);
    /// One producer, any number of consumers.
    pub const SPMC: Self = Self::new(true, false);
    /// One producer, one consumer.
    pub const SPSC: Self = Self::new(true, true);

    /// Creates flags from the two mode switches.
    pub const fn new(single_producer: bool, single_consumer: bool) -> Self {
        Self {
            single_producer,
            single_consumer,
        }
    }

    /// Decodes `RING_F_SP_ENQ | RING_F_SC_DEQ` style bits. Unknown bits are ignored.
    pub const fn from_bits(bits: u32) -> Self {
        Self::new(bits & RING_F_SP_ENQ != 0, bits & RING_F_SC_DEQ != 0)
    }

    /// Encodes the flags as `RING_F_*` bits.
    pub const fn bits(self) -> u32 {
        let mut bits = 0;
        if self.single_producer {
            bits |= RING_F_SP_ENQ;
        }
        if self.single_consumer {
            bits |= RING_F_SC_DEQ;
        }
        bits
    }
}

/// Configuration for a [`Ring`](crate::Ring).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Number of slots, a power of two (validated at creation)
    pub capacity: u32,
    /// Producer/consumer mode
    pub flags: RingFlags,
    /// Enable metrics collection (slight overhead)
    pub enable_metrics: bool,
}

impl Config {
    /// Creates a configuration with metrics disabled.
    pub const fn new(capacity: u32, flags: RingFlags) -> Self {
        Self {
            capacity,
            flags,
            enable_metrics: false,
        }
    }

    /// Sets the producer/consumer mode.
    pub const fn with_flags(mut self, flags: RingFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Turns metrics collection on or off.
    pub const fn with_metrics(mut self, enable: bool) -> Self {
        self.enable_metrics = enable;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(1024, RingFlags::MPMC)
    }
}

/// Low latency configuration (4K slots, one thread per side)
pub const LOW_LATENCY_CONFIG: Config = Config::new(1 << 12, RingFlags::SPSC);

/// High throughput configuration (256K slots, any number of threads per side)
pub const HIGH_THROUGHPUT_CONFIG: Config = Config::new(1 << 18, RingFlags::MPMC);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_bits_roundtrip_presets() {
        assert_eq!(RingFlags::MPMC.bits(), 0);
        assert_eq!(RingFlags::SPSC.bits(), RING_F_SP_ENQ | RING_F_SC_DEQ);
        assert_eq!(RingFlags::from_bits(RING_F_SP_ENQ), RingFlags::SPMC);
        assert_eq!(RingFlags::from_bits(RING_F_SC_DEQ), RingFlags::MPSC);
    }

    #[test]
    fn test_unknown_bits_ignored() {
        assert_eq!(RingFlags::from_bits(0xf0), RingFlags::MPMC);
        assert_eq!(RingFlags::from_bits(0xf3), RingFlags::SPSC);
    }

    #[test]
    fn test_config_builders() {
        let config = Config::default();
        assert_eq!(config.capacity, 1024);
        assert_eq!(config.flags, RingFlags::MPMC);
        assert!(!config.enable_metrics);

        let config = config.with_flags(RingFlags::SPSC).with_metrics(true);
        assert_eq!(config.flags, RingFlags::SPSC);
        assert!(config.enable_metrics);

        assert!(LOW_LATENCY_CONFIG.flags.single_producer);
        assert_eq!(HIGH_THROUGHPUT_CONFIG.capacity, 262_144);
    }
}
