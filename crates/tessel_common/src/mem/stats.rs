/// Snapshot of the memory statistics.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct MemoryStats {
    /// Number of allocations made
    pub allocations:   usize,
    /// Number of deallocations made
    pub deallocations: usize,
    /// Bytes currently allocated
    pub live_bytes:    usize,
    /// Highest number of bytes that were allocated at the same time
    pub peak_bytes:    usize,
}

impl MemoryStats {
    /// Number of allocations that have not been deallocated yet.
    pub fn live_allocations(&self) -> usize {
        self.allocations.saturating_sub(self.deallocations)
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "memory_tracking")] {
        use core::sync::atomic::{AtomicUsize, Ordering};

        static ALLOCATIONS:   AtomicUsize = AtomicUsize::new(0);
        static DEALLOCATIONS: AtomicUsize = AtomicUsize::new(0);
        static LIVE_BYTES:    AtomicUsize = AtomicUsize::new(0);
        static PEAK_BYTES:    AtomicUsize = AtomicUsize::new(0);

        pub(crate) fn record_alloc(size: usize) {
            ALLOCATIONS.fetch_add(1, Ordering::Relaxed);
            let live = LIVE_BYTES.fetch_add(size, Ordering::Relaxed) + size;
            PEAK_BYTES.fetch_max(live, Ordering::Relaxed);
        }

        pub(crate) fn record_dealloc(size: usize) {
            DEALLOCATIONS.fetch_add(1, Ordering::Relaxed);
            LIVE_BYTES.fetch_sub(size, Ordering::Relaxed);
        }

        /// Get the current memory statistics.
        pub fn memory_stats() -> MemoryStats {
            MemoryStats {
                allocations:   ALLOCATIONS.load(Ordering::Relaxed),
                deallocations: DEALLOCATIONS.load(Ordering::Relaxed),
                live_bytes:    LIVE_BYTES.load(Ordering::Relaxed),
                peak_bytes:    PEAK_BYTES.load(Ordering::Relaxed),
            }
        }

        /// Is memory tracking compiled in.
        pub const fn is_tracking_enabled() -> bool {
            true
        }
    } else {
        #[inline(always)]
        pub(crate) fn record_alloc(_size: usize) {}

        #[inline(always)]
        pub(crate) fn record_dealloc(_size: usize) {}

        /// Get the current memory statistics, always empty without the `memory_tracking` feature.
        pub fn memory_stats() -> MemoryStats {
            MemoryStats::default()
        }

        /// Is memory tracking compiled in.
        pub const fn is_tracking_enabled() -> bool {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_allocations_never_underflow() {
        let stats = MemoryStats { allocations: 1, deallocations: 3, ..Default::default() };
        assert_eq!(stats.live_allocations(), 0);
    }

    #[cfg(feature = "memory_tracking")]
    #[test]
    fn records_show_up_in_stats() {
        let before = memory_stats();
        record_alloc(64);
        let during = memory_stats();
        record_dealloc(64);
        let after = memory_stats();

        // Other tests allocate concurrently, so only monotonic counters are compared exactly.
        assert!(during.allocations > before.allocations);
        assert!(during.peak_bytes >= 64);
        assert!(after.deallocations > before.deallocations);
    }
}
