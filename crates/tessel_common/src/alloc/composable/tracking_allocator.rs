use core::{alloc::Layout, ptr::NonNull, sync::atomic::{AtomicUsize, Ordering}};

use crate::alloc::Allocator;

/// Counters kept by a [`TrackingAllocator`].
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct TrackingStats {
    pub allocations:   usize,
    pub deallocations: usize,
    pub live_bytes:    usize,
    pub peak_bytes:    usize,
    pub constructs:    usize,
    pub destroys:      usize,
}

impl TrackingStats {
    /// Number of values constructed through the allocator that have not been destroyed through it.
    ///
    /// Values moved out of a container (e.g. by `pop` or `remove`) leave without being destroyed by the allocator, so they still count as live.
    pub fn live_values(&self) -> usize {
        self.constructs - self.destroys
    }

    /// Number of allocations that have not been deallocated yet.
    pub fn live_allocations(&self) -> usize {
        self.allocations - self.deallocations
    }
}

#[derive(Default)]
struct Counters {
    allocations:   AtomicUsize,
    deallocations: AtomicUsize,
    live_bytes:    AtomicUsize,
    peak_bytes:    AtomicUsize,
    constructs:    AtomicUsize,
    destroys:      AtomicUsize,
}

/// Allocator wrapping another allocator, counting allocations and element lifecycles going through it.
///
/// Propagation follows the wrapped allocator, and 2 tracking allocators are interchangeable when the allocators they wrap are.
#[derive(Default)]
pub struct TrackingAllocator<A: Allocator> {
    inner:    A,
    counters: Counters,
}

impl<A: Allocator> TrackingAllocator<A> {
    pub fn new(inner: A) -> Self {
        Self { inner, counters: Counters::default() }
    }

    /// Get the wrapped allocator
    pub fn inner(&self) -> &A {
        &self.inner
    }

    /// Get a snapshot of the current counters
    pub fn stats(&self) -> TrackingStats {
        let counters = &self.counters;
        TrackingStats {
            allocations:   counters.allocations.load(Ordering::Relaxed),
            deallocations: counters.deallocations.load(Ordering::Relaxed),
            live_bytes:    counters.live_bytes.load(Ordering::Relaxed),
            peak_bytes:    counters.peak_bytes.load(Ordering::Relaxed),
            constructs:    counters.constructs.load(Ordering::Relaxed),
            destroys:      counters.destroys.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to 0
    pub fn reset_stats(&mut self) {
        self.counters = Counters::default();
    }
}

unsafe impl<A: Allocator> Allocator for TrackingAllocator<A> {
    const PROPAGATE_ON_COPY: bool = A::PROPAGATE_ON_COPY;
    const PROPAGATE_ON_MOVE: bool = A::PROPAGATE_ON_MOVE;
    const PROPAGATE_ON_SWAP: bool = A::PROPAGATE_ON_SWAP;

    unsafe fn alloc(&self, layout: Layout) -> Option<NonNull<u8>> {
        let ptr = self.inner.alloc(layout)?;

        let counters = &self.counters;
        counters.allocations.fetch_add(1, Ordering::Relaxed);
        let live = counters.live_bytes.fetch_add(layout.size(), Ordering::Relaxed) + layout.size();
        counters.peak_bytes.fetch_max(live, Ordering::Relaxed);
        Some(ptr)
    }

    unsafe fn dealloc(&self, ptr: NonNull<u8>, layout: Layout) {
        self.inner.dealloc(ptr, layout);
        self.counters.deallocations.fetch_add(1, Ordering::Relaxed);
        self.counters.live_bytes.fetch_sub(layout.size(), Ordering::Relaxed);
    }

    fn owns(&self, ptr: NonNull<u8>, layout: Layout) -> bool {
        self.inner.owns(ptr, layout)
    }

    fn supports_free(&self) -> bool {
        self.inner.supports_free()
    }

    fn max_size(&self) -> usize {
        self.inner.max_size()
    }

    fn interchangeable_with(&self, other: &Self) -> bool {
        self.inner.interchangeable_with(&other.inner)
    }

    unsafe fn construct<T>(&self, slot: NonNull<T>, value: T) {
        self.inner.construct(slot, value);
        self.counters.constructs.fetch_add(1, Ordering::Relaxed);
    }

    unsafe fn destroy<T>(&self, slot: NonNull<T>) {
        // Count first, the destructor may unwind
        self.counters.destroys.fetch_add(1, Ordering::Relaxed);
        self.inner.destroy(slot);
    }
}

#[cfg(test)]
mod tests {
    use core::alloc::Layout;

    use crate::alloc::{Allocator, primitives::{Mallocator, LinearAllocator}};
    use super::*;

    #[test]
    fn counts_allocations() {
        let alloc = TrackingAllocator::new(Mallocator);
        let layout = Layout::new::<[u32; 4]>();

        unsafe {
            let a = alloc.alloc(layout).unwrap();
            let b = alloc.alloc(layout).unwrap();
            alloc.dealloc(a, layout);

            let stats = alloc.stats();
            assert_eq!(stats.allocations, 2);
            assert_eq!(stats.deallocations, 1);
            assert_eq!(stats.live_bytes, 16);
            assert_eq!(stats.peak_bytes, 32);

            alloc.dealloc(b, layout);
        }
        assert_eq!(alloc.stats().live_allocations(), 0);
    }

    #[test]
    fn counts_lifecycles() {
        let alloc = TrackingAllocator::new(Mallocator);
        let layout = Layout::new::<String>();

        unsafe {
            let slot = alloc.alloc(layout).unwrap().cast::<String>();
            alloc.construct(slot, String::from("tracked"));
            assert_eq!(alloc.stats().live_values(), 1);
            alloc.destroy(slot);
            alloc.dealloc(slot.cast(), layout);
        }

        let stats = alloc.stats();
        assert_eq!(stats.constructs, 1);
        assert_eq!(stats.destroys, 1);
    }

    #[test]
    fn forwards_to_inner() {
        let alloc = TrackingAllocator::new(LinearAllocator::new(32, 8).unwrap());
        assert_eq!(alloc.max_size(), 32);
        assert!(!alloc.supports_free());

        unsafe { assert!(alloc.alloc(Layout::new::<[u8; 64]>()).is_none()); }
        assert_eq!(alloc.stats().allocations, 0);
    }
}
