use core::{alloc::{GlobalAlloc, Layout}, ptr::NonNull};

use crate::{alloc::Allocator, mem};

/// Allocator calling directly into mimalloc
///
/// The mallocator is stateless, so all instances are interchangeable with each other.
/// When the `memory_tracking` feature is enabled, every allocation is recorded in the [memory stats](crate::mem::memory_stats).
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct Mallocator;

static MI_MALLOC: mimalloc::MiMalloc = mimalloc::MiMalloc;

unsafe impl Allocator for Mallocator {
    const PROPAGATE_ON_COPY: bool = true;
    const PROPAGATE_ON_SWAP: bool = true;

    unsafe fn alloc(&self, layout: Layout) -> Option<NonNull<u8>> {
        debug_assert!(layout.size() != 0, "Zero-sized allocations are not supported");
        let ptr = NonNull::new(MI_MALLOC.alloc(layout))?;
        mem::record_alloc(layout.size());
        Some(ptr)
    }

    unsafe fn dealloc(&self, ptr: NonNull<u8>, layout: Layout) {
        MI_MALLOC.dealloc(ptr.as_ptr(), layout);
        mem::record_dealloc(layout.size());
    }

    fn owns(&self, _ptr: NonNull<u8>, _layout: Layout) -> bool {
        // We have no real way of knowing that we allocated this, so we'll just assume that we allocated it
        true
    }

    fn interchangeable_with(&self, _other: &Self) -> bool {
        true
    }
}

#[cfg(test)]
mod test {
    use core::alloc::Layout;

    use crate::alloc::*;
    use super::Mallocator;

    #[test]
    fn alloc_dealloc() {
        let alloc = Mallocator;
        let layout = Layout::new::<u64>();

        unsafe {
            let ptr = alloc.alloc(layout).unwrap();
            assert_eq!(ptr.as_ptr() as usize % layout.align(), 0);
            ptr.cast::<u64>().as_ptr().write(0xDEAD_BEEF);
            alloc.dealloc(ptr, layout);
        }
    }

    #[test]
    fn instances_are_interchangeable() {
        assert!(Mallocator.interchangeable_with(&Mallocator));
        assert_eq!(Mallocator.max_size(), isize::MAX as usize);
    }

    #[cfg(feature = "memory_tracking")]
    #[test]
    fn allocations_are_tracked() {
        let before = crate::mem::memory_stats();
        let layout = Layout::from_size_align(256, 16).unwrap();
        unsafe {
            let ptr = Mallocator.alloc(layout).unwrap();
            assert!(crate::mem::memory_stats().allocations > before.allocations);
            Mallocator.dealloc(ptr, layout);
        }
        assert!(crate::mem::memory_stats().deallocations > before.deallocations);
    }
}
