use core::{alloc::Layout, ptr::NonNull};

use parking_lot::Mutex;
use tessel_logging::log_debug;

use crate::alloc::{Allocator, LOG_CAT};
use super::Mallocator;

/// Linear/Bump allocator
///
/// An allocator that can freely allocate when there is enough space left in it. Memory is only given back when the most
/// recent allocation is deallocated, everything else is only reclaimed by `reset()`.
///
/// The arena size is also the largest allocation it can hand out, which makes it useful to give containers a hard limit.
pub struct LinearAllocator {
    max_align:     usize,
    buffer:        NonNull<u8>,
    buffer_layout: Layout,
    head:          Mutex<usize>,
}

impl LinearAllocator {
    /// Create a new linear allocator with an arena of `size` bytes, which can hand out allocations with an alignment up to `max_align`.
    ///
    /// Returns `None` if `max_align` is not a power of 2, or if the arena could not be allocated.
    ///
    /// # Panics
    ///
    /// Panics if `size` is 0.
    pub fn new(size: usize, max_align: usize) -> Option<Self> {
        assert!(size != 0, "A linear allocator needs a non-empty arena");
        let buffer_layout = Layout::from_size_align(size, max_align).ok()?;
        let buffer = unsafe { Mallocator.alloc(buffer_layout)? };

        Some(Self { max_align, buffer, buffer_layout, head: Mutex::new(0) })
    }

    /// Reset the linear allocator to its empty state
    pub fn reset(&mut self) {
        *self.head.get_mut() = 0;
    }

    /// Number of bytes currently in use, including alignment padding.
    pub fn used(&self) -> usize {
        *self.head.lock()
    }

    /// Number of bytes left in the arena.
    pub fn remaining(&self) -> usize {
        self.buffer_layout.size() - self.used()
    }

    fn offset_of(&self, ptr: NonNull<u8>) -> usize {
        ptr.as_ptr() as usize - self.buffer.as_ptr() as usize
    }
}

unsafe impl Allocator for LinearAllocator {
    unsafe fn alloc(&self, layout: Layout) -> Option<NonNull<u8>> {
        if layout.align() > self.max_align {
            // Layout exceeds allocator's maximum alignment
            return None;
        }

        let mut head = self.head.lock();
        let start = head.checked_add(layout.align() - 1)? & !(layout.align() - 1);
        let end = start.checked_add(layout.size())?;
        if end > self.buffer_layout.size() {
            log_debug!(LOG_CAT, Self::alloc, "Linear allocator is out of space: {} bytes requested, {} bytes left", layout.size(), self.buffer_layout.size() - *head);
            return None;
        }

        *head = end;
        Some(NonNull::new_unchecked(self.buffer.as_ptr().add(start)))
    }

    unsafe fn dealloc(&self, ptr: NonNull<u8>, layout: Layout) {
        assert!(self.owns(ptr, layout), "Cannot deallocate an allocation that isn't owned by the allocator");

        let mut head = self.head.lock();
        let offset = self.offset_of(ptr);
        if offset + layout.size() == *head {
            *head = offset;
        }
    }

    fn owns(&self, ptr: NonNull<u8>, layout: Layout) -> bool {
        let begin = self.buffer.as_ptr() as usize;
        let addr = ptr.as_ptr() as usize;
        addr >= begin && addr + layout.size() <= begin + self.buffer_layout.size()
    }

    fn supports_free(&self) -> bool {
        false
    }

    fn max_size(&self) -> usize {
        self.buffer_layout.size()
    }

    fn interchangeable_with(&self, other: &Self) -> bool {
        self.buffer == other.buffer
    }
}

impl Drop for LinearAllocator {
    fn drop(&mut self) {
        unsafe { Mallocator.dealloc(self.buffer, self.buffer_layout) };
    }
}

// The arena is only reached through `head`, which is guarded by a mutex.
unsafe impl Send for LinearAllocator {}
unsafe impl Sync for LinearAllocator {}
