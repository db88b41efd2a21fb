use core::{alloc::Layout, ptr::{self, NonNull}};

/// Allocator/Arena that provides memory to containers, and constructs and destroys the values placed in that memory.
///
/// Allocators are used through a shared reference, stateful allocators are expected to use interior mutability.
/// A container that needs to share an allocator with other containers can hold a `&A`, which is an allocator itself.
///
/// # Safety
///
/// Memory returned by [`Allocator::alloc`] must be valid for reads and writes of `layout.size()` bytes, be aligned to
/// `layout.align()`, and stay valid until it is passed back to [`Allocator::dealloc`] of this allocator, or of any allocator
/// this one is [interchangeable](Allocator::interchangeable_with) with.
pub unsafe trait Allocator {
    /// Should a container adopt the source's allocator when it is copy-assigned.
    const PROPAGATE_ON_COPY: bool = false;
    /// Should a container adopt the source's allocator when it is move-assigned.
    const PROPAGATE_ON_MOVE: bool = true;
    /// Should containers exchange allocators when they are swapped.
    const PROPAGATE_ON_SWAP: bool = false;

    /// Allocate memory from an allocator/arena
    ///
    /// # Return
    ///
    /// If no memory could be allocated, `None` should be returned.
    ///
    /// # Safety
    ///
    /// `layout` must have a non-zero size.
    unsafe fn alloc(&self, layout: Layout) -> Option<NonNull<u8>>;

    /// Deallocate an allocation
    ///
    /// # Panics
    ///
    /// Deallocation may panic, since an incorrect deallocation should not happen
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by `alloc` with the same `layout`, and must not have been deallocated yet.
    unsafe fn dealloc(&self, ptr: NonNull<u8>, layout: Layout);

    /// Check if the allocator owns the allocation
    fn owns(&self, ptr: NonNull<u8>, layout: Layout) -> bool;

    /// Does the allocator support freeing of memory, if not, it means freeing of memory will only happen when the full allocator has been reset
    ///
    /// Default implementation assumes the allocator can free
    fn supports_free(&self) -> bool { true }

    /// Largest number of bytes a single allocation can ever request from this allocator.
    fn max_size(&self) -> usize {
        isize::MAX as usize
    }

    /// Can memory allocated by `self` be deallocated by `other`, and the other way around.
    fn interchangeable_with(&self, other: &Self) -> bool where
        Self: Sized;

    /// Construct `value` in the uninitialized slot `slot`.
    ///
    /// # Safety
    ///
    /// `slot` must be valid for writes, aligned, and must not hold a live value.
    unsafe fn construct<T>(&self, slot: NonNull<T>, value: T) where
        Self: Sized
    {
        slot.as_ptr().write(value);
    }

    /// Destroy the live value in `slot`, leaving the slot uninitialized.
    ///
    /// # Safety
    ///
    /// `slot` must hold a live value, which must not be used afterwards.
    unsafe fn destroy<T>(&self, slot: NonNull<T>) where
        Self: Sized
    {
        ptr::drop_in_place(slot.as_ptr());
    }
}

unsafe impl<A: Allocator> Allocator for &A {
    const PROPAGATE_ON_COPY: bool = A::PROPAGATE_ON_COPY;
    const PROPAGATE_ON_MOVE: bool = A::PROPAGATE_ON_MOVE;
    const PROPAGATE_ON_SWAP: bool = A::PROPAGATE_ON_SWAP;

    unsafe fn alloc(&self, layout: Layout) -> Option<NonNull<u8>> {
        (**self).alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: NonNull<u8>, layout: Layout) {
        (**self).dealloc(ptr, layout)
    }

    fn owns(&self, ptr: NonNull<u8>, layout: Layout) -> bool {
        (**self).owns(ptr, layout)
    }

    fn supports_free(&self) -> bool {
        (**self).supports_free()
    }

    fn max_size(&self) -> usize {
        (**self).max_size()
    }

    fn interchangeable_with(&self, other: &Self) -> bool {
        ptr::eq(*self, *other) || (**self).interchangeable_with(*other)
    }

    unsafe fn construct<T>(&self, slot: NonNull<T>, value: T) {
        (**self).construct(slot, value)
    }

    unsafe fn destroy<T>(&self, slot: NonNull<T>) {
        (**self).destroy(slot)
    }
}
