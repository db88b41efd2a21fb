use core::{
    alloc::Layout,
    marker::PhantomData,
    mem::{self, size_of},
    ptr::{self, NonNull},
};

use tessel_logging::{log_debug, log_error};

use crate::{
    alloc::Allocator,
    collections::{ReserveStrategy, TryReserveError, LOG_CAT},
};

/// Low level storage manager of an array: owns an allocation able to hold `capacity` values of `T`, and the allocator it came from.
///
/// The raw array never constructs or destroys values itself, it only moves the first `len` slots (as told by the owner) when it reallocates.
///
/// For zero-sized types, no memory is allocated and the capacity is always `usize::MAX`.
pub(crate) struct RawArray<T, A: Allocator, R: ReserveStrategy> {
    ptr:      NonNull<T>,
    cap:      usize,
    alloc:    A,
    _phantom: PhantomData<(T, fn() -> R)>,
}

unsafe impl<T: Send, A: Allocator + Send, R: ReserveStrategy> Send for RawArray<T, A, R> {}
unsafe impl<T: Sync, A: Allocator + Sync, R: ReserveStrategy> Sync for RawArray<T, A, R> {}

impl<T, A: Allocator, R: ReserveStrategy> RawArray<T, A, R> {
    const IS_ZST: bool = size_of::<T>() == 0;

    /// Create a raw array without any allocated memory.
    pub const fn new_in(alloc: A) -> Self {
        Self { ptr: NonNull::dangling(), cap: 0, alloc, _phantom: PhantomData }
    }

    /// Create a raw array with exactly `capacity` slots.
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Self {
        match Self::try_with_capacity_in(capacity, alloc) {
            Ok(arr) => arr,
            Err(err) => handle_error(err),
        }
    }

    /// Try to create a raw array with exactly `capacity` slots.
    pub fn try_with_capacity_in(capacity: usize, alloc: A) -> Result<Self, TryReserveError> {
        let mut arr = Self::new_in(alloc);
        if capacity != 0 && !Self::IS_ZST {
            let ptr = arr.try_allocate_region(capacity)?;
            arr.ptr = ptr;
            arr.cap = capacity;
        }
        Ok(arr)
    }

    /// Get a pointer to the start of the allocation, this is a dangling pointer when nothing was allocated.
    #[inline]
    pub fn ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Get the storage handle, `None` when nothing was allocated.
    pub fn storage(&self) -> Option<NonNull<T>> {
        if self.capacity() == 0 {
            None
        } else {
            Some(self.ptr)
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        if Self::IS_ZST { usize::MAX } else { self.cap }
    }

    /// Get the maximum number of elements the allocator could ever provide.
    pub fn max_capacity(&self) -> usize {
        if Self::IS_ZST {
            usize::MAX
        } else {
            self.alloc.max_size().min(isize::MAX as usize) / size_of::<T>()
        }
    }

    #[inline]
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Replace the allocator.
    ///
    /// # Safety
    ///
    /// The current allocation, if any, must be deallocatable by the new allocator.
    pub unsafe fn set_allocator(&mut self, alloc: A) {
        self.alloc = alloc;
    }

    /// Exchange allocators between 2 raw arrays, leaving their allocations in place.
    ///
    /// # Safety
    ///
    /// Each allocation must be deallocatable by the allocator it ends up with.
    pub unsafe fn swap_allocator(&mut self, other: &mut Self) {
        mem::swap(&mut self.alloc, &mut other.alloc);
    }

    /// Exchange allocations between 2 raw arrays, leaving their allocators in place.
    ///
    /// # Safety
    ///
    /// Each allocation must be deallocatable by the allocator it ends up with.
    pub unsafe fn swap_storage(&mut self, other: &mut Self) {
        mem::swap(&mut self.ptr, &mut other.ptr);
        mem::swap(&mut self.cap, &mut other.cap);
    }

    /// Allocate a region for `capacity` values, without installing it.
    ///
    /// `capacity` must not be 0.
    pub fn try_allocate_region(&self, capacity: usize) -> Result<NonNull<T>, TryReserveError> {
        debug_assert!(capacity != 0 && !Self::IS_ZST);

        let max = self.max_capacity();
        if capacity > max {
            log_debug!(LOG_CAT, Self::try_allocate_region, "Requested capacity of {capacity} elements exceeds the allocation limit of {max} elements");
            return Err(TryReserveError::AllocationLimitExceeded { requested: capacity, max });
        }

        let layout = match Layout::array::<T>(capacity) {
            Ok(layout) => layout,
            Err(_) => return Err(TryReserveError::AllocationLimitExceeded { requested: capacity, max }),
        };

        match unsafe { self.alloc.alloc(layout) } {
            Some(ptr) => Ok(ptr.cast()),
            None => {
                log_debug!(LOG_CAT, Self::try_allocate_region, "Failed to allocate {} bytes for {capacity} elements", layout.size());
                Err(TryReserveError::OutOfMemory(layout))
            },
        }
    }

    /// Deallocate a region returned by `try_allocate_region`.
    ///
    /// # Safety
    ///
    /// `ptr` must come from `try_allocate_region(capacity)` on this raw array, and must not be installed.
    pub unsafe fn deallocate_region(&self, ptr: NonNull<T>, capacity: usize) {
        let layout = Layout::from_size_align_unchecked(size_of::<T>() * capacity, mem::align_of::<T>());
        self.alloc.dealloc(ptr.cast(), layout);
    }

    /// Install a region returned by `try_allocate_region`, deallocating the current allocation.
    ///
    /// # Safety
    ///
    /// Any values in the current allocation must already be moved out or destroyed.
    pub unsafe fn install_region(&mut self, ptr: NonNull<T>, capacity: usize) {
        self.release();
        self.ptr = ptr;
        self.cap = capacity;
    }

    /// Install a region returned by `try_allocate_region`, handing back the previous allocation (if any) and its capacity.
    ///
    /// The previous allocation stays valid until it is passed to `deallocate_region`.
    pub fn replace_region(&mut self, ptr: NonNull<T>, capacity: usize) -> Option<(NonNull<T>, usize)> {
        let old = self.current_memory().map(|_| (self.ptr, self.cap));
        self.ptr = ptr;
        self.cap = capacity;
        old
    }

    /// Deallocate the current allocation, leaving the raw array without memory.
    ///
    /// # Safety
    ///
    /// Any values in the current allocation must already be moved out or destroyed.
    pub unsafe fn release(&mut self) {
        if let Some((ptr, layout)) = self.current_memory() {
            self.alloc.dealloc(ptr, layout);
        }
        self.ptr = NonNull::dangling();
        self.cap = 0;
    }

    fn current_memory(&self) -> Option<(NonNull<u8>, Layout)> {
        if Self::IS_ZST || self.cap == 0 {
            None
        } else {
            unsafe {
                let layout = Layout::from_size_align_unchecked(size_of::<T>() * self.cap, mem::align_of::<T>());
                Some((self.ptr.cast(), layout))
            }
        }
    }

    //--------------------------------------------------------------

    /// Ensures that the buffer contains at least enough space to hold `len + additional` elements.
    /// If it doesn't already have enough capacity, will reallocate enough space according to the reserve strategy.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds the allocation limit.
    ///
    /// # Aborts
    ///
    /// Aborts on OOM.
    #[inline]
    pub fn reserve(&mut self, len: usize, additional: usize) {
        if self.needs_to_grow(len, additional) {
            if let Err(err) = self.grow_amortized(len, additional) {
                handle_error(err);
            }
        }
    }

    /// A specialized version of `self.reserve(len, 1)` which requires the caller to ensure `len == self.capacity()`.
    #[inline(never)]
    pub fn grow_one(&mut self) {
        if let Err(err) = self.grow_amortized(self.cap, 1) {
            handle_error(err);
        }
    }

    /// The same as `reserve`, but returns on errors instead of panicking or aborting.
    pub fn try_reserve(&mut self, len: usize, additional: usize) -> Result<(), TryReserveError> {
        if self.needs_to_grow(len, additional) {
            self.grow_amortized(len, additional)?;
        }
        Ok(())
    }

    /// The same as `try_reserve`, but grows to exactly `len + additional` elements.
    pub fn try_reserve_exact(&mut self, len: usize, additional: usize) -> Result<(), TryReserveError> {
        if self.needs_to_grow(len, additional) {
            let required = len.checked_add(additional).ok_or_else(|| self.overflow_error())?;
            self.grow_exact(required, len)?;
        }
        Ok(())
    }

    /// Grows to exactly `capacity` elements, does nothing if the current capacity is already large enough.
    pub fn try_reserve_capacity(&mut self, len: usize, capacity: usize) -> Result<(), TryReserveError> {
        if capacity > self.capacity() {
            self.grow_exact(capacity, len)?;
        }
        Ok(())
    }

    /// Shrinks the buffer down to the specified capacity.
    /// If the given amount is 0, actually completely deallocates.
    ///
    /// # Panics
    ///
    /// Panics if the given amount is *larger* than the current capacity.
    ///
    /// # Aborts
    ///
    /// Aborts on OOM.
    pub fn shrink_to_fit(&mut self, len: usize, cap: usize) {
        if let Err(err) = self.try_shrink_to_fit(len, cap) {
            handle_error(err);
        }
    }

    /// The same as `shrink_to_fit`, but returns on errors instead of aborting.
    pub fn try_shrink_to_fit(&mut self, len: usize, cap: usize) -> Result<(), TryReserveError> {
        assert!(cap <= self.capacity(), "Tried to shrink to a larger capacity");
        debug_assert!(len <= cap);

        if Self::IS_ZST || cap == self.cap {
            return Ok(());
        }

        if cap == 0 {
            unsafe { self.release() };
            return Ok(());
        }

        let new_ptr = self.try_allocate_region(cap)?;
        unsafe {
            ptr::copy_nonoverlapping(self.ptr.as_ptr(), new_ptr.as_ptr(), len);
            self.install_region(new_ptr, cap);
        }
        Ok(())
    }

    //--------------------------------------------------------------

    /// Returns if the buffer needs to grow to fulfill the needed extra capacity.
    /// Mainly used to make inlining reserve-calls possible without inlining `grow`.
    #[inline]
    fn needs_to_grow(&self, len: usize, additional: usize) -> bool {
        additional > self.capacity().wrapping_sub(len)
    }

    fn overflow_error(&self) -> TryReserveError {
        TryReserveError::AllocationLimitExceeded { requested: usize::MAX, max: self.max_capacity() }
    }

    fn grow_amortized(&mut self, len: usize, additional: usize) -> Result<(), TryReserveError> {
        debug_assert!(additional > 0);

        if Self::IS_ZST {
            // Since we return a capacity of `usize::MAX` when `T` is zero-sized, getting to here necessarily means that the `RawArray` is overfull.
            return Err(self.overflow_error());
        }

        let required_cap = len.checked_add(additional).ok_or_else(|| self.overflow_error())?;
        let max = self.max_capacity();
        if required_cap > max {
            log_debug!(LOG_CAT, Self::grow_amortized, "Requested capacity of {required_cap} elements exceeds the allocation limit of {max} elements");
            return Err(TryReserveError::AllocationLimitExceeded { requested: required_cap, max });
        }

        let new_cap = R::calculate(self.cap, required_cap).unwrap_or(max).clamp(required_cap, max);
        self.finalize_grow(new_cap, len)
    }

    fn grow_exact(&mut self, new_cap: usize, len: usize) -> Result<(), TryReserveError> {
        if Self::IS_ZST {
            return Err(self.overflow_error());
        }
        self.finalize_grow(new_cap, len)
    }

    /// Moves the first `len` values into a new allocation of `new_cap` slots.
    ///
    /// The new region is fully set up before the old one is released, so a failure leaves the current allocation untouched.
    fn finalize_grow(&mut self, new_cap: usize, len: usize) -> Result<(), TryReserveError> {
        let new_ptr = self.try_allocate_region(new_cap)?;

        log_debug!(LOG_CAT, Self::finalize_grow, "Reallocating array from {} to {new_cap} elements", self.cap);
        unsafe {
            ptr::copy_nonoverlapping(self.ptr.as_ptr(), new_ptr.as_ptr(), len);
            self.install_region(new_ptr, new_cap);
        }
        Ok(())
    }
}

impl<T, A: Allocator, R: ReserveStrategy> Drop for RawArray<T, A, R> {
    fn drop(&mut self) {
        if let Some((ptr, layout)) = self.current_memory() {
            unsafe { self.alloc.dealloc(ptr, layout) };
        }
    }
}

/// Central function for reserve error handling
#[cold]
#[track_caller]
pub(crate) fn handle_error(e: TryReserveError) -> ! {
    log_error!(LOG_CAT, handle_error, "Unrecoverable reserve failure: {e}");
    match e {
        TryReserveError::AllocationLimitExceeded { requested, max } => capacity_overflow(requested, max),
        TryReserveError::OutOfMemory(layout) => std::alloc::handle_alloc_error(layout),
    }
}

#[track_caller]
fn capacity_overflow(requested: usize, max: usize) -> ! {
    panic!("capacity overflow: {requested} elements requested, the allocator can provide at most {max}");
}
