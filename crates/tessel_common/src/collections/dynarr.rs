use core::{
    cmp, fmt,
    hash::{Hash, Hasher},
    mem::{self, ManuallyDrop},
    ops::{self, Bound, Index, IndexMut, Range, RangeBounds},
    ptr::{self, NonNull},
    slice::{self, SliceIndex},
};

use scopeguard::{guard, guard_on_unwind, ScopeGuard};
use tessel_logging::log_error;

use crate::alloc::{Allocator, primitives::Mallocator};
use super::{
    imp::array::{handle_error, RawArray},
    impl_slice_partial_eq_generic, DoubleOrMinReserveStrategy, IndexOutOfRange, ReserveStrategy, TryReserveError, LOG_CAT,
};

mod into_iter;


pub use into_iter::IntoIter;

/// A contiguous growable array type, also known as a dynamic array, or DynArr.
///
/// Dynamic arrays have *O*(1) indexing, amortized *O*(1) push (to the end), and *O*(1) pop (from the back).
///
/// All memory comes from the allocator `A`, which also constructs and destroys every element the array holds.
/// When the array runs out of capacity, the reserve strategy `R` decides how much it grows, by default it doubles.
///
/// # Examples
///
/// ```
/// use tessel_common::{dynarr, collections::DynArr};
///
/// let mut arr = DynArr::new();
/// arr.push(1);
/// arr.push(2);
///
/// assert_eq!(arr.len(), 2);
/// assert_eq!(arr[0], 1);
///
/// arr[0] = 7;
/// assert_eq!(arr[0], 7);
///
/// arr.extend([1, 2, 3]);
/// assert_eq!(arr, [7, 2, 1, 2, 3]);
///
/// let arr2 = dynarr![7, 2, 1, 2, 3];
/// assert_eq!(arr, arr2);
/// ```
///
/// # Capacity and reallocation
///
/// The capacity of a dynamic array is the amount of space allocated for any future elements that will be added onto the dynamic array.
/// This is not to be confused with the *length* of the dynamic array, which specifies the number of actual elements within the dynamic array.
/// If a dynamic array's length exceeds its capacity, its capacity will automatically be increased, but its elements will have to be reallocated.
///
/// Reallocation first allocates the new storage and moves the elements over, and only then gives the old storage back,
/// so a failed reallocation leaves the dynamic array untouched.
///
/// Shrinking the length, either with [`truncate`](DynArr::truncate), [`resize`](DynArr::resize) or [`clear`](DynArr::clear), never gives memory back,
/// use [`shrink_to_fit`](DynArr::shrink_to_fit) for that.
///
/// # Allocators
///
/// How an allocator travels with its dynamic array is decided by the allocator's propagation flags:
/// - [`PROPAGATE_ON_COPY`](Allocator::PROPAGATE_ON_COPY): [`clone_from`](Clone::clone_from) adopts the source's allocator.
/// - [`PROPAGATE_ON_MOVE`](Allocator::PROPAGATE_ON_MOVE): [`move_assign`](DynArr::move_assign) adopts the source's allocator together with its storage.
/// - [`PROPAGATE_ON_SWAP`](Allocator::PROPAGATE_ON_SWAP): [`swap_with`](DynArr::swap_with) exchanges allocators.
///
/// A dynamic array can never be assigned to itself, the borrow checker rejects it:
///
/// ```compile_fail
/// use tessel_common::collections::DynArr;
///
/// let mut arr = DynArr::<u32>::new();
/// arr.move_assign(&mut arr);
/// ```
pub struct DynArr<T, A: Allocator = Mallocator, R: ReserveStrategy = DoubleOrMinReserveStrategy> {
    arr: RawArray<T, A, R>,
    len: usize,
}

static_assertions::assert_impl_all!(DynArr<u32>: Send, Sync);
static_assertions::assert_not_impl_any!(DynArr<std::rc::Rc<u32>>: Send, Sync);
static_assertions::assert_eq_size!(DynArr<u64>, [usize; 3]);

//--------------------------------------------------------------

#[inline]
unsafe fn slot<T>(base: *mut T, index: usize) -> NonNull<T> {
    NonNull::new_unchecked(base.add(index))
}

/// Destroys the slots `[start, end)` in index order, a panicking destructor does not stop the remaining slots from being destroyed.
unsafe fn destroy_range<T, A: Allocator>(alloc: &A, base: *mut T, start: usize, end: usize) {
    let mut next = guard_on_unwind(start, |next| {
        for idx in next..end {
            unsafe { alloc.destroy(slot(base, idx)) };
        }
    });
    while *next < end {
        let idx = *next;
        *next += 1;
        alloc.destroy(slot(base, idx));
    }
}

/// Destroys the first `count` slots in reverse order.
unsafe fn destroy_backwards<T, A: Allocator>(alloc: &A, base: *mut T, count: usize) {
    for idx in (0..count).rev() {
        alloc.destroy(slot(base, idx));
    }
}

#[track_caller]
fn slice_range<RA: RangeBounds<usize>>(range: RA, len: usize) -> Range<usize> {
    #[cold]
    #[track_caller]
    fn overflow_failed() -> ! {
        panic!("attempted to index slice up to maximum usize");
    }

    let start = match range.start_bound() {
        Bound::Included(&start) => start,
        Bound::Excluded(&start) => start.checked_add(1).unwrap_or_else(|| overflow_failed()),
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(&end) => end.checked_add(1).unwrap_or_else(|| overflow_failed()),
        Bound::Excluded(&end) => end,
        Bound::Unbounded => len,
    };

    if start > end {
        panic!("range start (is {start}) should be <= range end (is {end})");
    }
    if end > len {
        panic!("range end (is {end}) should be <= len (is {len})");
    }
    start..end
}

//--------------------------------------------------------------

impl<T> DynArr<T> {
    /// Constructs a new, empty `DynArr<T>` using the [`Mallocator`].
    ///
    /// The dynamic array will not allocate until elements are pushed onto it.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::new_in(Mallocator)
    }

    /// Constructs a new, empty `DynArr<T>` able to hold exactly `capacity` elements without reallocating.
    ///
    /// # Panics
    ///
    /// Panics if the capacity exceeds the allocation limit.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_in(capacity, Mallocator)
    }

    /// Tries to construct a new, empty `DynArr<T>` able to hold exactly `capacity` elements without reallocating.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        Self::try_with_capacity_in(capacity, Mallocator)
    }
}

impl<T, A: Allocator, R: ReserveStrategy> DynArr<T, A, R> {
    /// Constructs a new, empty `DynArr<T, A, R>` using the given allocator.
    ///
    /// The dynamic array will not allocate until elements are pushed onto it.
    #[inline]
    #[must_use]
    pub const fn new_in(alloc: A) -> Self {
        Self { arr: RawArray::new_in(alloc), len: 0 }
    }

    /// Constructs a new `DynArr<T, A, R>` with exactly the specified capacity with the provided allocator.
    ///
    /// If `capacity` is 0, the dynamic array will not allocate.
    ///
    /// For `DynArr<T, A, R>` where `T` is a zero-sized type, there will be no allocation and the capacity will always be `usize::MAX`.
    ///
    /// # Panics
    ///
    /// Panics if the capacity exceeds the allocation limit.
    ///
    /// # Aborts
    ///
    /// Aborts on OOM.
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Self {
        Self { arr: RawArray::with_capacity_in(capacity, alloc), len: 0 }
    }

    /// Tries to construct a new `DynArr<T, A, R>` with exactly the specified capacity with the provided allocator.
    ///
    /// # Errors
    ///
    /// Returns an error if the capacity exceeds the allocation limit, or if the allocator reports an allocation failure.
    pub fn try_with_capacity_in(capacity: usize, alloc: A) -> Result<Self, TryReserveError> {
        Ok(Self { arr: RawArray::try_with_capacity_in(capacity, alloc)?, len: 0 })
    }

    /// Constructs a dynamic array holding `count` default constructed values.
    pub fn from_default_in(count: usize, alloc: A) -> Self where
        T: Default
    {
        match Self::try_from_default_in(count, alloc) {
            Ok(arr) => arr,
            Err(err) => handle_error(err),
        }
    }

    /// Tries to construct a dynamic array holding `count` default constructed values.
    pub fn try_from_default_in(count: usize, alloc: A) -> Result<Self, TryReserveError> where
        T: Default
    {
        let mut arr = Self::try_with_capacity_in(count, alloc)?;
        unsafe { arr.insert_from_fn(0, count, || Some(T::default())) };
        Ok(arr)
    }

    /// Constructs a dynamic array holding clones of the values in `src`, in the same order.
    pub fn from_slice_in(src: &[T], alloc: A) -> Self where
        T: Clone
    {
        match Self::try_from_slice_in(src, alloc) {
            Ok(arr) => arr,
            Err(err) => handle_error(err),
        }
    }

    /// Tries to construct a dynamic array holding clones of the values in `src`, in the same order.
    pub fn try_from_slice_in(src: &[T], alloc: A) -> Result<Self, TryReserveError> where
        T: Clone
    {
        let mut arr = Self::try_with_capacity_in(src.len(), alloc)?;
        let mut iter = src.iter();
        unsafe { arr.insert_from_fn(0, src.len(), || iter.next().cloned()) };
        Ok(arr)
    }

    /// Constructs a dynamic array from the values of an iterator.
    pub fn from_iter_in<I: IntoIterator<Item = T>>(iter: I, alloc: A) -> Self {
        let mut arr = Self::new_in(alloc);
        arr.extend(iter);
        arr
    }

    /// Clones the dynamic array into a new one using the given allocator.
    pub fn clone_in(&self, alloc: A) -> Self where
        T: Clone
    {
        Self::from_slice_in(self, alloc)
    }

    /// Moves the values of `other` into a new dynamic array using `alloc`.
    ///
    /// When `alloc` is interchangeable with the allocator of `other`, the storage is taken over as is.
    /// Otherwise, new storage is allocated from `alloc`, and the values are moved over one by one.
    pub fn move_in(mut other: Self, alloc: A) -> Self {
        let mut arr = Self::new_in(alloc);
        if arr.arr.allocator().interchangeable_with(other.arr.allocator()) {
            unsafe { arr.arr.swap_storage(&mut other.arr) };
            arr.len = mem::take(&mut other.len);
        } else {
            arr.reserve_exact(other.len);
            unsafe { arr.relocate_from(&mut other) };
        }
        arr
    }

    /// Takes all values out of the dynamic array, leaving it empty without storage, and using a clone of its allocator.
    pub fn take(&mut self) -> Self where
        A: Clone
    {
        let alloc = self.arr.allocator().clone();
        mem::replace(self, Self::new_in(alloc))
    }

    /// Moves all values of `other` to the end of `self`, constructing them through the allocator of `self`, and leaves `other` without storage.
    ///
    /// # Safety
    ///
    /// `self` needs to have enough capacity for the values of `other`.
    unsafe fn relocate_from(&mut self, other: &mut Self) {
        debug_assert!(self.capacity() - self.len >= other.len);

        let count = mem::take(&mut other.len);
        let src = other.arr.ptr();
        let dst = self.arr.ptr().add(self.len);
        let alloc = self.arr.allocator();
        for idx in 0..count {
            alloc.construct(slot(dst, idx), ptr::read(src.add(idx)));
        }
        self.len += count;
        other.arr.release();
    }

    /// Installs `region`, already holding `len` values, as the storage, then destroys the previous values and releases the previous allocation.
    ///
    /// The previous allocation is released even when one of its destructors panics.
    ///
    /// # Safety
    ///
    /// `region` must come from `try_allocate_region(capacity)` and hold exactly `len` constructed values.
    unsafe fn replace_storage(&mut self, region: NonNull<T>, capacity: usize, len: usize) {
        let old_len = mem::replace(&mut self.len, len);
        let Some((old_ptr, old_cap)) = self.arr.replace_region(region, capacity) else { return };

        let arr = &self.arr;
        let _release = guard((), move |_| unsafe { arr.deallocate_region(old_ptr, old_cap) });
        destroy_range(arr.allocator(), old_ptr.as_ptr(), 0, old_len);
    }

    /// Opens a gap of `count` slots at `index` and fills it with values produced by `f`, returns the number of values inserted.
    ///
    /// Capacity for `count` more values must already be reserved. If `f` runs out early, the rest of the gap is closed.
    /// If `f` panics, the values constructed so far are destroyed in reverse order and the gap is closed again.
    unsafe fn insert_from_fn<F>(&mut self, index: usize, count: usize, mut f: F) -> usize where
        F: FnMut() -> Option<T>
    {
        debug_assert!(index <= self.len && count <= self.capacity() - self.len);

        let base = self.arr.ptr();
        let tail = self.len - index;
        ptr::copy(base.add(index), base.add(index + count), tail);
        self.len = index;

        let alloc = self.arr.allocator();
        let mut state = guard_on_unwind((&mut self.len, 0usize), move |(len, filled)| unsafe {
            destroy_backwards(alloc, base.add(index), filled);
            ptr::copy(base.add(index + count), base.add(index), tail);
            *len = index + tail;
        });

        while state.1 < count {
            let Some(value) = f() else { break };
            alloc.construct(slot(base, index + state.1), value);
            state.1 += 1;
        }

        let (len, filled) = ScopeGuard::into_inner(state);
        if filled < count {
            ptr::copy(base.add(index + count), base.add(index + filled), tail);
        }
        *len = index + filled + tail;
        filled
    }

    //--------------------------------------------------------------

    /// Replaces the contents with the values produced by `f`, until it returns `None` or `count` values were produced.
    ///
    /// When `count` fits in the current capacity, the storage is reused: live values are assigned over, new ones are constructed and leftovers destroyed.
    /// Otherwise the new values are built in fresh storage first, so a failed allocation or a panicking `f` leaves the current contents untouched.
    fn try_assign_with<F>(&mut self, count: usize, mut f: F) -> Result<(), TryReserveError> where
        F: FnMut() -> Option<T>
    {
        if count > self.capacity() {
            let region = self.arr.try_allocate_region(count)?;
            let arr = &self.arr;
            let mut built = guard_on_unwind(0usize, |built| unsafe {
                destroy_backwards(arr.allocator(), region.as_ptr(), built);
                arr.deallocate_region(region, count);
            });
            while *built < count {
                let Some(value) = f() else { break };
                unsafe { arr.allocator().construct(slot(region.as_ptr(), *built), value) };
                *built += 1;
            }
            let built = ScopeGuard::into_inner(built);
            unsafe { self.replace_storage(region, count, built) };
            return Ok(());
        }

        let common = cmp::min(self.len, count);
        for idx in 0..common {
            match f() {
                Some(value) => self[idx] = value,
                None => {
                    self.truncate(idx);
                    return Ok(());
                },
            }
        }

        if count > self.len {
            unsafe { self.insert_from_fn(self.len, count - self.len, &mut f) };
        } else {
            self.truncate(count);
        }
        Ok(())
    }

    /// Replaces the contents with `count` clones of `value`.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds the allocation limit.
    pub fn assign(&mut self, count: usize, value: T) where
        T: Clone
    {
        if let Err(err) = self.try_assign(count, value) {
            handle_error(err);
        }
    }

    /// Tries to replace the contents with `count` clones of `value`, on failure the contents are left untouched.
    pub fn try_assign(&mut self, count: usize, value: T) -> Result<(), TryReserveError> where
        T: Clone
    {
        self.try_assign_with(count, || Some(value.clone()))
    }

    /// Replaces the contents with clones of the values in `src`.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds the allocation limit.
    pub fn assign_from_slice(&mut self, src: &[T]) where
        T: Clone
    {
        if let Err(err) = self.try_assign_from_slice(src) {
            handle_error(err);
        }
    }

    /// Tries to replace the contents with clones of the values in `src`, on failure the contents are left untouched.
    pub fn try_assign_from_slice(&mut self, src: &[T]) -> Result<(), TryReserveError> where
        T: Clone
    {
        let mut iter = src.iter();
        self.try_assign_with(src.len(), || iter.next().cloned())
    }

    /// Replaces the contents with the values of `iter`.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds the allocation limit.
    pub fn assign_from_iter<I>(&mut self, iter: I) where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator
    {
        if let Err(err) = self.try_assign_from_iter(iter) {
            handle_error(err);
        }
    }

    /// Tries to replace the contents with the values of `iter`, on failure the contents are left untouched.
    ///
    /// Values past the length reported by the iterator are ignored.
    pub fn try_assign_from_iter<I>(&mut self, iter: I) -> Result<(), TryReserveError> where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator
    {
        let mut iter = iter.into_iter();
        self.try_assign_with(iter.len(), || iter.next())
    }

    /// Move-assigns the contents of `other` to `self`, leaving `other` empty without storage.
    ///
    /// If the allocator propagates on move, or both allocators are interchangeable, the storage of `other` is taken over.
    /// Otherwise, `self` keeps its allocator and the values are moved over one by one, reusing the current storage when it is large enough.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds the allocation limit.
    pub fn move_assign(&mut self, other: &mut Self) {
        if let Err(err) = self.try_move_assign(other) {
            handle_error(err);
        }
    }

    /// The same as `move_assign`, but returns an error instead of panicking, in which case both dynamic arrays are left untouched.
    pub fn try_move_assign(&mut self, other: &mut Self) -> Result<(), TryReserveError> {
        if A::PROPAGATE_ON_MOVE || self.arr.allocator().interchangeable_with(other.arr.allocator()) {
            self.clear();
            unsafe {
                self.arr.release();
                self.arr.swap_storage(&mut other.arr);
                if A::PROPAGATE_ON_MOVE {
                    self.arr.swap_allocator(&mut other.arr);
                }
            }
            self.len = mem::take(&mut other.len);
            return Ok(());
        }

        if other.len > self.capacity() {
            let region = self.arr.try_allocate_region(other.len)?;
            unsafe { self.replace_storage(region, other.len, 0) };
        } else {
            self.clear();
        }
        unsafe { self.relocate_from(other) };
        Ok(())
    }

    //--------------------------------------------------------------

    /// Returns the number of elements the dynamic array can hold without reallocating.
    ///
    /// For zero-sized types, this is always `usize::MAX`.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.arr.capacity()
    }

    /// Returns the largest number of elements the allocator could ever provide storage for.
    pub fn max_size(&self) -> usize {
        self.arr.max_capacity()
    }

    /// Returns a reference to the allocator.
    #[inline]
    pub fn allocator(&self) -> &A {
        self.arr.allocator()
    }

    /// Returns the storage handle, which is `None` if and only if the capacity is 0.
    pub fn storage(&self) -> Option<NonNull<T>> {
        self.arr.storage()
    }

    /// Reserves capacity for at least `additional` more elements, following the reserve strategy.
    ///
    /// Does nothing if the capacity is already sufficient.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds the allocation limit.
    ///
    /// # Examples
    ///
    /// ```
    /// use tessel_common::dynarr;
    ///
    /// let mut arr = dynarr![1];
    /// arr.reserve(10);
    /// assert!(arr.capacity() >= 11);
    /// ```
    pub fn reserve(&mut self, additional: usize) {
        self.arr.reserve(self.len, additional);
    }

    /// Reserves capacity for exactly `additional` more elements.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds the allocation limit.
    pub fn reserve_exact(&mut self, additional: usize) {
        if let Err(err) = self.try_reserve_exact(additional) {
            handle_error(err);
        }
    }

    /// Grows the capacity to exactly `new_capacity`, does nothing if the capacity is already large enough.
    ///
    /// # Panics
    ///
    /// Panics if `new_capacity` exceeds the allocation limit.
    pub fn reserve_capacity(&mut self, new_capacity: usize) {
        if let Err(err) = self.try_reserve_capacity(new_capacity) {
            handle_error(err);
        }
    }

    /// Tries to reserve capacity for at least `additional` more elements, following the reserve strategy.
    ///
    /// # Errors
    ///
    /// If the capacity overflows the allocation limit, or the allocator reports a failure, then an error is returned and the dynamic array is left untouched.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.arr.try_reserve(self.len, additional)
    }

    /// Tries to reserve capacity for exactly `additional` more elements.
    pub fn try_reserve_exact(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.arr.try_reserve_exact(self.len, additional)
    }

    /// Tries to grow the capacity to exactly `new_capacity`, does nothing if the capacity is already large enough.
    pub fn try_reserve_capacity(&mut self, new_capacity: usize) -> Result<(), TryReserveError> {
        self.arr.try_reserve_capacity(self.len, new_capacity)
    }

    /// Shrinks the capacity of the dynamic array as much as possible, releasing the storage when it is empty.
    pub fn shrink_to_fit(&mut self) {
        if self.capacity() > self.len {
            self.arr.shrink_to_fit(self.len, self.len);
        }
    }

    /// The same as `shrink_to_fit`, but returns an error if the smaller storage could not be allocated.
    pub fn try_shrink_to_fit(&mut self) -> Result<(), TryReserveError> {
        if self.capacity() > self.len {
            self.arr.try_shrink_to_fit(self.len, self.len)?;
        }
        Ok(())
    }

    /// Shrinks the capacity of the dynamic array with a lower bound.
    ///
    /// The capacity will remain at least as large as both the length and the supplied value.
    ///
    /// If the current capacity is less than the lower limit, this is a no-op.
    pub fn shrink_to(&mut self, min_capacity: usize) {
        if self.capacity() > min_capacity {
            self.arr.shrink_to_fit(self.len, cmp::max(self.len, min_capacity));
        }
    }

    //--------------------------------------------------------------

    /// Returns the number of elements in the dynamic array.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Extracts a slice containing the entire dynamic array.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.as_ptr(), self.len) }
    }

    /// Extracts a mutable slice of the entire dynamic array.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.as_mut_ptr(), self.len) }
    }

    /// Returns a raw pointer to the dynamic array's buffer, or a dangling raw pointer valid for zero sized reads if the dynamic array didn't allocate.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.arr.ptr()
    }

    /// Returns an unsafe mutable pointer to the dynamic array's buffer, or a dangling raw pointer valid for zero sized reads if the dynamic array didn't allocate.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.arr.ptr()
    }

    /// Forces the length of the dynamic array to `new_len`.
    ///
    /// # Safety
    ///
    /// - `new_len` must be less than or equal to [`capacity()`].
    /// - The elements at `old_len..new_len` must be constructed.
    ///
    /// [`capacity()`]: DynArr::capacity
    #[inline]
    pub unsafe fn set_len(&mut self, new_len: usize) {
        debug_assert!(new_len <= self.capacity());
        self.len = new_len;
    }

    /// Returns a reference to the element at `index`, or an error when `index` is out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use tessel_common::{dynarr, collections::IndexOutOfRange};
    ///
    /// let arr = dynarr![1, 2, 3];
    /// assert_eq!(arr.at(1), Ok(&2));
    /// assert_eq!(arr.at(3), Err(IndexOutOfRange { index: 3, len: 3 }));
    /// ```
    pub fn at(&self, index: usize) -> Result<&T, IndexOutOfRange> {
        let len = self.len;
        self.as_slice().get(index).ok_or(IndexOutOfRange { index, len })
    }

    /// Returns a mutable reference to the element at `index`, or an error when `index` is out of range.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, IndexOutOfRange> {
        let len = self.len;
        self.as_mut_slice().get_mut(index).ok_or(IndexOutOfRange { index, len })
    }

    /// Returns the first element, or `None` if the dynamic array is empty.
    pub fn front(&self) -> Option<&T> {
        self.as_slice().first()
    }

    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().first_mut()
    }

    /// Returns the last element, or `None` if the dynamic array is empty.
    pub fn back(&self) -> Option<&T> {
        self.as_slice().last()
    }

    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().last_mut()
    }

    //--------------------------------------------------------------

    /// Inserts an element at position `index` within the dynamic array, shifting all elements after it to the right, returns `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`, or if the new capacity exceeds the allocation limit.
    ///
    /// # Examples
    ///
    /// ```
    /// use tessel_common::dynarr;
    ///
    /// let mut arr = dynarr![1, 2, 3];
    /// arr.insert(1, 4);
    /// assert_eq!(arr, [1, 4, 2, 3]);
    /// arr.insert(4, 5);
    /// assert_eq!(arr, [1, 4, 2, 3, 5]);
    /// ```
    ///
    /// # Time complexity
    ///
    /// Takes *O*([`DynArr::len`]) time.
    /// All items after the insertion index must be shifted to the right.
    #[track_caller]
    pub fn insert(&mut self, index: usize, element: T) -> usize {
        Self::check_insert_index(index, self.len);

        // Space for the new element
        if self.len == self.arr.capacity() {
            self.arr.grow_one();
        }
        unsafe { self.insert_unchecked(index, element) }
    }

    /// The same as `insert`, but returns an error when the dynamic array could not grow, in which case it is left untouched.
    #[track_caller]
    pub fn try_insert(&mut self, index: usize, element: T) -> Result<usize, TryReserveError> {
        Self::check_insert_index(index, self.len);
        self.arr.try_reserve(self.len, 1)?;
        Ok(unsafe { self.insert_unchecked(index, element) })
    }

    /// Constructs the value produced by `f` at position `index`, shifting all elements after it to the right, returns `index`.
    ///
    /// `f` is called before anything is moved, so if it panics, the dynamic array is left untouched.
    #[track_caller]
    pub fn emplace<F>(&mut self, index: usize, f: F) -> usize where
        F: FnOnce() -> T
    {
        Self::check_insert_index(index, self.len);
        let element = f();
        self.insert(index, element)
    }

    unsafe fn insert_unchecked(&mut self, index: usize, element: T) -> usize {
        let len = self.len;
        let p = self.arr.ptr().add(index);
        if index < len {
            // Shift everything over to make space.
            ptr::copy(p, p.add(1), len - index);
        }
        self.arr.allocator().construct(NonNull::new_unchecked(p), element);
        self.len = len + 1;
        index
    }

    #[inline]
    #[track_caller]
    fn check_insert_index(index: usize, len: usize) {
        #[cold]
        #[track_caller]
        fn assert_failed(index: usize, len: usize) -> ! {
            panic!("insertion index (is {index}) should be <= len (is {len})");
        }

        if index > len {
            assert_failed(index, len);
        }
    }

    /// Inserts `count` clones of `value` at position `index`, returns `index`.
    ///
    /// If cloning panics, the elements inserted so far are destroyed and the dynamic array is restored to its previous contents.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`, or if the new capacity exceeds the allocation limit.
    #[track_caller]
    pub fn insert_n(&mut self, index: usize, count: usize, value: T) -> usize where
        T: Clone
    {
        Self::check_insert_index(index, self.len);
        self.reserve(count);
        unsafe { self.insert_from_fn(index, count, || Some(value.clone())) };
        index
    }

    /// The same as `insert_n`, but returns an error when the dynamic array could not grow, in which case it is left untouched.
    #[track_caller]
    pub fn try_insert_n(&mut self, index: usize, count: usize, value: T) -> Result<usize, TryReserveError> where
        T: Clone
    {
        Self::check_insert_index(index, self.len);
        self.try_reserve(count)?;
        unsafe { self.insert_from_fn(index, count, || Some(value.clone())) };
        Ok(index)
    }

    /// Inserts clones of the values in `src` at position `index`, keeping their order, returns `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`, or if the new capacity exceeds the allocation limit.
    ///
    /// # Examples
    ///
    /// ```
    /// use tessel_common::dynarr;
    ///
    /// let mut arr = dynarr![1, 5];
    /// arr.insert_from_slice(1, &[2, 3, 4]);
    /// assert_eq!(arr, [1, 2, 3, 4, 5]);
    /// ```
    #[track_caller]
    pub fn insert_from_slice(&mut self, index: usize, src: &[T]) -> usize where
        T: Clone
    {
        Self::check_insert_index(index, self.len);
        self.reserve(src.len());
        let mut iter = src.iter();
        unsafe { self.insert_from_fn(index, src.len(), || iter.next().cloned()) };
        index
    }

    /// The same as `insert_from_slice`, but returns an error when the dynamic array could not grow, in which case it is left untouched.
    #[track_caller]
    pub fn try_insert_from_slice(&mut self, index: usize, src: &[T]) -> Result<usize, TryReserveError> where
        T: Clone
    {
        Self::check_insert_index(index, self.len);
        self.try_reserve(src.len())?;
        let mut iter = src.iter();
        unsafe { self.insert_from_fn(index, src.len(), || iter.next().cloned()) };
        Ok(index)
    }

    /// Inserts the values of `iter` at position `index`, keeping their order, returns `index`.
    ///
    /// Values past the length reported by the iterator are ignored.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`, or if the new capacity exceeds the allocation limit.
    #[track_caller]
    pub fn insert_iter<I>(&mut self, index: usize, iter: I) -> usize where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator
    {
        Self::check_insert_index(index, self.len);
        let mut iter = iter.into_iter();
        let count = iter.len();
        self.reserve(count);
        unsafe { self.insert_from_fn(index, count, || iter.next()) };
        index
    }

    /// Destroys the element at position `index` and shifts all elements after it to the left, returns `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[track_caller]
    pub fn erase(&mut self, index: usize) -> usize {
        #[cold]
        #[track_caller]
        fn assert_failed(index: usize, len: usize) -> ! {
            panic!("erase index (is {index}) should be < len (is {len})");
        }

        if index >= self.len {
            assert_failed(index, self.len);
        }
        self.erase_range(index..index + 1)
    }

    /// Destroys the elements in `range` and shifts all elements after it to the left, returns the start of the range.
    ///
    /// The gap is closed even if a destructor panics.
    ///
    /// # Panics
    ///
    /// Panics if the start of the range is greater than its end, or if the end is greater than the length.
    ///
    /// # Examples
    ///
    /// ```
    /// use tessel_common::dynarr;
    ///
    /// let mut arr = dynarr![1, 2, 3, 4, 5];
    /// assert_eq!(arr.erase_range(1..3), 1);
    /// assert_eq!(arr, [1, 4, 5]);
    /// ```
    #[track_caller]
    pub fn erase_range<RA>(&mut self, range: RA) -> usize where
        RA: RangeBounds<usize>
    {
        let Range { start, end } = slice_range(range, self.len);
        if start == end {
            return start;
        }

        let base = self.arr.ptr();
        let tail = self.len - end;
        self.len = start;

        let alloc = self.arr.allocator();
        let _close_gap = guard(&mut self.len, move |len| unsafe {
            ptr::copy(base.add(end), base.add(start), tail);
            *len = start + tail;
        });
        unsafe { destroy_range(alloc, base, start, end) };
        start
    }

    /// Removes and returns the element at position `index` within the dynamic array, shifting all elements after it to the left.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[track_caller]
    pub fn remove(&mut self, index: usize) -> T {
        #[cold]
        #[track_caller]
        fn assert_failed(index: usize, len: usize) -> ! {
            panic!("removal index (is {index}) should be < len (is {len})");
        }

        let len = self.len;
        if index >= len {
            assert_failed(index, len);
        }
        unsafe {
            let ptr = self.as_mut_ptr().add(index);
            let ret = ptr::read(ptr);
            // Shift everything down to fill in that spot
            ptr::copy(ptr.add(1), ptr, len - index - 1);
            self.len = len - 1;
            ret
        }
    }

    /// Removes an element from the dynamic array and returns it, the removed element is replaced by the last element.
    ///
    /// This does not preserve ordering, but is *O*(1).
    ///
    /// # Panics
    ///
    /// Panics when `index` is out of bounds.
    #[track_caller]
    pub fn swap_remove(&mut self, index: usize) -> T {
        #[cold]
        #[track_caller]
        fn assert_failed(index: usize, len: usize) -> ! {
            panic!("swap_remove index (is {index}) should be < len (is {len})");
        }

        let len = self.len;
        if index >= len {
            assert_failed(index, len);
        }
        unsafe {
            // We replace self[index] with the last element.
            let value = ptr::read(self.as_ptr().add(index));
            let base_ptr = self.as_mut_ptr();
            ptr::copy(base_ptr.add(len - 1), base_ptr.add(index), 1);
            self.len = len - 1;
            value
        }
    }

    /// Retains only the elements specified by the predicate.
    ///
    /// In other words, destroy all elements `e` for which `f(e)` returns `false`.
    /// Each element is visited exactly once in the original order, and the order of the retained elements is preserved.
    pub fn retain<F>(&mut self, mut f: F) where
        F: FnMut(&T) -> bool
    {
        self.retain_mut(|elem| f(elem))
    }

    /// Retains only the elements specified by the predicate, passing a mutable reference to it.
    pub fn retain_mut<F>(&mut self, mut f: F) where
        F: FnMut(&mut T) -> bool
    {
        let original_len = self.len;
        // Holes are made during the process, so the length only becomes valid again once the guard ran.
        self.len = 0;

        // [Kept, Kept, Hole, Hole, Unchecked, Unchecked]
        //  |<-   processed    ->|
        //              |<-del ->|
        // The guard also runs when the predicate or a destructor panics, and shifts the unchecked elements over the holes.
        let base = self.arr.ptr();
        let alloc = self.arr.allocator();
        let mut state = guard((&mut self.len, 0usize, 0usize), move |(len, processed, deleted)| unsafe {
            if deleted > 0 {
                ptr::copy(base.add(processed), base.add(processed - deleted), original_len - processed);
            }
            *len = original_len - deleted;
        });

        while state.1 != original_len {
            let cur = unsafe { &mut *base.add(state.1) };
            if !f(cur) {
                // Advance early to avoid double destruction if the destructor panics.
                state.1 += 1;
                state.2 += 1;
                unsafe { alloc.destroy(NonNull::from(cur)) };
                continue;
            }
            if state.2 > 0 {
                unsafe { ptr::copy_nonoverlapping(cur, base.add(state.1 - state.2), 1) };
            }
            state.1 += 1;
        }
    }

    //--------------------------------------------------------------

    /// Appends an element to the back of the dynamic array.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds the allocation limit.
    ///
    /// # Time complexity
    ///
    /// Takes amortized *O*(1) time.
    /// If the dynamic array's length would exceed its capacity after the push, *O*(*capacity*) time is taken to copy the dynamic array's elements to a larger allocation.
    #[inline]
    pub fn push(&mut self, value: T) {
        self.emplace_back(value);
    }

    /// The same as `push`, but returns an error when the dynamic array could not grow, in which case it is left untouched.
    pub fn try_push(&mut self, value: T) -> Result<(), TryReserveError> {
        self.try_emplace_back(value).map(|_| ())
    }

    /// Appends an element to the back of the dynamic array and returns a reference to it.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds the allocation limit.
    pub fn emplace_back(&mut self, value: T) -> &mut T {
        if self.len == self.arr.capacity() {
            self.arr.grow_one();
        }
        unsafe { self.push_unchecked(value) }
    }

    /// Appends the value produced by `f` to the back of the dynamic array and returns a reference to it.
    ///
    /// `f` is called before the dynamic array grows, so if it panics, the dynamic array is left untouched.
    pub fn emplace_back_with<F>(&mut self, f: F) -> &mut T where
        F: FnOnce() -> T
    {
        let value = f();
        self.emplace_back(value)
    }

    /// The same as `emplace_back`, but returns an error when the dynamic array could not grow, in which case it is left untouched.
    pub fn try_emplace_back(&mut self, value: T) -> Result<&mut T, TryReserveError> {
        if self.len == self.arr.capacity() {
            self.arr.try_reserve(self.len, 1)?;
        }
        Ok(unsafe { self.push_unchecked(value) })
    }

    /// Appends an element if there is sufficient spare capacity, otherwise an error is returned with the element.
    pub fn push_within_capacity(&mut self, value: T) -> Result<(), T> {
        if self.len == self.arr.capacity() {
            return Err(value);
        }
        unsafe { self.push_unchecked(value) };
        Ok(())
    }

    unsafe fn push_unchecked(&mut self, value: T) -> &mut T {
        let end = slot(self.arr.ptr(), self.len);
        self.arr.allocator().construct(end, value);
        self.len += 1;
        &mut *end.as_ptr()
    }

    /// Removes the last element from the dynamic array and returns it, or `None` if it is empty.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            None
        } else {
            unsafe {
                self.len -= 1;
                Some(ptr::read(self.as_ptr().add(self.len)))
            }
        }
    }

    /// Destroys the last element, does nothing if the dynamic array is empty.
    pub fn pop_back(&mut self) {
        if self.len != 0 {
            self.len -= 1;
            unsafe { self.arr.allocator().destroy(slot(self.arr.ptr(), self.len)) };
        }
    }

    /// Appends clones of all values in `src` to the back of the dynamic array.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds the allocation limit.
    pub fn extend_from_slice(&mut self, src: &[T]) where
        T: Clone
    {
        self.insert_from_slice(self.len, src);
    }

    /// The same as `extend_from_slice`, but returns an error when the dynamic array could not grow, in which case it is left untouched.
    pub fn try_extend_from_slice(&mut self, src: &[T]) -> Result<(), TryReserveError> where
        T: Clone
    {
        self.try_insert_from_slice(self.len, src).map(|_| ())
    }

    /// Resizes the dynamic array in-place so that `len` is equal to `new_len`.
    ///
    /// If `new_len` is greater than `len`, the dynamic array is extended by the difference, with each additional slot filled with a clone of `value`.
    /// If `new_len` is less than `len`, the dynamic array is truncated, the capacity is kept.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds the allocation limit.
    ///
    /// # Examples
    ///
    /// ```
    /// use tessel_common::dynarr;
    ///
    /// let mut arr = dynarr!["hello"];
    /// arr.resize(3, "world");
    /// assert_eq!(arr, ["hello", "world", "world"]);
    ///
    /// arr.resize(1, "unused");
    /// assert_eq!(arr, ["hello"]);
    /// assert_eq!(arr.capacity(), 3);
    /// ```
    pub fn resize(&mut self, new_len: usize, value: T) where
        T: Clone
    {
        if let Err(err) = self.try_resize(new_len, value) {
            handle_error(err);
        }
    }

    /// The same as `resize`, but returns an error when the dynamic array could not grow, in which case it is left untouched.
    pub fn try_resize(&mut self, new_len: usize, value: T) -> Result<(), TryReserveError> where
        T: Clone
    {
        self.try_resize_with(new_len, || value.clone())
    }

    /// Resizes the dynamic array in-place so that `len` is equal to `new_len`, filling new slots with the values returned by `f`.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds the allocation limit.
    pub fn resize_with<F>(&mut self, new_len: usize, f: F) where
        F: FnMut() -> T
    {
        if let Err(err) = self.try_resize_with(new_len, f) {
            handle_error(err);
        }
    }

    /// Resizes the dynamic array in-place so that `len` is equal to `new_len`, filling new slots with default values.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds the allocation limit.
    pub fn resize_default(&mut self, new_len: usize) where
        T: Default
    {
        self.resize_with(new_len, T::default)
    }

    fn try_resize_with<F>(&mut self, new_len: usize, mut f: F) -> Result<(), TryReserveError> where
        F: FnMut() -> T
    {
        let len = self.len;
        if new_len > len {
            self.try_reserve(new_len - len)?;
            unsafe { self.insert_from_fn(len, new_len - len, || Some(f())) };
        } else {
            self.truncate(new_len);
        }
        Ok(())
    }

    /// Shortens the dynamic array, keeping the first `len` elements and destroying the rest.
    ///
    /// If `len` is greater or equal to the dynamic array's current length, this has no effect.
    ///
    /// Note that this method has no effect on the allocated capacity of the dynamic array.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        let old_len = self.len;
        self.len = len;
        unsafe { destroy_range(self.arr.allocator(), self.arr.ptr(), len, old_len) };
    }

    /// Clears the dynamic array, destroying all values in order.
    ///
    /// Note that this method has no effect on the allocated capacity of the dynamic array.
    #[inline]
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Exchanges the contents of 2 dynamic arrays.
    ///
    /// When the allocator propagates on swap, the allocators are exchanged together with the storage.
    ///
    /// # Panics
    ///
    /// Panics if the allocator does not propagate on swap and both allocators are not interchangeable.
    #[track_caller]
    pub fn swap_with(&mut self, other: &mut Self) {
        if A::PROPAGATE_ON_SWAP {
            unsafe { self.arr.swap_allocator(&mut other.arr) };
        } else if !self.arr.allocator().interchangeable_with(other.arr.allocator()) {
            log_error!(LOG_CAT, Self::swap_with, "Cannot swap dynamic arrays with non-interchangeable allocators that don't propagate on swap");
            panic!("cannot swap dynamic arrays with non-interchangeable allocators that don't propagate on swap");
        }

        unsafe { self.arr.swap_storage(&mut other.arr) };
        mem::swap(&mut self.len, &mut other.len);
    }
}

/// Creates a dynamic array holding `n` clones of `elem`, using the given allocator.
pub fn from_elem_in<T: Clone, A: Allocator, R: ReserveStrategy>(elem: T, n: usize, alloc: A) -> DynArr<T, A, R> {
    let mut arr = DynArr::with_capacity_in(n, alloc);
    arr.insert_n(0, n, elem);
    arr
}

/// Creates a dynamic array holding `n` clones of `elem`.
pub fn from_elem<T: Clone>(elem: T, n: usize) -> DynArr<T> {
    from_elem_in(elem, n, Mallocator)
}

/// Creates a [`DynArr`] containing the arguments.
///
/// ```
/// use tessel_common::dynarr;
///
/// let arr = dynarr![1, 2, 3];
/// assert_eq!(arr[0], 1);
///
/// let zeros = dynarr![0; 4];
/// assert_eq!(zeros, [0, 0, 0, 0]);
/// ```
#[macro_export]
macro_rules! dynarr {
    () => {
        $crate::collections::DynArr::new()
    };
    ($elem:expr; $n:expr) => {
        $crate::collections::from_elem($elem, $n)
    };
    ($($x:expr),+ $(,)?) => {{
        let mut arr = $crate::collections::DynArr::with_capacity($crate::count_exprs!($($x),+));
        $(arr.push($x);)+
        arr
    }};
}

//--------------------------------------------------------------

impl<T, A: Allocator, R: ReserveStrategy> ops::Deref for DynArr<T, A, R> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T, A: Allocator, R: ReserveStrategy> ops::DerefMut for DynArr<T, A, R> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T: Clone, A: Allocator + Clone, R: ReserveStrategy> Clone for DynArr<T, A, R> {
    fn clone(&self) -> Self {
        self.clone_in(self.arr.allocator().clone())
    }

    /// Overwrites the contents of `self` with a clone of the contents of `source`.
    ///
    /// The storage of `self` is reused when it can hold all values of `source`.
    /// When the allocator propagates on copy, `self` adopts a clone of the allocator of `source`,
    /// if that allocator is not interchangeable with the current one, the current storage is released first.
    fn clone_from(&mut self, source: &Self) {
        if A::PROPAGATE_ON_COPY {
            if !self.arr.allocator().interchangeable_with(source.arr.allocator()) {
                self.clear();
                unsafe { self.arr.release() };
            }
            unsafe { self.arr.set_allocator(source.arr.allocator().clone()) };
        }
        self.assign_from_slice(source);
    }
}

impl<T: Hash, A: Allocator, R: ReserveStrategy> Hash for DynArr<T, A, R> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        Hash::hash(&**self, state)
    }
}

impl<T, I: SliceIndex<[T]>, A: Allocator, R: ReserveStrategy> Index<I> for DynArr<T, A, R> {
    type Output = I::Output;

    #[inline]
    fn index(&self, index: I) -> &Self::Output {
        Index::index(&**self, index)
    }
}

impl<T, I: SliceIndex<[T]>, A: Allocator, R: ReserveStrategy> IndexMut<I> for DynArr<T, A, R> {
    #[inline]
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        IndexMut::index_mut(&mut **self, index)
    }
}

impl<T, A: Allocator + Default, R: ReserveStrategy> FromIterator<T> for DynArr<T, A, R> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_iter_in(iter, A::default())
    }
}

impl<T, A: Allocator, R: ReserveStrategy> IntoIterator for DynArr<T, A, R> {
    type Item = T;
    type IntoIter = IntoIter<T, A, R>;

    /// Creates a consuming iterator, that is, one that moves each value out of the dynamic array (from start to end).
    /// The dynamic array cannot be used after calling this.
    fn into_iter(self) -> Self::IntoIter {
        let me = ManuallyDrop::new(self);
        let arr = unsafe { ptr::read(&me.arr) };
        IntoIter::new(arr, me.len)
    }
}

impl<'a, T, A: Allocator, R: ReserveStrategy> IntoIterator for &'a DynArr<T, A, R> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, A: Allocator, R: ReserveStrategy> IntoIterator for &'a mut DynArr<T, A, R> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T, A: Allocator, R: ReserveStrategy> Extend<T> for DynArr<T, A, R> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        self.reserve(lower);
        for value in iter {
            self.push(value);
        }
    }
}

impl<'a, T: Copy + 'a, A: Allocator, R: ReserveStrategy> Extend<&'a T> for DynArr<T, A, R> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied())
    }
}

impl_slice_partial_eq_generic!([A0: Allocator, A1: Allocator, R0: ReserveStrategy, R1: ReserveStrategy] DynArr<T, A0, R0>, DynArr<U, A1, R1>);
impl_slice_partial_eq_generic!([A: Allocator, R: ReserveStrategy] DynArr<T, A, R>, &[U]);
impl_slice_partial_eq_generic!([A: Allocator, R: ReserveStrategy] DynArr<T, A, R>, &mut [U]);
impl_slice_partial_eq_generic!([A: Allocator, R: ReserveStrategy] &[T], DynArr<U, A, R>);
impl_slice_partial_eq_generic!([A: Allocator, R: ReserveStrategy] &mut [T], DynArr<U, A, R>);
impl_slice_partial_eq_generic!([A: Allocator, R: ReserveStrategy] DynArr<T, A, R>, [U]);
impl_slice_partial_eq_generic!([A: Allocator, R: ReserveStrategy] [T], DynArr<U, A, R>);
impl_slice_partial_eq_generic!([A: Allocator, R: ReserveStrategy, const N: usize] DynArr<T, A, R>, [U; N]);
impl_slice_partial_eq_generic!([A: Allocator, R: ReserveStrategy, const N: usize] [T; N], DynArr<U, A, R>);

impl<T, A0, A1, R0, R1> PartialOrd<DynArr<T, A1, R1>> for DynArr<T, A0, R0> where
    T: PartialOrd,
    A0: Allocator,
    A1: Allocator,
    R0: ReserveStrategy,
    R1: ReserveStrategy,
{
    #[inline]
    fn partial_cmp(&self, other: &DynArr<T, A1, R1>) -> Option<cmp::Ordering> {
        PartialOrd::partial_cmp(&**self, &**other)
    }
}

impl<T: Eq, A: Allocator, R: ReserveStrategy> Eq for DynArr<T, A, R> {}

impl<T: Ord, A: Allocator, R: ReserveStrategy> Ord for DynArr<T, A, R> {
    #[inline]
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        Ord::cmp(&**self, &**other)
    }
}

impl<T, A: Allocator, R: ReserveStrategy> Drop for DynArr<T, A, R> {
    fn drop(&mut self) {
        // The raw array releases the storage afterwards, even when a destructor panics.
        unsafe { destroy_range(self.arr.allocator(), self.arr.ptr(), 0, self.len) };
    }
}

impl<T, A: Allocator + Default, R: ReserveStrategy> Default for DynArr<T, A, R> {
    /// Creates an empty `DynArr<T, A, R>`.
    ///
    /// The dynamic array will not allocate until elements are pushed onto it.
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T: fmt::Debug, A: Allocator, R: ReserveStrategy> fmt::Debug for DynArr<T, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

impl<T, A: Allocator, R: ReserveStrategy> AsRef<[T]> for DynArr<T, A, R> {
    fn as_ref(&self) -> &[T] {
        self
    }
}

impl<T, A: Allocator, R: ReserveStrategy> AsMut<[T]> for DynArr<T, A, R> {
    fn as_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T: Clone, A: Allocator + Default, R: ReserveStrategy> From<&[T]> for DynArr<T, A, R> {
    /// Allocates a `DynArr<T, A, R>` and fills it by cloning `s`'s items.
    fn from(s: &[T]) -> Self {
        Self::from_slice_in(s, A::default())
    }
}

impl<T, A: Allocator + Default, R: ReserveStrategy, const N: usize> From<[T; N]> for DynArr<T, A, R> {
    /// Allocates a `DynArr<T, A, R>` and moves `s`'s items into it.
    fn from(s: [T; N]) -> Self {
        let mut arr = Self::with_capacity_in(N, A::default());
        arr.extend(s);
        arr
    }
}
