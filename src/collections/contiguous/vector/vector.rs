use std::borrow::{Borrow, BorrowMut};
use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::mem;
use std::ops::{Deref, DerefMut, Range};
use std::ptr;
use std::slice;

use crate::collections::alloc::{Global, RawAllocator};
use crate::collections::contiguous::{Block, growth};
use crate::collections::error::{
    BuildFailure, CapacityOverflow, GrowthFailure, IndexOrGrowthFailure, IndexOutOfBounds,
};
use crate::util::result::ResultExtension;

/// A variable size contiguous collection, built on a single [`Block<T, A>`] and a geometric
/// growth policy.
///
/// # Capacity
/// Unlike [`Vec`], the capacity is guaranteed to be exactly the value produced by whichever
/// capacity manipulation ran last: explicit reservation allocates exactly what was asked for,
/// and only growth forced by insertion consults the growth policy.
///
/// # Failure guarantees
/// Every fallible operation exists as a checked `try_` method; the undecorated methods panic
/// with the same error's message. `try_push`, `try_push_with`, `try_reserve`, `try_resize` and
/// `try_resize_with` make the strong guarantee: on an error return the Vector's length, capacity,
/// elements and data pointer are exactly what they were before the call. This works because a
/// replacement allocation is fully populated before the old one is released.
///
/// # Pointer and iterator validity
/// Any operation that reallocates (an appending or inserting call that exceeds the capacity, a
/// successful `reserve`, `shrink_to_fit` or `adjust_cap`) invalidates every pointer previously
/// obtained from [`as_ptr`](Vector::as_ptr) or the [`Deref`] slice. Operations that stay within
/// capacity leave the data pointer unchanged. Borrowed iterators are slices underneath, so the
/// borrow checker already rejects holding one across any mutating call.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of items in the Vector.
/// - `i`: The index of the item in question.
/// - `m`: The number of items in the second Vector.
///
/// | Method | Complexity |
/// |-|-|
/// | `len` | `O(1)` |
/// | `push` | `O(1)`*, `O(n)` |
/// | `push_unchecked` | `O(1)` |
/// | `pop` | `O(1)` |
/// | `insert` | `O(n-i)` |
/// | `remove` | `O(n-i)` |
/// | `replace` | `O(1)` |
/// | `at` | `O(1)` |
/// | `reserve` | `O(n)`**, `O(1)` |
/// | `shrink_to_fit` | `O(n)` |
/// | `adjust_cap` | `O(n)` |
/// | `resize` | `O(n)` |
/// | `append` | `O(n+m)` |
///
/// \* If the Vector doesn't have enough capacity for the new element, `push` will take `O(n)`.
///
/// \** If the Vector has enough capacity for the additional items already, `reserve` is `O(1)`.
pub struct Vector<T, A: RawAllocator = Global> {
    pub(crate) block: Block<T, A>,
    pub(crate) len: usize,
}

impl<T> Vector<T> {
    /// Creates a new Vector with length and capacity 0. Memory will be allocated when the
    /// capacity changes.
    ///
    /// # Examples
    /// ```
    /// # use container_lib::collections::contiguous::Vector;
    /// let vec: Vector<u8> = Vector::new();
    /// assert_eq!(vec.len(), 0);
    /// assert_eq!(vec.cap(), 0);
    /// ```
    pub const fn new() -> Vector<T> {
        Vector {
            block: Block::dangling_in(Global),
            len: 0,
        }
    }

    /// Creates a new Vector with capacity exactly equal to the provided value, allowing values
    /// to be added without reallocation.
    ///
    /// # Panics
    /// Panics if the capacity is unrepresentable or the allocation fails. See
    /// [`try_with_cap`](Vector::try_with_cap).
    ///
    /// # Examples
    /// ```
    /// # use container_lib::collections::contiguous::Vector;
    /// let mut vec: Vector<u8> = Vector::with_cap(5);
    /// assert_eq!(vec.cap(), 5);
    /// vec.extend([1_u8, 2, 3, 4, 5]);
    /// assert_eq!(vec.cap(), 5);
    /// ```
    pub fn with_cap(cap: usize) -> Vector<T> {
        Self::try_with_cap(cap).throw()
    }

    /// The checked form of [`with_cap`](Vector::with_cap).
    ///
    /// # Errors
    /// Fails with [`GrowthFailure`] if the capacity is unrepresentable or the allocation fails;
    /// nothing is allocated in that case.
    pub fn try_with_cap(cap: usize) -> Result<Vector<T>, GrowthFailure> {
        Self::try_with_cap_in(cap, Global)
    }
}

impl<T: Clone> Vector<T> {
    /// Creates a new Vector holding `count` clones of `item`.
    ///
    /// # Panics
    /// Panics if the capacity is unrepresentable or the allocation fails.
    ///
    /// # Examples
    /// ```
    /// # use container_lib::collections::contiguous::Vector;
    /// let vec = Vector::repeat_item(7_u8, 3);
    /// assert_eq!(&*vec, &[7, 7, 7]);
    /// ```
    pub fn repeat_item(item: T, count: usize) -> Vector<T> {
        let mut vec = Vector::with_cap(count);
        vec.resize(count, item);
        vec
    }
}

impl<T, A: RawAllocator> Vector<T, A> {
    /// Creates a new, empty Vector that will draw its storage from `alloc`.
    pub const fn new_in(alloc: A) -> Vector<T, A> {
        Vector {
            block: Block::dangling_in(alloc),
            len: 0,
        }
    }

    /// Creates a Vector with capacity exactly `cap`, drawing its storage from `alloc`.
    ///
    /// # Errors
    /// Fails with [`GrowthFailure`] if the capacity is unrepresentable or the allocation fails;
    /// nothing is allocated in that case.
    pub fn try_with_cap_in(cap: usize, alloc: A) -> Result<Vector<T, A>, GrowthFailure> {
        Ok(Vector {
            block: Block::allocate_in(cap, alloc)?,
            len: 0,
        })
    }

    /// Returns the length of the Vector.
    ///
    /// # Examples
    /// ```
    /// # use container_lib::collections::contiguous::Vector;
    /// let vec = Vector::from_iter(1_u8..=3);
    /// assert_eq!(vec.len(), 3);
    /// ```
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the Vector contains no elements.
    ///
    /// # Examples
    /// ```
    /// # use container_lib::collections::contiguous::Vector;
    /// let mut vec: Vector<u8> = Vector::new();
    /// assert!(vec.is_empty());
    /// vec.push(1);
    /// assert!(!vec.is_empty())
    /// ```
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the current capacity of the Vector.
    ///
    /// # Examples
    /// ```
    /// # use container_lib::collections::contiguous::Vector;
    /// let vec: Vector<u8> = Vector::with_cap(5);
    /// assert_eq!(vec.cap(), 5);
    /// ```
    pub const fn cap(&self) -> usize {
        self.block.cap()
    }

    /// Returns a reference to the allocator the Vector draws its storage from.
    pub const fn allocator(&self) -> &A {
        self.block.allocator()
    }

    /// The largest capacity a `Vector<T>` can ever have: allocations are limited to
    /// [`isize::MAX`] bytes, so this depends on the size of `T`. Zero-sized types are limited
    /// only by the length counter.
    pub const fn max_cap() -> usize {
        growth::max_cap::<T>()
    }

    /// The live elements as a slice. Equivalent to the [`Deref`] view, but usable where type
    /// inference needs help.
    pub fn as_slice(&self) -> &[T] {
        self
    }

    /// The live elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }

    /// A raw pointer to the first element slot, valid until the next reallocating operation.
    /// Dangling (but well-aligned) when the capacity is 0 or `T` is zero-sized.
    pub const fn as_ptr(&self) -> *const T {
        self.block.base().as_ptr()
    }

    /// The mutable counterpart of [`as_ptr`](Vector::as_ptr), under the same validity rule.
    pub const fn as_mut_ptr(&mut self) -> *mut T {
        self.block.base().as_ptr()
    }

    /// Push the provided value onto the end of the Vector, increasing the capacity if required.
    ///
    /// # Panics
    /// Panics if growing the Vector fails. See [`try_push`](Vector::try_push).
    ///
    /// # Examples
    /// ```
    /// # use container_lib::collections::contiguous::Vector;
    /// let mut vec = Vector::<u8>::new();
    /// for i in 0..=5 {
    ///     vec.push(i);
    /// }
    /// assert_eq!(&*vec, &[0, 1, 2, 3, 4, 5]);
    /// ```
    pub fn push(&mut self, value: T) {
        self.try_push(value).throw()
    }

    /// The checked form of [`push`](Vector::push).
    ///
    /// # Errors
    /// Fails with [`GrowthFailure`] if the Vector was full and a larger allocation could not be
    /// obtained. The strong guarantee holds: on an error the Vector is observably unchanged and
    /// `value` is dropped.
    pub fn try_push(&mut self, value: T) -> Result<(), GrowthFailure> {
        if self.len == self.cap() {
            let mut next = self.grow_for_one()?;
            // SAFETY: the replacement block has capacity for at least len + 1 elements and the
            // slot at len is not live.
            unsafe { next.construct(self.len, value) };
            self.commit_block(next);
        } else {
            // SAFETY: len < cap, so the slot exists and is not live.
            unsafe { self.block.construct(self.len, value) };
        }

        self.len += 1;
        Ok(())
    }

    /// Builds a value with `build` and pushes it, growing as required. This is the in-place
    /// construction entry point: the builder only runs once storage for the element is certain
    /// to exist.
    ///
    /// # Errors
    /// Fails with [`BuildFailure::Growth`] if growing failed (the builder never ran), or with
    /// [`BuildFailure::Construction`] carrying the builder's own error. Either way the strong
    /// guarantee holds: the Vector is observably unchanged.
    pub fn try_push_with<E>(
        &mut self,
        build: impl FnOnce() -> Result<T, E>,
    ) -> Result<(), BuildFailure<E>> {
        if self.len == self.cap() {
            let mut next = self.grow_for_one()?;
            let value = build().map_err(BuildFailure::Construction)?;
            // SAFETY: the replacement block has capacity for at least len + 1 elements and the
            // slot at len is not live.
            unsafe { next.construct(self.len, value) };
            self.commit_block(next);
        } else {
            let value = build().map_err(BuildFailure::Construction)?;
            // SAFETY: len < cap, so the slot exists and is not live.
            unsafe { self.block.construct(self.len, value) };
        }

        self.len += 1;
        Ok(())
    }

    /// Push the provided value onto the end of the Vector, assuming that there is enough
    /// capacity to do so.
    ///
    /// # Safety
    /// It is up to the caller to ensure that the Vector has enough capacity to add the provided
    /// value, using methods like [`reserve`](Vector::reserve) or [`with_cap`](Vector::with_cap)
    /// to do so. Using this method on a Vector without spare capacity is undefined behavior.
    ///
    /// # Examples
    /// ```
    /// # use container_lib::collections::contiguous::Vector;
    /// let mut vec = Vector::with_cap(3);
    /// for i in 1_u8..=3 {
    ///     // SAFETY: We know that vec has enough capacity to store all three elements.
    ///     unsafe { vec.push_unchecked(i); }
    /// }
    /// assert_eq!(&*vec, &[1, 2, 3]);
    /// ```
    pub unsafe fn push_unchecked(&mut self, value: T) {
        // SAFETY: the caller guarantees len < cap, so the slot exists and is not live.
        unsafe { self.block.construct(self.len, value) };
        self.len += 1;
    }

    /// Pops the last value off the end of the Vector, returning an owned value if the Vector
    /// has length greater than 0. Never reallocates, so the data pointer is unaffected.
    ///
    /// # Examples
    /// ```
    /// # use container_lib::collections::contiguous::Vector;
    /// let mut vec = Vector::from_iter(0..5);
    /// for i in (0..vec.len()).rev() {
    ///     assert_eq!(vec.pop(), Some(i));
    /// }
    /// assert_eq!(vec.pop(), None);
    /// ```
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            None
        } else {
            self.len -= 1;
            // SAFETY: len was just lowered past the last live slot, which won't be read again:
            // the bytes on the heap are forgotten in favor of the returned copy.
            Some(unsafe { self.block.slot(self.len).read() })
        }
    }

    /// Pops the last value off the end of the Vector, assuming one exists.
    ///
    /// # Safety
    /// The Vector must not be empty. Popping an empty Vector through this method is undefined
    /// behavior; use [`pop`](Vector::pop) when emptiness is not already established.
    pub unsafe fn pop_unchecked(&mut self) -> T {
        self.len -= 1;
        // SAFETY: the caller guarantees the Vector was non-empty, so the slot at the lowered
        // length is live and won't be read again.
        unsafe { self.block.slot(self.len).read() }
    }

    /// Inserts the provided value at the given index, growing and moving items as necessary.
    /// `index` may equal the length, in which case this appends.
    ///
    /// # Panics
    /// Panics if the provided index is out of bounds or growing the Vector fails.
    ///
    /// # Examples
    /// ```
    /// # use container_lib::collections::contiguous::Vector;
    /// let mut vec = Vector::from_iter(0..3);
    /// vec.insert(1, 100);
    /// vec.insert(1, 200);
    /// vec.insert(3, 300);
    /// assert_eq!(&*vec, &[0, 200, 100, 300, 1, 2]);
    /// ```
    pub fn insert(&mut self, index: usize, value: T) {
        self.try_insert(index, value).throw()
    }

    /// The checked form of [`insert`](Vector::insert).
    ///
    /// # Errors
    /// Fails with [`IndexOutOfBounds`] if `index > len`, or with a [`GrowthFailure`] if the
    /// Vector was full and could not grow. Validation precedes mutation and the element shift
    /// is bitwise, so on any error the Vector is observably unchanged and `value` is dropped.
    pub fn try_insert(&mut self, index: usize, value: T) -> Result<(), IndexOrGrowthFailure> {
        if index > self.len {
            return Err(IndexOutOfBounds { index, len: self.len }.into());
        }

        if self.len == self.cap() {
            let mut next = self.grow_for_one()?;
            // SAFETY: the replacement block already holds the first len elements and has room
            // for one more; the tail [index, len) shifts right within it, then the gap is
            // written without being read.
            unsafe {
                let base = next.base().as_ptr();
                ptr::copy(base.add(index), base.add(index + 1), self.len - index);
                next.construct(index, value);
            }
            self.commit_block(next);
        } else {
            // SAFETY: len < cap, so the shifted tail stays inside the allocation; the gap at
            // index is then written without being read.
            unsafe {
                let base = self.block.base().as_ptr();
                ptr::copy(base.add(index), base.add(index + 1), self.len - index);
                self.block.construct(index, value);
            }
        }

        self.len += 1;
        Ok(())
    }

    /// Removes the element at the provided index, moving all following values to fill in the
    /// gap. Never reallocates.
    ///
    /// # Panics
    /// Panics if the provided index is out of bounds.
    ///
    /// # Examples
    /// ```
    /// # use container_lib::collections::contiguous::Vector;
    /// let mut vec: Vector<_> = "Hello world!".chars().collect();
    /// assert_eq!(vec.remove(1), 'e');
    /// assert_eq!(vec.remove(4), ' ');
    /// assert_eq!(vec, "Hlloworld!".chars().collect());
    /// ```
    pub fn remove(&mut self, index: usize) -> T {
        self.try_remove(index).throw()
    }

    /// The checked form of [`remove`](Vector::remove).
    ///
    /// # Errors
    /// Fails with [`IndexOutOfBounds`] if `index >= len`, leaving the Vector untouched.
    pub fn try_remove(&mut self, index: usize) -> Result<T, IndexOutOfBounds> {
        self.check_index(index)?;

        // SAFETY: index < len, so the slot is live; after the copy the duplicated last slot
        // lies beyond the lowered length and is never touched again.
        let value = unsafe {
            let base = self.block.base().as_ptr();
            let value = ptr::read(base.add(index));
            ptr::copy(base.add(index + 1), base.add(index), self.len - index - 1);
            value
        };

        self.len -= 1;
        Ok(value)
    }

    /// Removes the elements in `range`, destroying them and moving the tail left to fill the
    /// gap. Never reallocates; with a non-unwinding element destructor this cannot fail partway.
    ///
    /// # Panics
    /// Panics if the range is decreasing or its end exceeds the length.
    pub fn remove_range(&mut self, range: Range<usize>) {
        self.try_remove_range(range).throw()
    }

    /// The checked form of [`remove_range`](Vector::remove_range).
    ///
    /// # Errors
    /// Fails with [`IndexOutOfBounds`] if the range is decreasing or reaches past the length,
    /// leaving the Vector untouched.
    pub fn try_remove_range(&mut self, range: Range<usize>) -> Result<(), IndexOutOfBounds> {
        if range.start > range.end || range.end > self.len {
            return Err(IndexOutOfBounds { index: range.end, len: self.len });
        }

        let count = range.end - range.start;
        if count == 0 {
            return Ok(());
        }

        // SAFETY: [start, end) is live and destroyed exactly once; the surviving tail then
        // shifts down over the dead slots, leaving the duplicates beyond the lowered length.
        unsafe {
            self.block.destroy_range(range.start, range.end);
            let base = self.block.base().as_ptr();
            ptr::copy(base.add(range.end), base.add(range.start), self.len - range.end);
        }

        self.len -= count;
        Ok(())
    }

    /// Replaces the element at the provided index with `new_value`, returning the old value.
    ///
    /// # Panics
    /// Panics if the provided index is out of bounds.
    pub fn replace(&mut self, index: usize, new_value: T) -> T {
        self.try_replace(index, new_value).throw()
    }

    /// The checked form of [`replace`](Vector::replace).
    ///
    /// # Errors
    /// Fails with [`IndexOutOfBounds`] if `index >= len`, dropping `new_value` and leaving the
    /// Vector untouched.
    pub fn try_replace(&mut self, index: usize, new_value: T) -> Result<T, IndexOutOfBounds> {
        self.check_index(index)?;

        // SAFETY: index < len, so the slot holds a live element to swap out.
        Ok(unsafe { ptr::replace(self.block.slot(index), new_value) })
    }

    /// A bounds-checked accessor: a reference to the element at `index`, or an error carrying
    /// the rejected index and the current length.
    ///
    /// # Errors
    /// Fails with [`IndexOutOfBounds`] if `index >= len`.
    ///
    /// # Examples
    /// ```
    /// # use container_lib::collections::contiguous::Vector;
    /// let vec = Vector::from_iter(1_u8..=3);
    /// assert_eq!(vec.at(2), Ok(&3));
    /// assert!(vec.at(3).is_err());
    /// ```
    pub fn at(&self, index: usize) -> Result<&T, IndexOutOfBounds> {
        self.check_index(index)?;

        // SAFETY: index < len, so the slot is live.
        Ok(unsafe { &*self.block.slot(index) })
    }

    /// The mutable counterpart of [`at`](Vector::at).
    ///
    /// # Errors
    /// Fails with [`IndexOutOfBounds`] if `index >= len`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, IndexOutOfBounds> {
        self.check_index(index)?;

        // SAFETY: index < len, so the slot is live, and the mutable borrow of self makes the
        // reference exclusive.
        Ok(unsafe { &mut *self.block.slot(index) })
    }

    /// Destroys every live element. The capacity is unaffected.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Destroys the trailing elements so that exactly `new_len` remain. Does nothing if the
    /// Vector is already no longer than that. The capacity is unaffected.
    pub fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len {
            return;
        }

        let old_len = self.len;
        // Lower the boundary before running destructors.
        self.len = new_len;
        // SAFETY: [new_len, old_len) was live and now lies beyond the length.
        unsafe { self.block.destroy_range(new_len, old_len) };
    }

    /// Ensures that the Vector has capacity for `extra` elements beyond its current length,
    /// reallocating to exactly `len + extra` if it doesn't. Explicit reservation bypasses the
    /// growth policy.
    ///
    /// # Panics
    /// Panics if the new capacity is unrepresentable or the allocation fails. See
    /// [`try_reserve`](Vector::try_reserve).
    pub fn reserve(&mut self, extra: usize) {
        self.try_reserve(extra).throw()
    }

    /// The checked form of [`reserve`](Vector::reserve).
    ///
    /// # Errors
    /// Fails with [`GrowthFailure`] if the requested capacity is unrepresentable or the
    /// allocation fails. The strong guarantee holds: on an error the Vector is observably
    /// unchanged.
    pub fn try_reserve(&mut self, extra: usize) -> Result<(), GrowthFailure> {
        let new_cap = self.len.checked_add(extra).ok_or(CapacityOverflow)?;

        if new_cap <= self.cap() {
            return Ok(());
        }

        self.realloc_exact(new_cap)
    }

    /// Shrinks the Vector so that its capacity is equal to its length.
    ///
    /// # Panics
    /// Panics if the replacement allocation fails.
    pub fn shrink_to_fit(&mut self) {
        self.try_shrink_to_fit().throw()
    }

    /// The checked form of [`shrink_to_fit`](Vector::shrink_to_fit).
    ///
    /// # Errors
    /// Fails with [`GrowthFailure`] if the smaller allocation cannot be obtained, in which case
    /// the Vector keeps its current storage.
    pub fn try_shrink_to_fit(&mut self) -> Result<(), GrowthFailure> {
        self.realloc_exact(self.len)
    }

    /// Adjusts the capacity of the Vector to exactly `new_cap`, destroying trailing elements
    /// first if the length exceeds it.
    ///
    /// # Panics
    /// Panics if the replacement allocation fails.
    pub fn adjust_cap(&mut self, new_cap: usize) {
        self.try_adjust_cap(new_cap).throw()
    }

    /// The checked form of [`adjust_cap`](Vector::adjust_cap).
    ///
    /// # Errors
    /// Fails with [`GrowthFailure`] if the replacement allocation cannot be obtained. Elements
    /// beyond `new_cap` have been destroyed by then; the storage is unchanged.
    pub fn try_adjust_cap(&mut self, new_cap: usize) -> Result<(), GrowthFailure> {
        if new_cap < self.len {
            self.truncate(new_cap);
        }

        self.realloc_exact(new_cap)
    }

    /// Resizes the Vector to `new_len` elements: clones of `value` are appended to grow, and
    /// trailing elements are destroyed to shrink.
    ///
    /// # Panics
    /// Panics if growing the Vector fails.
    ///
    /// # Examples
    /// ```
    /// # use container_lib::collections::contiguous::Vector;
    /// let mut vec = Vector::from_iter(1_u8..=5);
    /// vec.resize(3, 9);
    /// assert_eq!(&*vec, &[1, 2, 3]);
    /// vec.resize(5, 9);
    /// assert_eq!(&*vec, &[1, 2, 3, 9, 9]);
    /// ```
    pub fn resize(&mut self, new_len: usize, value: T)
    where
        T: Clone,
    {
        self.try_resize(new_len, value).throw()
    }

    /// The checked form of [`resize`](Vector::resize).
    ///
    /// # Errors
    /// Fails with [`GrowthFailure`] if growing the Vector fails; the strong guarantee holds.
    pub fn try_resize(&mut self, new_len: usize, value: T) -> Result<(), GrowthFailure>
    where
        T: Clone,
    {
        self.try_resize_with(new_len, || Ok::<T, Infallible>(value.clone()))
            .map_err(strip_infallible)
    }

    /// Resizes the Vector to `new_len` elements, filling with values produced by `build`.
    ///
    /// # Panics
    /// Panics if growing the Vector fails.
    pub fn resize_with(&mut self, new_len: usize, mut build: impl FnMut() -> T) {
        self.try_resize_with(new_len, || Ok::<T, Infallible>(build()))
            .map_err(strip_infallible)
            .throw()
    }

    /// Resizes the Vector to `new_len` elements, filling with values produced by the fallible
    /// `build`. Shrinking never runs the builder.
    ///
    /// # Errors
    /// Fails with [`BuildFailure::Growth`] if growing failed (no builder ran), or with
    /// [`BuildFailure::Construction`] carrying the builder's error. The strong guarantee holds
    /// either way: elements built earlier in the same call are destroyed again and the Vector
    /// is left observably unchanged.
    pub fn try_resize_with<E>(
        &mut self,
        new_len: usize,
        mut build: impl FnMut() -> Result<T, E>,
    ) -> Result<(), BuildFailure<E>> {
        if new_len <= self.len {
            self.truncate(new_len);
            return Ok(());
        }

        if new_len > self.cap() {
            let mut next = self.grown_block(new_len)?;
            // The tail is built in the replacement block before it is committed, so a failed
            // builder leaves the current storage untouched.
            for i in self.len..new_len {
                match build() {
                    // SAFETY: i is within the replacement capacity and the slot is not live.
                    Ok(value) => unsafe { next.construct(i, value) },
                    Err(error) => {
                        // SAFETY: [len, i) were constructed just above and never published.
                        unsafe { next.destroy_range(self.len, i) };
                        return Err(BuildFailure::Construction(error));
                    }
                }
            }
            self.commit_block(next);
        } else {
            for i in self.len..new_len {
                match build() {
                    // SAFETY: i < cap and the slot is beyond the live boundary.
                    Ok(value) => unsafe { self.block.construct(i, value) },
                    Err(error) => {
                        // SAFETY: [len, i) were constructed in this call and still lie beyond
                        // the live boundary, so destroying them restores the pre-call state.
                        unsafe { self.block.destroy_range(self.len, i) };
                        return Err(BuildFailure::Construction(error));
                    }
                }
            }
        }

        self.len = new_len;
        Ok(())
    }

    /// Appends all elements from `other` to self, leaving `other`'s storage to be released.
    ///
    /// # Panics
    /// Panics if growing the Vector fails.
    pub fn append(&mut self, mut other: Vector<T, A>) {
        self.reserve(other.len);

        // SAFETY: capacity now covers the combined length and the two allocations are disjoint.
        unsafe {
            ptr::copy_nonoverlapping(
                other.block.base().as_ptr().cast_const(),
                self.block.base().as_ptr().add(self.len),
                other.len,
            );
        }

        self.len += other.len;
        // The elements moved out bitwise, so other may only release its storage.
        other.len = 0;
    }

    /// Checks that the provided index refers to a live element.
    ///
    /// # Errors
    /// Fails with [`IndexOutOfBounds`] if it doesn't.
    pub(crate) const fn check_index(&self, index: usize) -> Result<(), IndexOutOfBounds> {
        if index < self.len {
            Ok(())
        } else {
            Err(IndexOutOfBounds { index, len: self.len })
        }
    }

    /// Builds a replacement block for at least one more element than the current length.
    fn grow_for_one(&mut self) -> Result<Block<T, A>, GrowthFailure> {
        let minimum = self.len.checked_add(1).ok_or(CapacityOverflow)?;
        self.grown_block(minimum)
    }

    /// Builds a replacement block sized by the growth policy and bitwise-transfers every live
    /// element into it. The current block is untouched until [`commit_block`](Self::commit_block)
    /// runs, which is what upholds the strong guarantee of the growing operations.
    fn grown_block(&mut self, minimum: usize) -> Result<Block<T, A>, GrowthFailure> {
        let new_cap = growth::next_cap(self.cap(), minimum, growth::max_cap::<T>())?;
        let mut next = Block::allocate_in(new_cap, self.block.allocator().clone())?;

        // SAFETY: [0, len) is live, the replacement has capacity for it, and the two
        // allocations are disjoint.
        unsafe { next.transfer_from(&self.block, self.len) };

        Ok(next)
    }

    /// Reallocates to exactly `new_cap` slots, which must cover the current length. No-op when
    /// the capacity already matches.
    fn realloc_exact(&mut self, new_cap: usize) -> Result<(), GrowthFailure> {
        debug_assert!(new_cap >= self.len);

        if new_cap == self.cap() {
            return Ok(());
        }

        let mut next = Block::allocate_in(new_cap, self.block.allocator().clone())?;
        // SAFETY: [0, len) is live, new_cap >= len, and the two allocations are disjoint.
        unsafe { next.transfer_from(&self.block, self.len) };
        self.commit_block(next);

        Ok(())
    }

    /// Swaps in a fully populated replacement block. The old allocation is released without
    /// running destructors, since its elements were transferred out bitwise.
    fn commit_block(&mut self, next: Block<T, A>) {
        drop(mem::replace(&mut self.block, next));
    }
}

/// Collapses a [`BuildFailure`] that cannot carry a construction error.
fn strip_infallible(failure: BuildFailure<Infallible>) -> GrowthFailure {
    match failure {
        BuildFailure::Growth(growth) => growth,
        BuildFailure::Construction(impossible) => match impossible {},
    }
}

impl<T, A: RawAllocator> Extend<T> for Vector<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);

        for item in iter {
            self.push(item);
        }
    }
}

impl<T> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(value: I) -> Self {
        let iter = value.into_iter();
        let mut vec = Vector::with_cap(iter.size_hint().0);

        for item in iter {
            vec.push(item);
        }

        vec
    }
}

impl<T, A: RawAllocator + Default> Default for Vector<T, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T, A: RawAllocator> Drop for Vector<T, A> {
    fn drop(&mut self) {
        // SAFETY: [0, len) is live; the block's own drop releases the storage afterwards.
        unsafe { self.block.destroy_range(0, self.len) };
    }
}

impl<T, A: RawAllocator> Deref for Vector<T, A> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        // SAFETY: the Vector is valid as a slice for len values, which are all live. The
        // pointer is nonnull, properly aligned (dangling pointers included) and the range lies
        // entirely within one allocation of no more than isize::MAX bytes. The borrow checker
        // prevents mutation while the slice is borrowed.
        unsafe { slice::from_raw_parts(self.block.base().as_ptr(), self.len) }
    }
}

impl<T, A: RawAllocator> DerefMut for Vector<T, A> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        // SAFETY: as for Deref, and the mutable borrow of self makes the slice exclusive.
        unsafe { slice::from_raw_parts_mut(self.block.base().as_ptr(), self.len) }
    }
}

impl<T, A: RawAllocator> AsRef<[T]> for Vector<T, A> {
    fn as_ref(&self) -> &[T] {
        self
    }
}

impl<T, A: RawAllocator> AsMut<[T]> for Vector<T, A> {
    fn as_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T, A: RawAllocator> Borrow<[T]> for Vector<T, A> {
    fn borrow(&self) -> &[T] {
        self
    }
}

impl<T, A: RawAllocator> BorrowMut<[T]> for Vector<T, A> {
    fn borrow_mut(&mut self) -> &mut [T] {
        self
    }
}

// SAFETY: Vectors rely on unique ownership of their storage and are therefore safe to send
// whenever the element type and allocator handle are.
unsafe impl<T: Send, A: RawAllocator + Send> Send for Vector<T, A> {}
// SAFETY: the safe API obeys all rules of the borrow checker and adds no interior mutability,
// so shared references are safe whenever the element type and allocator handle are Sync.
unsafe impl<T: Sync, A: RawAllocator + Sync> Sync for Vector<T, A> {}

impl<T: Clone, A: RawAllocator> Clone for Vector<T, A> {
    /// Deep element-wise copy into a freshly allocated block; the storage is never shared.
    ///
    /// # Panics
    /// Panics if the fresh allocation fails.
    fn clone(&self) -> Self {
        let mut vec = Self::try_with_cap_in(self.cap(), self.allocator().clone()).throw();

        for value in self.iter() {
            vec.push(value.clone());
        }

        vec
    }
}

impl<T: PartialEq, A: RawAllocator> PartialEq for Vector<T, A> {
    fn eq(&self, other: &Self) -> bool {
        **self == **other
    }
}

impl<T: Eq, A: RawAllocator> Eq for Vector<T, A> {}

impl<T: PartialOrd, A: RawAllocator> PartialOrd for Vector<T, A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        (**self).partial_cmp(&**other)
    }
}

impl<T: Ord, A: RawAllocator> Ord for Vector<T, A> {
    fn cmp(&self, other: &Self) -> Ordering {
        (**self).cmp(&**other)
    }
}

impl<T: Hash, A: RawAllocator> Hash for Vector<T, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (**self).hash(state);
    }
}

impl<T: Debug, A: RawAllocator> Debug for Vector<T, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vector")
            .field("contents", &self.as_slice())
            .field("len", &self.len)
            .field("cap", &self.cap())
            .finish()
    }
}

impl<T: Debug, A: RawAllocator> Display for Vector<T, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "!")?;
        f.debug_list().entries(self.iter()).finish()
    }
}
