use std::alloc::Layout;
use std::marker::PhantomData;
use std::ptr::{self, NonNull};

use crate::collections::alloc::{Global, RawAllocator};
use crate::collections::contiguous::growth;
use crate::collections::error::{CapacityOverflow, GrowthFailure};

/// A single contiguous allocation of raw element slots, together with the allocator handle that
/// produced it.
///
/// A Block owns its memory exclusively and is move-only at the ownership level: there is no way
/// to copy one, and dropping it releases the allocation. It deliberately knows nothing about
/// which slots hold live elements, so its [`Drop`] never runs element destructors; the owning
/// collection destroys its live range first and lets the Block reclaim the bytes.
///
/// Zero-sized element types and zero capacities are served with a dangling pointer and no
/// allocator traffic at all.
pub struct Block<T, A: RawAllocator = Global> {
    ptr: NonNull<T>,
    cap: usize,
    alloc: A,
    _phantom: PhantomData<T>,
}

impl<T, A: RawAllocator> Block<T, A> {
    /// Creates a Block with capacity 0 and no allocation behind it.
    pub const fn dangling_in(alloc: A) -> Block<T, A> {
        Block {
            ptr: NonNull::dangling(),
            cap: 0,
            alloc,
            _phantom: PhantomData,
        }
    }

    /// Allocates storage for exactly `cap` elements. Every slot is uninitialized.
    ///
    /// # Errors
    /// Fails with [`CapacityOverflow`] if `cap` elements of `T` exceed the maximum allocation
    /// size, and with [`AllocationFailure`](crate::collections::error::AllocationFailure) if the
    /// allocator cannot serve the request. Either way, nothing was allocated.
    pub fn allocate_in(cap: usize, alloc: A) -> Result<Block<T, A>, GrowthFailure> {
        if cap > growth::max_cap::<T>() {
            return Err(CapacityOverflow.into());
        }

        if cap == 0 || size_of::<T>() == 0 {
            let mut block = Block::dangling_in(alloc);
            block.cap = cap;
            return Ok(block);
        }

        let layout = Layout::array::<T>(cap).map_err(|_| CapacityOverflow)?;
        let ptr = alloc.allocate(layout)?.cast::<T>();

        Ok(Block {
            ptr,
            cap,
            alloc,
            _phantom: PhantomData,
        })
    }

    /// Returns the number of slots in the Block.
    pub const fn cap(&self) -> usize {
        self.cap
    }

    /// Returns a reference to the allocator this Block was carved from.
    pub const fn allocator(&self) -> &A {
        &self.alloc
    }

    /// The base address of the allocation. Dangling (but well-aligned) for empty Blocks and
    /// zero-sized element types.
    pub(crate) const fn base(&self) -> NonNull<T> {
        self.ptr
    }

    /// A raw pointer to slot `index`.
    ///
    /// # Safety
    /// `index` must be within the allocated capacity. Whether the slot may be read or must only
    /// be written is determined by its liveness, which the caller tracks.
    pub(crate) unsafe fn slot(&self, index: usize) -> *mut T {
        // SAFETY: the caller guarantees index is within the allocation.
        unsafe { self.ptr.add(index).as_ptr() }
    }

    /// Placement-constructs one element at `index` by moving `value` into the slot.
    ///
    /// # Safety
    /// `index` must be within capacity and the slot must not currently hold a live element, or
    /// that element's destructor will never run.
    pub(crate) unsafe fn construct(&mut self, index: usize, value: T) {
        // SAFETY: in-bounds per the caller's contract.
        unsafe { self.ptr.add(index).write(value) }
    }

    /// Runs destructors for the slots in `[start, end)`, leaving them uninitialized.
    ///
    /// # Safety
    /// The range must be within capacity and every slot in it must hold a live element. Element
    /// destructors are assumed not to unwind.
    pub(crate) unsafe fn destroy_range(&mut self, start: usize, end: usize) {
        // SAFETY: the range is in-bounds and live per the caller's contract, so it forms a valid
        // slice to drop in place.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                self.ptr.add(start).as_ptr(),
                end - start,
            ));
        }
    }

    /// Bitwise-transfers the first `count` elements of `src` into the front of this Block. The
    /// source slots still contain the old bytes afterwards; the caller must ensure they are
    /// treated as dead (released without destructors, as this Block type's [`Drop`] does).
    ///
    /// # Safety
    /// `src`'s first `count` slots must be live, this Block's capacity must be at least `count`,
    /// and the two Blocks must be distinct allocations.
    pub(crate) unsafe fn transfer_from(&mut self, src: &Block<T, A>, count: usize) {
        // SAFETY: both ranges are in-bounds and the allocations are disjoint per the caller's
        // contract.
        unsafe {
            ptr::copy_nonoverlapping(src.ptr.as_ptr(), self.ptr.as_ptr(), count);
        }
    }
}

impl<T, A: RawAllocator> Drop for Block<T, A> {
    fn drop(&mut self) {
        if self.cap == 0 || size_of::<T>() == 0 {
            return;
        }

        // The layout always round-trips: allocate_in rejected anything unrepresentable.
        let Ok(layout) = Layout::array::<T>(self.cap) else {
            return;
        };

        // SAFETY: ptr was obtained from this allocator with this exact layout, and ownership is
        // exclusive so it hasn't been released before.
        unsafe { self.alloc.deallocate(self.ptr.cast(), layout) }
    }
}

// SAFETY: a Block owns its allocation exclusively through a unique pointer, so sending it to
// another thread is safe whenever the element type and allocator handle are.
unsafe impl<T: Send, A: RawAllocator + Send> Send for Block<T, A> {}
// SAFETY: a Block hands out no interior mutability of its own; shared access follows the borrow
// rules of the element type and allocator handle.
unsafe impl<T: Sync, A: RawAllocator + Sync> Sync for Block<T, A> {}
