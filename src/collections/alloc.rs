//! The boundary between collection storage and raw memory.
//!
//! Everything a collection allocates flows through [`RawAllocator`], so swapping the allocator
//! (including for the metering and failure-injecting test doubles) never touches container logic.
//! Element construction and destruction are not part of this boundary: placement into raw slots
//! belongs to the storage block that owns them.

use std::alloc::{self, Layout};
use std::ptr::{self, NonNull};

use crate::collections::error::AllocationFailure;

/// A source of raw memory for collection storage.
///
/// Implementations hand out uninitialized blocks; no elements are constructed or destroyed by
/// either method. Allocation failure is reported as a value rather than aborting, which is what
/// allows the containers above to claim their strong failure guarantees.
///
/// Allocator handles are cloned whenever a collection carves a replacement block from the same
/// source, so implementations are expected to be cheap handles (shared state behind [`Rc`] or a
/// zero-sized token, not the backing memory itself).
///
/// [`Rc`]: std::rc::Rc
pub trait RawAllocator: Clone {
    /// Acquires a block of raw, uninitialized memory for `layout`.
    ///
    /// Layouts of zero size must be served without touching any underlying allocator; callers get
    /// a dangling, well-aligned pointer that must never be read through.
    ///
    /// # Errors
    /// Fails with [`AllocationFailure`] if the memory cannot be obtained. The request is never
    /// retried here; retry policy, if any, belongs to the implementation.
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocationFailure>;

    /// Releases a block previously obtained from [`allocate`](RawAllocator::allocate) on this
    /// allocator or one of its clones.
    ///
    /// # Safety
    /// `ptr` must denote a currently allocated block and `layout` must equal the layout it was
    /// allocated with. Passing anything else is undefined behavior.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);
}

/// The process-wide allocator, a zero-sized handle over [`std::alloc`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Global;

impl RawAllocator for Global {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocationFailure> {
        if layout.size() == 0 {
            // The global allocator doesn't accept empty layouts; a well-aligned dangling
            // pointer stands in for them.
            let dangling = ptr::without_provenance_mut::<u8>(layout.align());
            // SAFETY: alignments are nonzero, so the address is nonzero.
            return Ok(unsafe { NonNull::new_unchecked(dangling) });
        }

        // SAFETY: zero-sized layouts have been guarded against.
        let raw = unsafe { alloc::alloc(layout) };

        NonNull::new(raw).ok_or(AllocationFailure { bytes: layout.size() })
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() != 0 {
            // SAFETY: non-dangling pointers handed out by allocate came from alloc::alloc with
            // this exact layout, per the caller's contract.
            unsafe { alloc::dealloc(ptr.as_ptr(), layout) }
        }
    }
}
