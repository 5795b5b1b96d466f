//! Test probes for allocation and destruction behavior.

use std::alloc::Layout;
use std::cell::{Cell, RefCell};
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;
use std::rc::Rc;

use crate::collections::alloc::{Global, RawAllocator};
use crate::collections::error::AllocationFailure;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ZeroSizedType;

/// A value whose clones all share one counter, incremented whenever any of them is dropped.
#[derive(Debug, Clone)]
pub struct CountedDrop(pub Rc<RefCell<usize>>);

impl CountedDrop {
    pub fn new(value: usize) -> CountedDrop {
        CountedDrop(Rc::new(RefCell::new(value)))
    }
}

impl Deref for CountedDrop {
    type Target = Rc<RefCell<usize>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for CountedDrop {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Drop for CountedDrop {
    fn drop(&mut self) {
        self.0.replace_with(|v| *v + 1);
    }
}

/// An allocator that meters its traffic. Clones share counters, so the handle held by a test
/// keeps observing after the collection has cloned the allocator into replacement blocks.
#[derive(Debug, Default, Clone)]
pub struct CountingAlloc {
    allocations: Rc<Cell<usize>>,
    deallocations: Rc<Cell<usize>>,
    bytes: Rc<Cell<usize>>,
}

impl CountingAlloc {
    pub fn new() -> CountingAlloc {
        CountingAlloc::default()
    }

    /// The number of allocations ever made through this handle or its clones.
    pub fn allocations(&self) -> usize {
        self.allocations.get()
    }

    pub fn deallocations(&self) -> usize {
        self.deallocations.get()
    }

    /// The cumulative size of all allocations, in bytes.
    pub fn bytes(&self) -> usize {
        self.bytes.get()
    }
}

impl RawAllocator for CountingAlloc {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocationFailure> {
        self.allocations.set(self.allocations.get() + 1);
        self.bytes.set(self.bytes.get() + layout.size());
        Global.allocate(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        self.deallocations.set(self.deallocations.get() + 1);
        // SAFETY: allocate delegates to Global, so the caller's contract carries over.
        unsafe { Global.deallocate(ptr, layout) }
    }
}

/// An allocator with a budget: the first `allowed` allocations succeed, every one after that
/// fails. Used to inject allocation failure at a chosen point.
#[derive(Debug, Clone)]
pub struct FailingAlloc {
    remaining: Rc<Cell<usize>>,
}

impl FailingAlloc {
    pub fn new(allowed: usize) -> FailingAlloc {
        FailingAlloc {
            remaining: Rc::new(Cell::new(allowed)),
        }
    }
}

impl RawAllocator for FailingAlloc {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocationFailure> {
        if self.remaining.get() == 0 {
            return Err(AllocationFailure { bytes: layout.size() });
        }
        self.remaining.set(self.remaining.get() - 1);
        Global.allocate(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: successful allocations came from Global, so the caller's contract carries over.
        unsafe { Global.deallocate(ptr, layout) }
    }
}
