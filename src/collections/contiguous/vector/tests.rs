#![cfg(test)]

use std::hash::{BuildHasher, RandomState};

use super::*;
use crate::collections::error::{BuildFailure, GrowthFailure, IndexOutOfBounds};
use crate::util::alloc::{CountedDrop, CountingAlloc, FailingAlloc, ZeroSizedType};
use crate::util::panic::assert_panics;

#[test]
fn test_push_growth_invariants() {
    let mut vec = Vector::new();
    let mut last_cap = vec.cap();

    for i in 0_usize..100 {
        vec.push(i);
        assert!(vec.len() <= vec.cap(), "The live range must fit in the allocation.");
        assert!(vec.cap() >= last_cap, "Capacity must never decrease while pushing.");
        last_cap = vec.cap();
    }

    assert_eq!(vec.len(), 100);
    assert_eq!(vec, Vector::from_iter(0..100), "All pushed elements should survive growth.");
}

#[test]
fn test_amortized_allocation_traffic() {
    let alloc = CountingAlloc::new();
    let mut vec = Vector::<u32, _>::new_in(alloc.clone());

    for i in 0..1000 {
        vec.push(i);
    }

    let slots_allocated = alloc.bytes() / size_of::<u32>();
    assert!(
        slots_allocated <= 4 * 1000,
        "Geometric growth should allocate O(n) slots in total, got {slots_allocated}."
    );
    assert!(
        alloc.allocations() <= 12,
        "Geometric growth should reallocate O(log n) times, got {}.",
        alloc.allocations()
    );

    drop(vec);
    assert_eq!(
        alloc.deallocations(),
        alloc.allocations(),
        "Every allocation should have been released."
    );
}

#[test]
fn test_push_strong_guarantee_on_allocation_failure() {
    let mut vec = Vector::<u32, _>::new_in(FailingAlloc::new(1));
    vec.push(1);
    vec.push(2);
    assert_eq!(vec.cap(), 2, "The allocation budget should be spent on the first growth.");

    let ptr = vec.as_ptr();
    let failure = vec.try_push(3).expect_err("the allocator is exhausted");

    assert!(matches!(failure, GrowthFailure::AllocationFailure(_)));
    assert!(failure.is_allocation_failure());
    assert_eq!(vec.len(), 2, "A failed push must not change the length.");
    assert_eq!(vec.cap(), 2, "A failed push must not change the capacity.");
    assert_eq!(&*vec, &[1, 2], "A failed push must not disturb the elements.");
    assert_eq!(vec.as_ptr(), ptr, "A failed push must not move the storage.");
}

#[test]
fn test_push_with_construction_failure() {
    // Spare capacity: the builder fails before any slot is touched.
    let mut vec = Vector::with_cap(4);
    vec.push(1_u32);
    vec.push(2);
    let ptr = vec.as_ptr();

    let failure = vec
        .try_push_with(|| Err::<u32, _>("refused"))
        .expect_err("the builder always fails");
    assert!(matches!(failure, BuildFailure::Construction("refused")));
    assert_eq!((vec.len(), vec.cap()), (2, 4));
    assert_eq!(vec.as_ptr(), ptr);

    // Full vector: the replacement block is discarded and the capacity stays put.
    let mut vec = Vector::from_iter(0_u32..2);
    assert_eq!(vec.cap(), 2);
    let failure = vec
        .try_push_with(|| Err::<u32, _>("refused"))
        .expect_err("the builder always fails");
    assert!(matches!(failure, BuildFailure::Construction("refused")));
    assert_eq!((vec.len(), vec.cap()), (2, 2));
    assert_eq!(&*vec, &[0, 1]);

    // And a successful builder still lands.
    vec.try_push_with(|| Ok::<u32, &str>(9)).expect("growth and construction succeed");
    assert_eq!(&*vec, &[0, 1, 9]);
}

#[test]
fn test_pop() {
    let mut vec = Vector::from_iter(0..5);
    for i in (0..5).rev() {
        assert_eq!(vec.pop(), Some(i));
    }
    assert_eq!(vec.pop(), None, "Popping an empty Vector should report emptiness.");

    vec.push(7);
    // SAFETY: one element was just pushed.
    assert_eq!(unsafe { vec.pop_unchecked() }, 7);
    assert!(vec.is_empty());
}

#[test]
fn test_insert_remove_semantics() {
    let mut vec = Vector::from_iter(1_u32..=5);

    assert_eq!(vec.remove(2), 3, "Removal should return the evicted element.");
    assert_eq!(&*vec, &[1, 2, 4, 5]);
    assert_eq!(vec.len(), 4);

    vec.insert(2, 99);
    assert_eq!(&*vec, &[1, 2, 99, 4, 5]);
    assert_eq!(vec.len(), 5);

    vec.insert(5, 100);
    assert_eq!(&*vec, &[1, 2, 99, 4, 5, 100], "Inserting at the length should append.");

    assert_eq!(
        vec.try_insert(8, 0),
        Err(IndexOutOfBounds { index: 8, len: 6 }.into()),
        "Insertion past the append position should be rejected."
    );
    assert_eq!(
        vec.try_remove(6),
        Err(IndexOutOfBounds { index: 6, len: 6 }),
        "Removal at the length should be rejected."
    );
}

#[test]
fn test_remove_range() {
    let mut vec = Vector::from_iter(0_u32..10);

    vec.remove_range(2..5);
    assert_eq!(&*vec, &[0, 1, 5, 6, 7, 8, 9]);
    assert_eq!(vec.len(), 7);

    vec.remove_range(3..3);
    assert_eq!(vec.len(), 7, "An empty range should remove nothing.");

    assert!(vec.try_remove_range(5..3).is_err(), "A decreasing range should be rejected.");
    assert!(vec.try_remove_range(5..8).is_err(), "A range past the length should be rejected.");

    let counter = CountedDrop::new(0);
    let mut vec = Vector::new();
    for _ in 0..6 {
        vec.push(counter.clone());
    }
    vec.remove_range(1..4);
    assert_eq!(counter.take(), 3, "Exactly the removed elements should be destroyed.");
    assert_eq!(vec.len(), 3);
}

#[test]
fn test_reserve_exactness_and_pointer_stability() {
    let mut vec: Vector<u32> = Vector::new();

    vec.reserve(100);
    assert_eq!(vec.cap(), 100, "Explicit reservation should allocate exactly what was asked.");

    vec.reserve(50);
    assert_eq!(vec.cap(), 100, "A smaller reservation should change nothing.");

    let ptr = vec.as_ptr();
    for i in 0..100 {
        vec.push(i);
        assert_eq!(vec.as_ptr(), ptr, "Pushes within capacity must not move the storage.");
    }
    assert_eq!((vec.len(), vec.cap()), (100, 100));
}

#[test]
fn test_reserve_failure_unchanged() {
    let mut vec = Vector::<u32, _>::new_in(FailingAlloc::new(0));
    assert!(vec.try_reserve(10).is_err());
    assert_eq!((vec.len(), vec.cap()), (0, 0));
}

#[test]
fn test_resize_semantics() {
    let mut vec = Vector::from_iter(1_u32..=5);
    let cap = vec.cap();

    vec.resize(3, 9);
    assert_eq!(&*vec, &[1, 2, 3]);
    assert_eq!(vec.cap(), cap, "Shrinking the length should leave the capacity alone.");

    vec.resize(5, 9);
    assert_eq!(&*vec, &[1, 2, 3, 9, 9]);

    let mut next = 0;
    vec.resize_with(8, || {
        next += 1;
        next
    });
    assert_eq!(&*vec, &[1, 2, 3, 9, 9, 1, 2, 3]);

    let counter = CountedDrop::new(0);
    let mut vec = Vector::repeat_item(counter.clone(), 5);
    counter.take();
    vec.resize(2, counter.clone());
    assert_eq!(counter.take(), 4, "Three trailing elements plus the unused fill value.");
}

#[test]
fn test_resize_with_construction_failure_strong() {
    let mut vec = Vector::with_cap(2);
    vec.push(1_u32);
    vec.push(2);

    let mut calls = 0;
    let failure = vec
        .try_resize_with(6, || {
            calls += 1;
            if calls <= 2 { Ok(10 + calls) } else { Err("exhausted") }
        })
        .expect_err("the builder fails on its third call");

    assert!(matches!(failure, BuildFailure::Construction("exhausted")));
    assert_eq!((vec.len(), vec.cap()), (2, 2), "A failed resize must leave the Vector unchanged.");
    assert_eq!(&*vec, &[1, 2]);

    // The partially built batch is destroyed before the error propagates.
    let counter = CountedDrop::new(0);
    let mut vec: Vector<CountedDrop> = Vector::new();
    let mut calls = 0;
    let result = vec.try_resize_with(4, || {
        calls += 1;
        if calls <= 2 { Ok(counter.clone()) } else { Err("exhausted") }
    });
    assert!(result.is_err());
    assert_eq!(counter.take(), 2, "Both constructed elements should be destroyed again.");
    assert!(vec.is_empty());
    assert_eq!(vec.cap(), 0);
}

#[test]
fn test_at_bounds() {
    let mut vec = Vector::from_iter(1_u32..=3);

    assert_eq!(vec.at(2), Ok(&3));
    assert_eq!(
        vec.at(vec.len()),
        Err(IndexOutOfBounds { index: 3, len: 3 }),
        "The length itself is never a valid index."
    );

    *vec.at_mut(0).expect("index 0 is live") = 10;
    assert_eq!(&*vec, &[10, 2, 3]);

    assert_eq!(vec.replace(1, 20), 2);
    assert_eq!(&*vec, &[10, 20, 3]);
}

#[test]
fn test_truncate_and_clear_drop_counts() {
    let counter = CountedDrop::new(0);
    let mut vec = Vector::new();
    for _ in 0..10 {
        vec.push(counter.clone());
    }
    assert_eq!(counter.take(), 0, "Pushing moves elements in without dropping anything.");

    vec.truncate(4);
    assert_eq!(counter.take(), 6, "Truncation should destroy exactly the trailing elements.");
    assert_eq!(vec.len(), 4);

    vec.truncate(9);
    assert_eq!(counter.take(), 0, "Truncating to a larger length should do nothing.");

    vec.clear();
    assert_eq!(counter.take(), 4);
    assert!(vec.is_empty());

    drop(vec);
    assert_eq!(counter.take(), 0, "Nothing was left to drop.");
}

#[test]
fn test_drop_destroys_all_elements() {
    let counter = CountedDrop::new(0);
    let mut vec = Vector::new();
    for _ in 0..10 {
        vec.push(counter.clone());
    }

    drop(vec);
    assert_eq!(counter.take(), 10, "10 elements should have been dropped.");
}

#[test]
fn test_zst_support() {
    let alloc = CountingAlloc::new();
    let mut vec = Vector::new_in(alloc.clone());

    for _ in 0..100 {
        vec.push(ZeroSizedType);
    }
    assert_eq!(vec.len(), 100);
    assert_eq!(vec.pop(), Some(ZeroSizedType));
    assert_eq!(vec.len(), 99);
    assert_eq!(vec[42], ZeroSizedType, "Indexing should work without an allocation.");

    assert_eq!(alloc.allocations(), 0, "Zero-sized elements never touch the allocator.");

    assert_eq!(Vector::<ZeroSizedType>::max_cap(), usize::MAX);
    assert_eq!(Vector::<u64>::max_cap(), isize::MAX as usize / 8);
}

#[test]
fn test_iterators() {
    let vec = Vector::from_iter(0_usize..5);
    let collected: Vector<usize> = vec.iter().cloned().collect();
    assert_eq!(vec, collected, "Collected iter should be equal.");

    let mut vec = vec;
    for i in vec.iter_mut() {
        *i *= 2;
    }
    assert_eq!(*vec, [0_usize, 2, 4, 6, 8]);

    let mut iter = vec.into_iter();
    assert_eq!(iter.next(), Some(0));
    assert_eq!(iter.next_back(), Some(8));
    assert_eq!(iter.next_back(), Some(6));
    assert_eq!(iter.len(), 2);
    assert_eq!(iter.next(), Some(2));
    assert_eq!(iter.next_back(), Some(4));
    assert_eq!(iter.next(), None);
    assert_eq!(iter.next_back(), None);
}

#[test]
fn test_into_iter_drops_unconsumed() {
    let counter = CountedDrop::new(0);
    let mut vec = Vector::new();
    for _ in 0..10 {
        vec.push(counter.clone());
    }

    let mut iter = vec.into_iter();
    iter.next();
    iter.next_back();
    assert_eq!(counter.take(), 2, "Consumed elements are dropped by the caller.");

    drop(iter);
    assert_eq!(counter.take(), 8, "Dropping the iterator should drop the remaining elements.");
}

#[test]
fn test_clone_is_deep() {
    let vec = Vector::from_iter(0_u32..5);
    let mut other = vec.clone();

    assert_eq!(vec, other);
    assert_ne!(vec.as_ptr(), other.as_ptr(), "Clones must not share storage.");

    other.push(5);
    assert_eq!(vec.len(), 5, "Mutating a clone must not affect the original.");
}

#[test]
fn test_append() {
    let mut vec = Vector::from_iter(1_u32..=3);
    vec.append(Vector::from_iter(4..=5));
    assert_eq!(&*vec, &[1, 2, 3, 4, 5]);

    let counter = CountedDrop::new(0);
    let mut first = Vector::repeat_item(counter.clone(), 2);
    let second = Vector::repeat_item(counter.clone(), 3);
    counter.take();

    first.append(second);
    assert_eq!(counter.take(), 0, "Appending transfers elements without destroying any.");
    assert_eq!(first.len(), 5);

    drop(first);
    assert_eq!(counter.take(), 5, "Every transferred element is still owned exactly once.");
}

#[test]
fn test_equality_hash_and_ordering() {
    let vec = Vector::from_iter(0_usize..5);

    assert_eq!(
        vec,
        [0, 1, 2, 3, 4].into_iter().collect(),
        "Different construction methods should produce equal results."
    );
    assert_ne!(vec, Vector::from_iter(1_usize..6));

    let state = RandomState::new();
    assert_eq!(
        state.hash_one(&vec),
        state.hash_one(Vector::from_iter(0_usize..5)),
        "Equal Vectors should produce the same hash."
    );
    assert_eq!(
        state.hash_one(&vec),
        state.hash_one([0_usize, 1, 2, 3, 4]),
        "Borrow hash equality should be upheld."
    );

    assert!(Vector::from_iter(1_u32..=3) < Vector::from_iter([1, 2, 4]));
    assert!(
        Vector::from_iter(1_u32..=2) < Vector::from_iter(1..=3),
        "A strict prefix should order first."
    );
}

#[test]
fn test_display() {
    let vec = Vector::from_iter(1_u32..=3);
    assert_eq!(format!("{vec}"), "![1, 2, 3]");
}

#[test]
fn test_panicking_wrappers() {
    assert_panics!({
        let mut vec = Vector::from_iter(0_u32..3);
        vec.remove(3)
    });
    assert_panics!({
        let mut vec = Vector::from_iter(0_u32..3);
        vec.insert(4, 0)
    });
    assert_panics!({
        let mut vec = Vector::<u32, _>::new_in(FailingAlloc::new(0));
        vec.push(1)
    });
    assert_panics!({
        Vector::<u64>::with_cap(isize::MAX as usize)
    });
}
