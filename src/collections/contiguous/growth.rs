//! The capacity growth policy for contiguous storage.
//!
//! Kept as pure arithmetic so the amortized-growth behavior can be tested without an allocator
//! in sight. The engine asks this module how big a replacement allocation should be; whether and
//! how to build that allocation is someone else's job.

use std::cmp;

use crate::collections::error::CapacityOverflow;

/// The capacity handed out when growing from nothing.
pub(crate) const MIN_CAP: usize = 2;

/// Capacities grow geometrically by this factor, which is what makes appending amortized O(1).
pub(crate) const GROWTH_FACTOR: usize = 2;

/// The largest number of elements of `T` a single allocation can hold. Allocations are limited to
/// `isize::MAX` bytes; zero-sized types never allocate and are limited only by the counter.
pub(crate) const fn max_cap<T>() -> usize {
    if size_of::<T>() == 0 {
        usize::MAX
    } else {
        isize::MAX as usize / size_of::<T>()
    }
}

/// Decides the capacity of a replacement allocation: at least `minimum`, at least
/// `current * GROWTH_FACTOR` (with a floor of [`MIN_CAP`]), clamped to `max`. The result never
/// shrinks below `current`, and is non-decreasing in both `current` and `minimum`.
///
/// # Errors
/// Fails with [`CapacityOverflow`] if `minimum` itself exceeds `max`.
pub(crate) fn next_cap(current: usize, minimum: usize, max: usize) -> Result<usize, CapacityOverflow> {
    if minimum > max {
        return Err(CapacityOverflow);
    }

    let grown = cmp::max(current.saturating_mul(GROWTH_FACTOR), MIN_CAP);

    Ok(cmp::min(cmp::max(grown, minimum), max))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: usize = isize::MAX as usize;

    #[test]
    fn test_geometric_progression() {
        let mut cap = 0;
        let mut observed = [0_usize; 8];
        for entry in observed.iter_mut() {
            cap = next_cap(cap, cap + 1, MAX).expect("in-range growth should succeed");
            *entry = cap;
        }
        assert_eq!(
            observed,
            [2, 4, 8, 16, 32, 64, 128, 256],
            "Repeated growth should double after reaching the minimum capacity."
        );
    }

    #[test]
    fn test_minimum_dominates() {
        assert_eq!(
            next_cap(4, 100, MAX),
            Ok(100),
            "A minimum beyond the doubled capacity should be granted exactly."
        );
        assert_eq!(
            next_cap(64, 65, MAX),
            Ok(128),
            "A minimum within the doubled capacity should not shrink the result."
        );
    }

    #[test]
    fn test_never_shrinks() {
        for current in [0_usize, 1, 2, 7, 1000] {
            let next = next_cap(current, current + 1, MAX).expect("in-range growth should succeed");
            assert!(
                next > current,
                "Growth from {current} must make room for at least one more element."
            );
        }
    }

    #[test]
    fn test_clamped_to_max() {
        assert_eq!(
            next_cap(MAX / 2 + 1, MAX / 2 + 2, MAX),
            Ok(MAX),
            "Doubling past the maximum should clamp to it while still covering the minimum."
        );
    }

    #[test]
    fn test_overflow() {
        assert_eq!(
            next_cap(0, MAX + 1, MAX),
            Err(CapacityOverflow),
            "A minimum beyond the maximum is not representable."
        );
        assert_eq!(
            next_cap(usize::MAX, usize::MAX, usize::MAX),
            Ok(usize::MAX),
            "Saturating arithmetic should keep the zero-sized-type range usable."
        );
    }

    #[test]
    fn test_max_cap() {
        assert_eq!(max_cap::<()>(), usize::MAX);
        assert_eq!(max_cap::<u8>(), isize::MAX as usize);
        assert_eq!(max_cap::<u64>(), isize::MAX as usize / 8);
    }
}
