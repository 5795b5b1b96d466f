//! The failures a collection can report. Leaf types are plain structs; operations that can fail
//! in more than one way return a union enum, keeping the dispatch static.

use std::error::Error;
use std::fmt::{self, Display, Formatter};

use derive_more::{Display, Error, From, IsVariant, TryInto};

/// Raw memory could not be obtained from the allocator. Always fatal to the requested operation;
/// the core never retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationFailure {
    /// The size in bytes of the allocation that failed.
    pub bytes: usize,
}

impl Display for AllocationFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to allocate {} bytes!", self.bytes)
    }
}

impl Error for AllocationFailure {}

/// The requested capacity exceeds the maximum representable element count for the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityOverflow;

impl Display for CapacityOverflow {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Capacity overflow!")
    }
}

impl Error for CapacityOverflow {}

/// An index beyond the live elements of a collection, raised only by checked accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexOutOfBounds {
    /// The rejected index.
    pub index: usize,
    /// The number of live elements at the time of the access.
    pub len: usize,
}

impl Display for IndexOutOfBounds {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Index {} out of bounds for collection with {} elements!", self.index, self.len)
    }
}

impl Error for IndexOutOfBounds {}

/// Why a collection failed to obtain a larger (or exact) allocation.
#[derive(Debug, Display, Error, From, TryInto, IsVariant, Clone, Copy, PartialEq, Eq)]
pub enum GrowthFailure {
    /// The allocator refused the request.
    AllocationFailure(AllocationFailure),
    /// The request was not representable in the first place.
    CapacityOverflow(CapacityOverflow),
}

/// The failures of operations which validate an index and may also need to grow.
#[derive(Debug, Display, Error, From, TryInto, IsVariant, Clone, Copy, PartialEq, Eq)]
pub enum IndexOrGrowthFailure {
    /// The provided position was out of bounds.
    IndexOutOfBounds(IndexOutOfBounds),
    /// Growing the underlying storage failed.
    GrowthFailure(GrowthFailure),
}

/// The failures of operations which construct new elements from a fallible source while possibly
/// growing. `E` is the constructor's own error type, propagated unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildFailure<E> {
    /// Growing the underlying storage failed before any element was built.
    Growth(GrowthFailure),
    /// An element constructor failed. Elements built earlier in the same call have already been
    /// destroyed when this is returned.
    Construction(E),
}

impl<E> From<GrowthFailure> for BuildFailure<E> {
    fn from(failure: GrowthFailure) -> Self {
        BuildFailure::Growth(failure)
    }
}

impl<E: Display> Display for BuildFailure<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            BuildFailure::Growth(failure) => Display::fmt(failure, f),
            BuildFailure::Construction(error) => Display::fmt(error, f),
        }
    }
}

impl<E: Error + 'static> Error for BuildFailure<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BuildFailure::Growth(failure) => Some(failure),
            BuildFailure::Construction(error) => Some(error),
        }
    }
}
