//! This crate is a from-scratch reimplementation of the dynamic array engine found at the core of
//! a standard container library: a growable contiguous collection with manual memory management,
//! an explicit growth policy and documented failure guarantees.
//!
//! # Purpose
//! Standard library vectors hide three separate concerns behind one type: where raw memory comes
//! from, when a reallocation happens and how elements survive it. This crate keeps those concerns
//! apart so that each can be understood (and tested) on its own:
//! - [`RawAllocator`](collections::alloc::RawAllocator) is the single choke-point for acquiring
//!   and releasing raw memory.
//! - [`Block`](collections::contiguous::Block) owns exactly one contiguous allocation and nothing
//!   else. It never runs element destructors.
//! - A growth policy decides replacement capacities as a pure function, so amortized behavior can
//!   be checked without touching an allocator.
//! - [`Vector`](collections::contiguous::Vector) composes the three into the user-facing
//!   collection.
//!
//! # Error Handling
//! Every mutating operation that can fail exists in two forms: a checked `try_` method returning a
//! strongly typed [`Result`], and a convenience method that panics with the error's message. The
//! checked forms claim precise guarantees: a failed `try_push` or `try_reserve` leaves the Vector
//! observably unchanged, down to its data pointer. Errors are plain structs and enums using static
//! dispatch; nothing is boxed, logged or retried internally.
//!
//! Operations whose preconditions are undefined behavior in the modeled library (indexing out of
//! range, popping an empty vector) are checked or [`Option`]-returning here, with separately named
//! `unsafe` fast paths (`push_unchecked`, `pop_unchecked`) for callers that have already
//! established the precondition.
//!
//! # Dependencies
//! This crate doesn't use [`Vec`] or any other growable std collection; the point is to own the
//! allocation logic. It does depend on some derive macros because they're helpful and remove the
//! need for some very repetitive programming.

#![warn(clippy::missing_safety_doc)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::missing_const_for_fn)]
#![warn(clippy::missing_panics_doc)]
#![warn(clippy::unwrap_used)]
#![allow(clippy::module_inception)]

pub mod collections;

pub(crate) mod util;
