//! The container types of this crate and the memory plumbing beneath them.
//!
//! # Purpose
//! Only the contiguous family is implemented: the point of this crate is the dynamic array's
//! growth/allocation engine, not API breadth. The [`alloc`] module sits underneath it as the
//! boundary to raw memory.
//!
//! # Method
//! Applicable types here implement [`Deref<Target = [T]>`](std::ops::Deref) (and DerefMut), which
//! provides the whole read-only slice API without repetitive forwarding methods.

pub mod alloc;
pub mod contiguous;
pub mod error;
