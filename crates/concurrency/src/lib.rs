//! Shared-state primitives for tasknet
//!
//! This crate provides the two pieces of state touched from more than one
//! thread:
//! - `LatestValue`: single-writer, multi-reader publication cell
//! - `BoundedRandomReplacementStore`: fixed-capacity slots where every
//!   insertion overwrites a uniformly random slot
//!
//! Both are coarse-grained: one lock per structure. Writes happen at most a
//! few times per second, so contention is not a concern.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod latest;
pub mod store;

pub use latest::LatestValue;
pub use store::{BoundedRandomReplacementStore, Insertion};
