//! Flat, pointer-free octree built in parallel from Morton codes.
//!
//! The tree is encoded as two parallel arrays: one leaf record per item in
//! Morton-sorted order, and one internal slot per leaf index. Nodes address
//! each other exclusively through signed deltas (`target - self`), with
//! non-negative addresses naming internal slots and negative addresses
//! naming leaves from the end (`-1` is the last leaf). Construction runs one
//! independent task per leaf index; compaction relocates the surviving
//! internal slots with a parallel prefix count and rewrites every delta.
//!
//! # Module Structure
//!
//! - [`tree`]: `Octree` - the container and its build/query entry points
//! - [`build`]: the per-index parallel construction pass
//! - [`node`]: `NodeRef` - navigation handle with child and item iteration
//! - [`compact`]: unreachable-slot removal with delta rewriting
//! - [`check`]: structural invariant validation used by tests

pub mod build;
pub mod check;
pub mod compact;
pub mod node;
pub mod tree;

pub use node::{Children, NodeRef};
pub use tree::Octree;

/// Sibling-delta sentinel marking an internal slot as unreachable.
///
/// Only ever stored in `right_sibling_delta` of internal slots; reachable
/// internals and leaves never carry it. Compaction keeps exactly the slots
/// without it.
pub(crate) const UNREACHABLE: i64 = -1;
