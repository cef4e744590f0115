//! particle_octree - parallel, pointer-free octree spatial index
//!
//! This crate builds a flat octree over a snapshot of `(item, position)`
//! pairs by sorting items along a Morton (Z-order) curve and filling an
//! internal-node table in one fully data-parallel pass. Nodes reference each
//! other only through signed index deltas, so the tree is cache-friendly,
//! relocatable, and free of per-node allocation.
//!
//! # Features
//!
//! - **Parallel construction**: one independent task per leaf index on the
//!   rayon pool; the heavy phases (sort, slot filling, compaction) are all
//!   bulk-synchronous
//! - **Compaction**: a parallel prefix count re-packs the surviving internal
//!   slots and rewrites every delta
//! - **Restartable navigation**: child and item iteration read the delta
//!   chains directly and keep no state on the tree
//! - **Invariant checking**: `octree::check::validate` walks a tree and
//!   panics on any structural violation
//!
//! # Example
//!
//! ```
//! use glam::DVec3;
//! use particle_octree::{Aabb, Octree};
//!
//! let bound = Aabb::new(DVec3::ZERO, DVec3::splat(1.0));
//! let items = vec![
//!   (0, DVec3::new(0.25, 0.25, 0.25)),
//!   (1, DVec3::new(0.75, 0.25, 0.25)),
//!   (2, DVec3::new(0.25, 0.75, 0.75)),
//! ];
//!
//! let tree = Octree::build(items, bound);
//! assert_eq!(tree.item_count(), 3);
//!
//! let root = tree.root().unwrap();
//! assert!(!root.is_leaf());
//! assert_eq!(root.items().count(), 3);
//!
//! // Drop the slots construction left behind.
//! let tree = tree.compress();
//! assert_eq!(tree.item_count(), 3);
//! ```
//!
//! The tree is immutable once built. Rebuild it from fresh positions each
//! step; consumers must not hold [`NodeRef`] handles across a rebuild.

pub mod error;
pub mod geom;
pub mod morton;
pub mod octree;
pub mod scan;
pub mod stats;

// Re-export commonly used items
pub use error::OctreeError;
pub use geom::Aabb;
pub use octree::{Children, NodeRef, Octree};
pub use stats::BuildStats;
