//! The octree container and its build/query surface.

use glam::DVec3;
use rayon::prelude::*;
use web_time::Instant;

use super::{build, compact, node::NodeRef, UNREACHABLE};
use crate::error::OctreeError;
use crate::geom::Aabb;
use crate::morton;
use crate::stats::BuildStats;

/// One leaf record per item, stored in Morton-sorted order.
#[derive(Clone, Debug)]
pub(crate) struct Leaf<T> {
  pub(crate) item: T,
  pub(crate) position: DVec3,
  /// Delta to the next sibling under the same parent; 0 means none.
  pub(crate) right_sibling_delta: i64,
}

/// One internal slot per leaf index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Internal {
  /// Delta to the first child; never 0 on a reachable slot.
  pub(crate) first_child_delta: i64,
  /// Delta to the next sibling, 0 for none, or [`UNREACHABLE`].
  pub(crate) right_sibling_delta: i64,
}

/// Read-only spatial index over a snapshot of `(item, position)` pairs.
///
/// Built once, queried through [`NodeRef`] handles, and discarded; there is
/// no in-place update. Rebuild from fresh items instead.
#[derive(Clone, Debug)]
pub struct Octree<T> {
  pub(crate) leaves: Vec<Leaf<T>>,
  pub(crate) internals: Vec<Internal>,
  pub(crate) bound: Aabb,
}

impl<T: Send> Octree<T> {
  /// Build a tree from `(item, position)` pairs and a bound containing the
  /// positions.
  ///
  /// Items are sorted by Morton key (stably, so equal-keyed items keep their
  /// insertion order) and the internal-slot table is filled in one parallel
  /// pass. Positions outside the bound quantize onto its faces.
  pub fn build<I>(items: I, bound: Aabb) -> Self
  where
    I: IntoIterator<Item = (T, DVec3)>,
  {
    Self::build_timed(items, bound).0
  }

  /// Same as [`Octree::build`], also reporting counters and phase timings.
  pub fn build_timed<I>(items: I, bound: Aabb) -> (Self, BuildStats)
  where
    I: IntoIterator<Item = (T, DVec3)>,
  {
    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!("octree::build").entered();

    let sort_start = Instant::now();
    let mut keyed: Vec<(u64, T, DVec3)> = items
      .into_iter()
      .map(|(item, position)| (morton::encode(position, &bound), item, position))
      .collect();
    keyed.par_sort_by_key(|entry| entry.0);
    let codes: Vec<u64> = keyed.iter().map(|entry| entry.0).collect();
    let sort_us = sort_start.elapsed().as_micros() as u64;

    let fill_start = Instant::now();
    let (internals, leaf_siblings) = build::fill_internals(&codes);
    let fill_us = fill_start.elapsed().as_micros() as u64;

    let leaves: Vec<Leaf<T>> = keyed
      .into_iter()
      .zip(leaf_siblings)
      .map(|((_, item, position), right_sibling_delta)| Leaf {
        item,
        position,
        right_sibling_delta,
      })
      .collect();

    let stats = BuildStats {
      leaf_count: leaves.len(),
      internal_slots: internals.len(),
      reachable_internals: internals
        .iter()
        .filter(|slot| slot.right_sibling_delta != UNREACHABLE)
        .count(),
      sort_us,
      fill_us,
    };
    (
      Self {
        leaves,
        internals,
        bound,
      },
      stats,
    )
  }
}

impl<T> Octree<T> {
  /// Number of items in the tree.
  #[inline]
  pub fn item_count(&self) -> usize {
    self.leaves.len()
  }

  /// The construction bound the positions were quantized against.
  #[inline]
  pub fn bound(&self) -> Aabb {
    self.bound
  }

  /// Handle to the root node.
  ///
  /// The root is the single leaf for a one-item tree and internal slot 0
  /// otherwise. Fails with [`OctreeError::EmptyTree`] when there are no
  /// items.
  pub fn root(&self) -> Result<NodeRef<'_, T>, OctreeError> {
    match self.leaves.len() {
      0 => Err(OctreeError::EmptyTree),
      1 => Ok(NodeRef::new(self, -1)),
      _ => Ok(NodeRef::new(self, 0)),
    }
  }

  /// Delta stored in the sibling field of the node addressed by `idx`.
  #[inline]
  pub(crate) fn sibling_delta(&self, idx: i64) -> i64 {
    if idx < 0 {
      self.leaf(idx).right_sibling_delta
    } else {
      self.internal(idx).right_sibling_delta
    }
  }

  #[inline]
  pub(crate) fn internal(&self, idx: i64) -> &Internal {
    &self.internals[idx as usize]
  }

  #[inline]
  pub(crate) fn leaf(&self, idx: i64) -> &Leaf<T> {
    debug_assert!(idx < 0, "leaf addresses are negative");
    &self.leaves[(self.leaves.len() as i64 + idx) as usize]
  }
}

impl<T: Clone + Send + Sync> Octree<T> {
  /// Equivalent tree with only reachable internal slots.
  ///
  /// Surviving slots re-pack contiguously and every delta in both tables is
  /// rewritten to the new positions. Returns an unchanged clone when there
  /// is nothing to compact; compacting an already-compacted tree is a no-op.
  pub fn compress(&self) -> Self {
    compact::compress(self)
  }
}

impl<T: Send> FromIterator<(T, DVec3)> for Octree<T> {
  /// Build with the bound derived from the positions themselves.
  ///
  /// Panics if any position has a NaN coordinate; use [`Octree::build`] with
  /// an explicit bound to control quantization instead.
  fn from_iter<I: IntoIterator<Item = (T, DVec3)>>(iter: I) -> Self {
    let pairs: Vec<(T, DVec3)> = iter.into_iter().collect();
    let bound = Aabb::bound_points(pairs.iter().map(|(_, p)| *p))
      .expect("positions must not contain NaN");
    Self::build(pairs, bound)
  }
}
