//! Compaction: drop unreachable internal slots and rewrite all deltas.
//!
//! Construction leaves one internal slot per leaf, most of them marked
//! unreachable. Compaction computes each surviving slot's new position with
//! a parallel prefix count, then rewrites both tables in parallel. Because
//! every link is stored as `target - self`, only the two endpoints of a link
//! need translating; no traversal happens.

use rayon::prelude::*;

use super::tree::{Internal, Leaf, Octree};
use super::UNREACHABLE;
use crate::scan;

/// Equivalent tree containing only reachable internal slots.
#[cfg_attr(
  feature = "tracing",
  tracing::instrument(skip_all, name = "octree::compress")
)]
pub(crate) fn compress<T: Clone + Send + Sync>(tree: &Octree<T>) -> Octree<T> {
  let leaf_count = tree.leaves.len();
  // Nothing to compact for trivial trees; a slot table shorter than the
  // leaf table means compaction already ran.
  if leaf_count < 2 || leaf_count > tree.internals.len() {
    return tree.clone();
  }

  let new_idx = scan::prefix_count(&tree.internals, |slot| {
    slot.right_sibling_delta != UNREACHABLE
  });
  let translate = |target: i64| -> i64 {
    if target < 0 {
      target
    } else {
      new_idx[target as usize]
    }
  };

  let internals: Vec<Internal> = tree
    .internals
    .par_iter()
    .enumerate()
    .filter(|(_, slot)| slot.right_sibling_delta != UNREACHABLE)
    .map(|(i, slot)| {
      let old = i as i64;
      let new = new_idx[i];
      let first_child_delta = translate(old + slot.first_child_delta) - new;
      let right_sibling_delta = if slot.right_sibling_delta == 0 {
        0
      } else {
        translate(old + slot.right_sibling_delta) - new
      };
      Internal {
        first_child_delta,
        right_sibling_delta,
      }
    })
    .collect();

  // Leaf addresses are unchanged (the leaf table keeps its length), but a
  // leaf's sibling may be an internal slot that moved.
  let len = leaf_count as i64;
  let leaves: Vec<Leaf<T>> = tree
    .leaves
    .par_iter()
    .enumerate()
    .map(|(k, leaf)| {
      let addr = k as i64 - len;
      let right_sibling_delta = if leaf.right_sibling_delta == 0 {
        0
      } else {
        translate(addr + leaf.right_sibling_delta) - addr
      };
      Leaf {
        item: leaf.item.clone(),
        position: leaf.position,
        right_sibling_delta,
      }
    })
    .collect();

  Octree {
    leaves,
    internals,
    bound: tree.bound,
  }
}

#[cfg(test)]
#[path = "compact_test.rs"]
mod compact_test;
