//! The data-parallel internal-slot construction pass.
//!
//! One independent task runs per leaf index. Internal slot `i` is the
//! candidate root of the subtree whose leaf range has a boundary at leaf
//! `i`; the two boundary slots of every subtree both receive the node's
//! content, and the redundant copy is marked unreachable so compaction can
//! drop it. All addressing is relative (`target - self`), so no task needs
//! to know where any node will finally live.
//!
//! Writes from different tasks land on disjoint fields except where twin
//! tasks store bit-identical values (both boundary copies of a node emit the
//! same absolute child addresses, so their shared sibling writes agree).
//! Everything goes through relaxed atomics; the fork-join barrier at the end
//! of the pass publishes the result.

use std::sync::atomic::{AtomicI64, Ordering};

use rayon::prelude::*;
use smallvec::SmallVec;

use super::tree::Internal;
use super::UNREACHABLE;
use crate::morton::{slotted_sigma, split, MAX_LEVEL};

/// Scratch buffers for the parallel pass, one entry per leaf index.
struct Scratch<'a> {
  codes: &'a [u64],
  first_child: &'a [AtomicI64],
  internal_sibling: &'a [AtomicI64],
  leaf_sibling: &'a [AtomicI64],
}

impl Scratch<'_> {
  /// Store a sibling delta at a node address (internal slot or leaf).
  fn store_sibling(&self, addr: i64, delta: i64) {
    let len = self.codes.len() as i64;
    if addr < 0 {
      self.leaf_sibling[(len + addr) as usize].store(delta, Ordering::Relaxed);
    } else {
      self.internal_sibling[addr as usize].store(delta, Ordering::Relaxed);
    }
  }
}

/// Fill the internal-slot table for `codes` (sorted Morton keys).
///
/// Returns the internal slots and the per-leaf sibling deltas.
#[cfg_attr(
  feature = "tracing",
  tracing::instrument(skip_all, name = "octree::fill_internals")
)]
pub(crate) fn fill_internals(codes: &[u64]) -> (Vec<Internal>, Vec<i64>) {
  let len = codes.len();
  let first_child: Vec<AtomicI64> = (0..len).map(|_| AtomicI64::new(0)).collect();
  let internal_sibling: Vec<AtomicI64> = (0..len).map(|_| AtomicI64::new(0)).collect();
  let leaf_sibling: Vec<AtomicI64> = (0..len).map(|_| AtomicI64::new(0)).collect();

  let scratch = Scratch {
    codes,
    first_child: &first_child,
    internal_sibling: &internal_sibling,
    leaf_sibling: &leaf_sibling,
  };
  (0..len).into_par_iter().for_each(|i| fill_slot(&scratch, i));

  // The last slot can only ever hold the redundant right-boundary copy of
  // the root; the root proper lives in slot 0.
  if len > 0 {
    internal_sibling[len - 1].store(UNREACHABLE, Ordering::Relaxed);
  }

  let internals = first_child
    .into_iter()
    .zip(internal_sibling)
    .map(|(fc, rs)| Internal {
      first_child_delta: fc.into_inner(),
      right_sibling_delta: rs.into_inner(),
    })
    .collect();
  let leaf_siblings = leaf_sibling.into_iter().map(AtomicI64::into_inner).collect();
  (internals, leaf_siblings)
}

/// Construct the subtree whose boundary sits at leaf index `i`.
fn fill_slot(scratch: &Scratch<'_>, i: usize) {
  let codes = scratch.codes;
  let len = codes.len() as i64;
  let i = i as i64;

  // Side selection: does leaf i share more levels with its right neighbor
  // (left boundary of the subtree) or its left neighbor (right boundary)?
  let left = slotted_sigma(codes, i - 1, i);
  let right = slotted_sigma(codes, i, i + 1);
  let side = (right - left).signum() as i64;
  if side == 0 {
    // Interior boundary: this slot never holds a node. Mark it so the
    // compaction indicator sees exactly the live slots.
    scratch.internal_sibling[i as usize].store(UNREACHABLE, Ordering::Relaxed);
    return;
  }

  // Depth shared with the neighbor outside the subtree; every leaf inside
  // shares strictly more.
  let outside = slotted_sigma(codes, i, i - side);

  // Exponential probe then binary search for the opposite boundary.
  let mut probe = 2i64;
  while slotted_sigma(codes, i, i + probe * side) > outside {
    probe *= 2;
  }
  let mut span = 0i64;
  let mut step = probe / 2;
  while step >= 1 {
    if slotted_sigma(codes, i, i + (span + step) * side) > outside {
      span += step;
    }
    step /= 2;
  }

  let (lo, hi) = if side > 0 {
    (i, i + span + 1)
  } else {
    (i - span, i + 1)
  };
  let self_idx = i;

  // Depth shared by the whole range. The range can share more levels than
  // it does with its outside neighbor; the split must happen at the level
  // where the leaves actually diverge, or the node would have one child.
  let total = slotted_sigma(codes, lo, hi - 1);

  if total == MAX_LEVEL {
    // All keys in the range are identical: a single internal whose direct
    // children are all the leaves. Both boundary slots receive the node;
    // the leaf chain has one writer (the left boundary task, unless a
    // taller subtree also starts at `lo` and claimed that task - then the
    // outside depths differ and the right boundary task chains instead).
    scratch.first_child[self_idx as usize]
      .store((lo - len) - self_idx, Ordering::Relaxed);
    let chains = side > 0 || slotted_sigma(codes, lo - 1, lo) < outside;
    if chains {
      for k in lo..hi - 1 {
        scratch.leaf_sibling[k as usize].store(1, Ordering::Relaxed);
      }
    }
    return;
  }

  // Bit position immediately after the shared prefix; the three bits below
  // it are the x, y, z digits of the first diverging level.
  let p = (64 - (1 + 3 * total)) as u32;
  let (lo, hi) = (lo as usize, hi as usize);
  let mut starts = [0usize; 9];
  starts[0] = lo;
  starts[8] = hi;
  starts[4] = split(codes, p - 1, lo, hi);
  starts[2] = split(codes, p - 2, lo, starts[4]);
  starts[6] = split(codes, p - 2, starts[4], hi);
  starts[1] = split(codes, p - 3, lo, starts[2]);
  starts[3] = split(codes, p - 3, starts[2], starts[4]);
  starts[5] = split(codes, p - 3, starts[4], starts[6]);
  starts[7] = split(codes, p - 3, starts[6], hi);

  let ranges: SmallVec<[(i64, i64); 8]> = (0..8)
    .filter(|&k| starts[k] < starts[k + 1])
    .map(|k| (starts[k] as i64, starts[k + 1] as i64))
    .collect();
  debug_assert!(ranges.len() >= 2, "octant split produced fewer than 2 children");

  let last = ranges.len() - 1;
  let mut prev = 0i64;
  for (ci, &(a, b)) in ranges.iter().enumerate() {
    // A single-leaf child is addressed as a leaf. A wider child is an
    // internal, addressed by the end of its range when it is the first
    // child (its start slot belongs to an enclosing subtree) and by its
    // start otherwise.
    let addr = if b - a == 1 {
      a - len
    } else if ci == 0 {
      b - 1
    } else {
      a
    };

    if ci == 0 {
      scratch.first_child[self_idx as usize].store(addr - self_idx, Ordering::Relaxed);
    } else {
      scratch.store_sibling(prev, addr - prev);
      if ci != last && b - a > 1 {
        // Middle children own both their boundary slots; kill the twin
        // copy at the far end so only the linked copy survives.
        scratch.internal_sibling[(b - 1) as usize].store(UNREACHABLE, Ordering::Relaxed);
      }
    }
    prev = addr;
  }
}

#[cfg(test)]
#[path = "build_test.rs"]
mod build_test;
