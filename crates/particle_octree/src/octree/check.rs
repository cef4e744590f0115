//! Structural invariant validation.
//!
//! Walks a built tree and panics on the first violation. Intended for tests
//! and debugging of downstream consumers; a failure always means a builder
//! bug, never bad input.
//!
//! Checked per internal node:
//! - arity is in `[2, 8]`, except that an internal over a single duplicated
//!   position legitimately holds one leaf child per item
//! - child leaf ranges tile the node's range contiguously, in Morton order
//! - child bounding boxes are pairwise disjoint up to zero volume, and their
//!   union is exactly the node's box

use glam::DVec3;

use super::node::NodeRef;
use super::tree::Octree;
use crate::geom::Aabb;

/// Validate every reachable node of `tree`; panics on violation.
pub fn validate<T>(tree: &Octree<T>) {
  let root = match tree.root() {
    Ok(root) => root,
    Err(_) => return,
  };
  let (lo, hi) = validate_node(root);
  assert_eq!(lo, 0, "root leaf range must start at the first leaf");
  assert_eq!(
    hi,
    tree.item_count(),
    "root leaf range must cover every leaf"
  );
}

/// Recursively validate a subtree; returns its leaf index range.
fn validate_node<T>(node: NodeRef<'_, T>) -> (usize, usize) {
  let (node_lo, node_hi) = node.leaf_range();
  assert_eq!(
    node.items().len(),
    node_hi - node_lo,
    "node items disagree with its leaf range"
  );

  if node.is_leaf() {
    assert_eq!(node.arity(), 0, "leaves have no children");
    assert_eq!(node_hi - node_lo, 1, "a leaf holds exactly one item");
    return (node_lo, node_hi);
  }

  let children: Vec<NodeRef<'_, T>> = node.children().collect();
  let arity = children.len();
  assert!(arity >= 2, "internal node with fewer than 2 children");
  if arity > 8 {
    // Only a degenerate equal-key range may exceed the octant count, and
    // then every child is a co-located leaf.
    assert!(
      children.iter().all(|c| c.is_leaf()),
      "overfull internal node with non-leaf children"
    );
    let positions: Vec<DVec3> = node.items().map(|(_, p)| p).collect();
    let first = positions[0];
    assert!(
      positions.iter().all(|p| p.to_array() == first.to_array()),
      "overfull internal node over distinct positions"
    );
  }

  // Children tile the node's leaf range contiguously, left to right.
  let ranges: Vec<(usize, usize)> = children.iter().map(|c| validate_node(*c)).collect();
  assert_eq!(ranges[0].0, node_lo, "first child must start the node range");
  assert_eq!(
    ranges[arity - 1].1,
    node_hi,
    "last child must end the node range"
  );
  for pair in ranges.windows(2) {
    assert_eq!(
      pair[0].1, pair[1].0,
      "gap or overlap between sibling leaf ranges"
    );
  }

  // Child boxes: pairwise disjoint interiors, union equal to the node box.
  let node_box = position_bound(node.items().map(|(_, p)| p));
  let boxes: Vec<Aabb> = children
    .iter()
    .map(|c| position_bound(c.items().map(|(_, p)| p)))
    .collect();
  let tolerance = 1e-12 * volume(&node_box).max(1.0);
  for (i, a) in boxes.iter().enumerate() {
    for b in boxes.iter().skip(i + 1) {
      let shared = a.intersect(b);
      assert!(
        shared.is_empty() || volume(&shared) <= tolerance,
        "sibling boxes overlap: {a} vs {b}"
      );
    }
  }
  assert_eq!(
    Aabb::bound_boxes(boxes),
    node_box,
    "child boxes do not cover the node box"
  );

  (node_lo, node_hi)
}

/// Bound of a position set; NaN coordinates are skipped rather than
/// poisoning the fold.
fn position_bound<I: IntoIterator<Item = DVec3>>(positions: I) -> Aabb {
  let mut min = DVec3::INFINITY;
  let mut max = DVec3::NEG_INFINITY;
  let mut any = false;
  for p in positions {
    any = true;
    min = min.min(p);
    max = max.max(p);
  }
  if !any {
    return Aabb::EMPTY;
  }
  Aabb::from_corners(min, max)
}

fn volume(b: &Aabb) -> f64 {
  if b.is_empty() {
    return 0.0;
  }
  let s = b.size();
  s.x * s.y * s.z
}
