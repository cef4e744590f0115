use glam::DVec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geom::Aabb;
use crate::octree::check::validate;
use crate::octree::node::NodeRef;
use crate::octree::tree::Octree;
use crate::octree::UNREACHABLE;

fn unit_bound() -> Aabb {
  Aabb::new(DVec3::ZERO, DVec3::splat(1.0))
}

fn random_cloud(n: usize, seed: u64) -> Vec<(usize, DVec3)> {
  let mut rng = StdRng::seed_from_u64(seed);
  (0..n)
    .map(|k| {
      (
        k,
        DVec3::new(rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0)),
      )
    })
    .collect()
}

/// Recursively compare two trees: same leaf ordering, same child structure,
/// same items.
fn assert_equivalent(a: &Octree<usize>, b: &Octree<usize>) {
  assert_eq!(a.item_count(), b.item_count());
  if a.item_count() == 0 {
    return;
  }
  assert_nodes_equal(a.root().unwrap(), b.root().unwrap());
}

fn assert_nodes_equal(a: NodeRef<'_, usize>, b: NodeRef<'_, usize>) {
  assert_eq!(a.is_leaf(), b.is_leaf(), "leaf flag mismatch");
  let items_a: Vec<(usize, DVec3)> = a.items().map(|(id, p)| (*id, p)).collect();
  let items_b: Vec<(usize, DVec3)> = b.items().map(|(id, p)| (*id, p)).collect();
  assert_eq!(items_a, items_b, "item range mismatch");

  let children_a: Vec<_> = a.children().collect();
  let children_b: Vec<_> = b.children().collect();
  assert_eq!(children_a.len(), children_b.len(), "arity mismatch");
  for (ca, cb) in children_a.into_iter().zip(children_b) {
    assert_nodes_equal(ca, cb);
  }
}

/// Compaction preserves structure and leaves no sentinel slots behind.
#[test]
fn test_compress_equivalence() {
  for (n, seed) in [(3usize, 7u64), (50, 8), (500, 9)] {
    let tree = Octree::build(random_cloud(n, seed), unit_bound());
    let compressed = tree.compress();

    validate(&compressed);
    assert_equivalent(&tree, &compressed);
    assert!(
      compressed
        .internals
        .iter()
        .all(|slot| slot.right_sibling_delta != UNREACHABLE),
      "compressed tree must not contain unreachable slots"
    );
  }
}

/// Compaction strictly shrinks the slot table for non-trivial clouds.
#[test]
fn test_compress_shrinks() {
  let tree = Octree::build(random_cloud(200, 11), unit_bound());
  let compressed = tree.compress();
  assert_eq!(tree.internals.len(), 200);
  assert!(compressed.internals.len() < tree.internals.len());
  // At most one internal node per leaf boundary can survive.
  assert!(compressed.internals.len() < tree.item_count());
}

/// Compressing twice changes nothing.
#[test]
fn test_compress_idempotent() {
  let tree = Octree::build(random_cloud(300, 12), unit_bound());
  let once = tree.compress();
  let twice = once.compress();

  assert_eq!(once.internals.len(), twice.internals.len());
  assert_equivalent(&once, &twice);
  validate(&twice);
}

/// Trees too small to compact come back unchanged.
#[test]
fn test_compress_trivial_trees() {
  let empty = Octree::<usize>::build([], unit_bound());
  assert_eq!(empty.compress().item_count(), 0);

  let single = Octree::build([(0usize, DVec3::splat(0.5))], unit_bound());
  let compressed = single.compress();
  assert_eq!(compressed.item_count(), 1);
  assert!(compressed.root().unwrap().is_leaf());
}

/// The root stays at slot 0 across compaction.
#[test]
fn test_compress_keeps_root_first() {
  let tree = Octree::build(random_cloud(64, 13), unit_bound());
  let compressed = tree.compress();
  let root = compressed.root().unwrap();
  assert!(!root.is_leaf());
  let (lo, hi) = root.leaf_range();
  assert_eq!((lo, hi), (0, 64));
}

/// A degenerate single-run tree compacts to exactly one internal slot.
#[test]
fn test_compress_degenerate_run() {
  let items: Vec<(usize, DVec3)> = (0..16).map(|k| (k, DVec3::splat(0.25))).collect();
  let tree = Octree::build(items, unit_bound());
  let compressed = tree.compress();

  validate(&compressed);
  assert_eq!(compressed.internals.len(), 1);
  let root = compressed.root().unwrap();
  assert_eq!(root.arity(), 16);
  let ids: Vec<usize> = root.items().map(|(id, _)| *id).collect();
  assert_eq!(ids, (0..16).collect::<Vec<_>>());
}
