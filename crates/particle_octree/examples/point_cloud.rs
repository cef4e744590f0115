//! Build an octree over a random particle cloud and print what came out.
//!
//! Run with: cargo run --release --example point_cloud

use glam::DVec3;
use particle_octree::{Aabb, NodeRef, Octree};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn height<T>(node: NodeRef<'_, T>) -> usize {
  node.children().map(|c| 1 + height(c)).max().unwrap_or(0)
}

fn node_count<T>(node: NodeRef<'_, T>) -> usize {
  1 + node.children().map(node_count).sum::<usize>()
}

fn main() {
  let n = 50_000;
  let mut rng = StdRng::seed_from_u64(7);
  let items: Vec<(usize, DVec3)> = (0..n)
    .map(|k| {
      (
        k,
        DVec3::new(rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0)),
      )
    })
    .collect();

  let bound = Aabb::new(DVec3::ZERO, DVec3::splat(1.0));
  let (tree, stats) = Octree::build_timed(items, bound);

  println!("built octree over {} items in {}", n, bound);
  println!("  sort: {} us, fill: {} us", stats.sort_us, stats.fill_us);
  println!(
    "  internal slots: {} ({} reachable, {} unreachable)",
    stats.internal_slots,
    stats.reachable_internals,
    stats.unreachable_internals()
  );

  let root = tree.root().expect("non-empty tree has a root");
  println!("  root arity: {}", root.arity());
  println!("  height: {}", height(root));
  println!("  nodes reachable from root: {}", node_count(root));

  let compressed = tree.compress();
  let root = compressed.root().expect("non-empty tree has a root");
  println!(
    "after compaction: {} nodes reachable, root arity {}",
    node_count(root),
    root.arity()
  );
}
