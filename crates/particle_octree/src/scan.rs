//! Parallel prefix primitives.
//!
//! [`prefix_sum`] is an in-place exclusive scan: afterwards `buf[i]` holds
//! the sum of the original values in `buf[..i]`, starting from zero. The
//! original value of the last element contributes to nothing and is not read
//! back. [`prefix_count`] derives compaction indices from a predicate.
//!
//! The parallel path partitions the buffer into one contiguous chunk per
//! worker, sums each chunk, scans the chunk sums, then sweeps each chunk a
//! second time writing prefixes in place. Within a chunk every element is
//! read before it is overwritten, which is what makes the in-place rewrite
//! sound.

use rayon::prelude::*;

/// Below this length the scan runs sequentially; chunking overhead dominates
/// for short buffers.
const SEQUENTIAL_CUTOFF: usize = 512;

/// In-place exclusive prefix sum over `buf`.
pub fn prefix_sum(buf: &mut [i64]) {
  if buf.len() < SEQUENTIAL_CUTOFF {
    prefix_sum_seq(buf, 0);
    return;
  }
  let workers = rayon::current_num_threads().max(1);
  let chunk = buf.len().div_ceil(workers);

  // First sweep: plain sum per chunk, in positional order.
  let mut offsets: Vec<i64> = buf.par_chunks(chunk).map(|c| c.iter().sum()).collect();

  // Scan the chunk sums; the recursion bottoms out on the sequential path.
  prefix_sum(&mut offsets);

  // Second sweep: rewrite each chunk starting from its offset.
  buf
    .par_chunks_mut(chunk)
    .zip(offsets.par_iter())
    .for_each(|(c, &offset)| prefix_sum_seq(c, offset));
}

fn prefix_sum_seq(buf: &mut [i64], offset: i64) {
  let mut acc = offset;
  for v in buf.iter_mut() {
    let original = *v;
    *v = acc;
    acc += original;
  }
}

/// Compaction indices for the elements of `xs` passing `pred`.
///
/// `result[i]` is the number of `j < i` with `pred(&xs[j])`, which is the
/// slot a passing element relocates to when the sequence is compacted.
pub fn prefix_count<T, P>(xs: &[T], pred: P) -> Vec<i64>
where
  T: Sync,
  P: Fn(&T) -> bool + Sync,
{
  let mut indicator: Vec<i64> = xs.par_iter().map(|x| pred(x) as i64).collect();
  prefix_sum(&mut indicator);
  indicator
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::rngs::StdRng;
  use rand::{Rng, SeedableRng};

  fn reference(buf: &[i64]) -> Vec<i64> {
    let mut out = Vec::with_capacity(buf.len());
    let mut acc = 0;
    for &v in buf {
      out.push(acc);
      acc += v;
    }
    out
  }

  #[test]
  fn test_small_exclusive_scan() {
    let mut buf = vec![3, 1, 4, 1, 5];
    prefix_sum(&mut buf);
    assert_eq!(buf, vec![0, 3, 4, 8, 9]);
  }

  #[test]
  fn test_trivial_lengths() {
    let mut empty: Vec<i64> = vec![];
    prefix_sum(&mut empty);
    assert!(empty.is_empty());

    let mut one = vec![42];
    prefix_sum(&mut one);
    assert_eq!(one, vec![0]);
  }

  #[test]
  fn test_matches_reference_across_cutoff() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for len in [2usize, 7, 63, 511, 512, 513, 4096, 100_000] {
      let original: Vec<i64> = (0..len).map(|_| rng.gen_range(-1000..1000)).collect();
      let expected = reference(&original);
      let mut buf = original.clone();
      prefix_sum(&mut buf);
      assert_eq!(buf, expected, "mismatch at len {len}");
    }
  }

  #[test]
  fn test_prefix_count() {
    let xs: Vec<u32> = (0..1000).collect();
    let idx = prefix_count(&xs, |x| x % 3 == 0);
    let mut expected = 0;
    for (i, x) in xs.iter().enumerate() {
      assert_eq!(idx[i], expected, "at index {i}");
      if x % 3 == 0 {
        expected += 1;
      }
    }
  }

  #[test]
  fn test_prefix_count_empty() {
    let xs: [u32; 0] = [];
    assert!(prefix_count(&xs, |_| true).is_empty());
  }
}
