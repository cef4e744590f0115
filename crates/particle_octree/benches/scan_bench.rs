//! Prefix-sum benchmarks.
//!
//! Compares the parallel in-place exclusive scan against a sequential
//! reference across buffer sizes. On a machine with two or more cores the
//! parallel path should win clearly from ~1M elements up.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use particle_octree::scan::{prefix_count, prefix_sum};

fn sequential_reference(buf: &mut [i64]) {
  let mut acc = 0;
  for v in buf.iter_mut() {
    let original = *v;
    *v = acc;
    acc += original;
  }
}

fn source_buffer(len: usize) -> Vec<i64> {
  (0..len as i64).map(|i| (i * 2654435761) % 1000 - 500).collect()
}

fn bench_prefix_sum(c: &mut Criterion) {
  let mut group = c.benchmark_group("prefix_sum");

  for size in [1usize << 14, 1 << 18, 1 << 22] {
    let source = source_buffer(size);

    group.bench_with_input(BenchmarkId::new("sequential", size), &size, |b, _| {
      b.iter_batched(
        || source.clone(),
        |mut buf| {
          sequential_reference(&mut buf);
          black_box(buf)
        },
        criterion::BatchSize::LargeInput,
      )
    });

    group.bench_with_input(BenchmarkId::new("parallel", size), &size, |b, _| {
      b.iter_batched(
        || source.clone(),
        |mut buf| {
          prefix_sum(&mut buf);
          black_box(buf)
        },
        criterion::BatchSize::LargeInput,
      )
    });
  }

  group.finish();
}

fn bench_prefix_count(c: &mut Criterion) {
  let mut group = c.benchmark_group("prefix_count");

  for size in [1usize << 16, 1 << 20] {
    let xs: Vec<i64> = source_buffer(size);
    group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
      b.iter(|| black_box(prefix_count(&xs, |x| *x >= 0)))
    });
  }

  group.finish();
}

criterion_group!(benches, bench_prefix_sum, bench_prefix_count);
criterion_main!(benches);
