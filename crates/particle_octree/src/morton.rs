//! Morton (Z-order) codec and shared-prefix helpers.
//!
//! A position inside the construction bound quantizes to three 21-bit
//! coordinates which interleave into a 63-bit key, x highest. Sorting by the
//! key visits points along a Z-order space-filling curve, so spatially nearby
//! points end up adjacent. The sigma helpers measure how many octree levels
//! two keys share as a common prefix (one level = 3 bits); the builder is
//! driven entirely by those measurements.

use glam::DVec3;

use crate::geom::Aabb;

/// Bits per quantized coordinate.
pub const COORD_BITS: u32 = 21;

/// Deepest octree level; two keys sharing all 21 levels are identical.
pub const MAX_LEVEL: i32 = 21;

/// Largest quantized coordinate value.
const COORD_MAX: f64 = ((1u64 << COORD_BITS) - 1) as f64;

/// Spread the low 21 bits of `v` so two zero bits separate each source bit.
#[inline]
pub fn spread_bits(v: u32) -> u64 {
  let mut x = v as u64 & 0x1f_ffff;
  x = (x | (x << 32)) & 0x1f_0000_0000_ffff;
  x = (x | (x << 16)) & 0x1f_0000_ff00_00ff;
  x = (x | (x << 8)) & 0x100f_00f0_0f00_f00f;
  x = (x | (x << 4)) & 0x10c3_0c30_c30c_30c3;
  x = (x | (x << 2)) & 0x1249_2492_4924_9249;
  x
}

/// Morton key of a position quantized against `bound`.
///
/// Each axis maps linearly from the bound into `[0, 2^21 - 1]`, clamping at
/// the boundaries; coordinates outside the bound land on the nearest face.
/// An axis with zero extent quantizes to 0.
pub fn encode(position: DVec3, bound: &Aabb) -> u64 {
  let origin = bound.origin();
  let size = bound.size();
  let x = quantize_axis(position.x, origin.x, size.x);
  let y = quantize_axis(position.y, origin.y, size.y);
  let z = quantize_axis(position.z, origin.z, size.z);
  (spread_bits(x) << 2) | (spread_bits(y) << 1) | spread_bits(z)
}

#[inline]
fn quantize_axis(p: f64, origin: f64, size: f64) -> u32 {
  if size <= 0.0 {
    return 0;
  }
  let scaled = (p - origin) / size * COORD_MAX;
  // NaN falls through clamp and saturates to 0 in the cast.
  scaled.clamp(0.0, COORD_MAX) as u32
}

/// The 0/1 digit of `code` at bit position `power`.
#[inline]
pub fn digit(power: u32, code: u64) -> u64 {
  debug_assert!(power < 64, "bit position out of range");
  (code >> power) & 1
}

/// Leading-zero count of `codes[i] ^ codes[j]`, or -1 if either index is out
/// of range. Equal codes yield 64.
#[inline]
pub fn sigma(codes: &[u64], i: i64, j: i64) -> i32 {
  let len = codes.len() as i64;
  if i < 0 || j < 0 || i >= len || j >= len {
    return -1;
  }
  (codes[i as usize] ^ codes[j as usize]).leading_zeros() as i32
}

/// Number of whole octree levels shared by `codes[i]` and `codes[j]`,
/// clamped to -1 when either index is out of range.
#[inline]
pub fn slotted_sigma(codes: &[u64], i: i64, j: i64) -> i32 {
  let s = sigma(codes, i, j);
  if s <= 0 {
    -1
  } else {
    (s - 1) / 3
  }
}

/// First index in `[lo, hi)` whose code has the bit at `power` set, or `hi`
/// if none does.
///
/// All codes in the range must share the bits above `power`, which makes the
/// digit at `power` monotone over the sorted range.
pub fn split(codes: &[u64], power: u32, lo: usize, hi: usize) -> usize {
  debug_assert!(power < 64, "split power out of range");
  let (mut lo, mut hi) = (lo, hi);
  while lo < hi {
    let mid = lo + (hi - lo) / 2;
    if digit(power, codes[mid]) == 0 {
      lo = mid + 1;
    } else {
      hi = mid;
    }
  }
  lo
}
