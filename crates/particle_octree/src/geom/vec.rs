//! NaV-aware helpers over [`glam::DVec3`].
//!
//! Componentwise arithmetic, dot product, and magnitude come directly from
//! `glam`. This module adds the pieces `glam` deliberately leaves out: a
//! distinguished "not-a-vector" sentinel, equality that treats all NaV values
//! as equal, and a total ordering.

use core::cmp::Ordering;

use glam::DVec3;

/// The "not-a-vector" sentinel: all three components NaN.
///
/// Used solely to denote emptiness (the origin of the empty box).
pub const NAV: DVec3 = DVec3::NAN;

/// A vector counts as NaV if any component is NaN.
#[inline]
pub fn is_nav(v: DVec3) -> bool {
  v.is_nan()
}

/// Bitwise-exact equality per component; all NaV values compare equal.
#[inline]
pub fn vec_eq(a: DVec3, b: DVec3) -> bool {
  if is_nav(a) || is_nav(b) {
    return is_nav(a) && is_nav(b);
  }
  a.x.to_bits() == b.x.to_bits() && a.y.to_bits() == b.y.to_bits() && a.z.to_bits() == b.z.to_bits()
}

/// Total ordering: NaV sorts before every proper vector, proper vectors
/// compare lexicographically on (x, y, z).
pub fn vec_cmp(a: DVec3, b: DVec3) -> Ordering {
  match (is_nav(a), is_nav(b)) {
    (true, true) => Ordering::Equal,
    (true, false) => Ordering::Less,
    (false, true) => Ordering::Greater,
    (false, false) => a
      .x
      .total_cmp(&b.x)
      .then(a.y.total_cmp(&b.y))
      .then(a.z.total_cmp(&b.z)),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_nav_detection() {
    assert!(is_nav(NAV));
    assert!(is_nav(DVec3::new(0.0, f64::NAN, 0.0)));
    assert!(!is_nav(DVec3::ZERO));
    assert!(!is_nav(DVec3::INFINITY));
  }

  #[test]
  fn test_nav_values_are_equal() {
    assert!(vec_eq(NAV, NAV));
    assert!(vec_eq(NAV, DVec3::new(f64::NAN, 1.0, 2.0)));
    assert!(!vec_eq(NAV, DVec3::ZERO));
  }

  #[test]
  fn test_bitwise_equality() {
    let a = DVec3::new(1.0, 2.0, 3.0);
    assert!(vec_eq(a, a));
    assert!(!vec_eq(a, DVec3::new(1.0, 2.0, 3.0 + f64::EPSILON)));
    // -0.0 and 0.0 differ bitwise
    assert!(!vec_eq(DVec3::splat(-0.0), DVec3::ZERO));
  }

  #[test]
  fn test_total_order() {
    let mut vs = vec![
      DVec3::new(1.0, 0.0, 0.0),
      NAV,
      DVec3::ZERO,
      DVec3::new(0.0, 1.0, 0.0),
      DVec3::new(0.0, 0.0, 1.0),
    ];
    vs.sort_by(|a, b| vec_cmp(*a, *b));
    assert!(is_nav(vs[0]));
    assert_eq!(vs[1], DVec3::ZERO);
    assert_eq!(vs[2], DVec3::new(0.0, 0.0, 1.0));
    assert_eq!(vs[3], DVec3::new(0.0, 1.0, 0.0));
    assert_eq!(vs[4], DVec3::new(1.0, 0.0, 0.0));
  }
}
