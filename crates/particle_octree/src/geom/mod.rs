//! Vector and axis-aligned box algebra.
//!
//! Positions are plain [`glam::DVec3`] values; [`vec`] adds the NaV
//! ("not-a-vector") sentinel semantics and the total ordering the rest of the
//! crate relies on. [`aabb`] provides the `(origin, size)` box algebra used
//! for construction bounds and invariant checking.

pub mod aabb;
pub mod vec;

pub use aabb::Aabb;
pub use vec::{is_nav, vec_cmp, vec_eq, NAV};
