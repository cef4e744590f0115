//! Axis-aligned bounding box algebra with double precision.
//!
//! A box is an `(origin, size)` pair with `size >= 0` on every axis. The
//! unique empty box has a NaV origin and zero size; the full box has origin
//! `-inf` and size `+inf` on every axis. Construction canonicalizes negative
//! extents by swapping the corner, so the invariant holds for any input.

use core::fmt;

use glam::DVec3;

use crate::error::OctreeError;
use crate::geom::vec::{is_nav, vec_eq, NAV};

/// Double-precision axis-aligned bounding box stored as origin and size.
#[derive(Clone, Copy, Debug)]
pub struct Aabb {
	origin: DVec3,
	size: DVec3,
}

impl Aabb {
	/// The unique empty box.
	pub const EMPTY: Self = Self {
		origin: NAV,
		size: DVec3::ZERO,
	};

	/// The box covering all of space.
	pub const FULL: Self = Self {
		origin: DVec3::NEG_INFINITY,
		size: DVec3::INFINITY,
	};

	/// Create a box from origin and size.
	///
	/// Negative size components are canonicalized by moving the origin to the
	/// opposite corner, so the stored size is non-negative on every axis.
	pub fn new(origin: DVec3, size: DVec3) -> Self {
		let mut origin = origin;
		let mut size = size;
		for axis in 0..3 {
			if size[axis] < 0.0 {
				origin[axis] += size[axis];
				size[axis] = -size[axis];
			}
		}
		Self { origin, size }
	}

	/// Create a box from its minimum and maximum corners.
	pub fn from_corners(min: DVec3, max: DVec3) -> Self {
		Self::new(min, max - min)
	}

	/// Smallest box containing all given points; empty iff the set is empty.
	///
	/// Fails with [`OctreeError::UnderspecifiedPoint`] if any point has a NaN
	/// coordinate.
	pub fn bound_points<I>(points: I) -> Result<Self, OctreeError>
	where
		I: IntoIterator<Item = DVec3>,
	{
		let mut min = DVec3::INFINITY;
		let mut max = DVec3::NEG_INFINITY;
		let mut any = false;
		for p in points {
			if is_nav(p) {
				return Err(OctreeError::UnderspecifiedPoint);
			}
			any = true;
			min = min.min(p);
			max = max.max(p);
		}
		if !any {
			return Ok(Self::EMPTY);
		}
		Ok(Self::from_corners(min, max))
	}

	/// Smallest box containing all given boxes. Empty inputs are ignored.
	pub fn bound_boxes<I>(boxes: I) -> Self
	where
		I: IntoIterator<Item = Aabb>,
	{
		boxes.into_iter().fold(Self::EMPTY, |acc, b| acc.union(&b))
	}

	/// Largest box contained in all given boxes; [`Aabb::EMPTY`] if any gap
	/// exists. The intersection of no boxes is the full box.
	pub fn intersect_boxes<I>(boxes: I) -> Self
	where
		I: IntoIterator<Item = Aabb>,
	{
		boxes
			.into_iter()
			.fold(Self::FULL, |acc, b| acc.intersect(&b))
	}

	/// Origin (minimum corner).
	#[inline]
	pub fn origin(&self) -> DVec3 {
		self.origin
	}

	/// Size (extent per axis, non-negative).
	#[inline]
	pub fn size(&self) -> DVec3 {
		self.size
	}

	/// Minimum corner (same as origin).
	#[inline]
	pub fn min(&self) -> DVec3 {
		self.origin
	}

	/// Maximum corner.
	#[inline]
	pub fn max(&self) -> DVec3 {
		// An infinite extent dominates regardless of origin; the naive sum
		// would produce NaN for the full box (-inf + inf).
		DVec3::new(
			axis_max(self.origin.x, self.size.x),
			axis_max(self.origin.y, self.size.y),
			axis_max(self.origin.z, self.size.z),
		)
	}

	/// True for the unique empty box.
	#[inline]
	pub fn is_empty(&self) -> bool {
		is_nav(self.origin)
	}

	/// True for the box covering all of space.
	#[inline]
	pub fn is_full(&self) -> bool {
		self.origin == DVec3::NEG_INFINITY && self.size == DVec3::INFINITY
	}

	/// Smallest box enclosing both boxes.
	pub fn union(&self, other: &Aabb) -> Aabb {
		if self.is_empty() {
			return *other;
		}
		if other.is_empty() {
			return *self;
		}
		Self::from_corners(self.min().min(other.min()), self.max().max(other.max()))
	}

	/// Largest box contained in both boxes; empty if they are separated on
	/// any axis. Boxes touching at a face yield a zero-extent box, not the
	/// empty box.
	pub fn intersect(&self, other: &Aabb) -> Aabb {
		if self.is_empty() || other.is_empty() {
			return Self::EMPTY;
		}
		let min = self.min().max(other.min());
		let max = self.max().min(other.max());
		if min.x > max.x || min.y > max.y || min.z > max.z {
			return Self::EMPTY;
		}
		Self::from_corners(min, max)
	}
}

fn axis_max(origin: f64, size: f64) -> f64 {
	if size == f64::INFINITY {
		f64::INFINITY
	} else {
		origin + size
	}
}

impl PartialEq for Aabb {
	fn eq(&self, other: &Self) -> bool {
		if self.is_empty() || other.is_empty() {
			return self.is_empty() && other.is_empty();
		}
		vec_eq(self.origin, other.origin) && vec_eq(self.size, other.size)
	}
}

impl fmt::Display for Aabb {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.is_empty() {
			return write!(f, "box(empty)");
		}
		write!(
			f,
			"box(origin = ({}, {}, {}), size = ({}, {}, {}))",
			self.origin.x, self.origin.y, self.origin.z, self.size.x, self.size.y, self.size.z
		)
	}
}
