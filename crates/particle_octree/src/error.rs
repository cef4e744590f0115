//! Error types for caller-side precondition violations.
//!
//! Builder bugs (broken deltas, sentinel nodes reached during navigation) are
//! not represented here - those are fatal and panic at the point of detection.

use thiserror::Error;

/// Precondition violations surfaced to the caller.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum OctreeError {
  /// The tree holds no items, so there is no root node.
  #[error("empty tree")]
  EmptyTree,

  /// A bounding box was requested over a point set containing NaN
  /// coordinates.
  #[error("underspecified point")]
  UnderspecifiedPoint,
}
