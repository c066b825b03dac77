//! Domain-level errors (no external dependencies)

use generational_arena::Index;
use thiserror::Error;

/// Validated failures of range operations.
///
/// A failed operation leaves the forest exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("node not found: {0:?}")]
    NodeNotFound(Index),

    #[error("node is a branch, not a root: {0:?}")]
    NotARoot(Index),

    #[error("segment index {index} out of range 1..={len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("cannot merge segment {0} with itself")]
    SameSegment(usize),

    #[error("split capacity exceeded: {requested} segments requested, capacity {capacity}")]
    SplitCapacityExceeded { requested: usize, capacity: usize },

    #[error("branch capacity exceeded at segment {segment}: capacity {capacity}")]
    BranchCapacityExceeded { segment: usize, capacity: usize },

    #[error("cut point does not fall inside segment {0}")]
    CutNotInSegment(usize),

    #[error("lower endpoint is greater than upper endpoint")]
    InvertedRange,

    #[error("no segment contains the requested endpoint")]
    NoSegmentContains,

    #[error("branch range is not enclosed by the node range")]
    NotEnclosed,

    #[error("branch origin at segment {0} lies outside the node range")]
    BranchOriginOutsideRange(usize),

    #[error("invalid interval: lower endpoint after upper endpoint or empty open interval")]
    InvalidInterval,
}

/// Result type for range operations.
pub type RangeResult<T> = Result<T, RangeError>;
