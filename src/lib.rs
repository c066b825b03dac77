//! Nested interval partitions over a totally ordered domain.
//!
//! A [`RangeList`](domain::RangeList) node covers one interval, divided into
//! contiguous [`Segment`](domain::Segment)s. Each segment carries a weight,
//! named attributes, and branches: child nodes that subdivide a finer
//! interval of their own. All nodes live in a
//! [`RangeForest`](domain::RangeForest) arena and are edited through it.

pub mod config;
pub mod domain;
pub mod error;
pub mod tree_traits;
pub mod util;

pub use config::Settings;
pub use domain::{
    AttributeValue, BoundType, Interval, NodeId, RangeError, RangeForest, RangeList, RangeResult,
    Segment,
};
pub use error::{Error, Result};
