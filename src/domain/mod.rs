//! Domain layer: intervals, segments, nodes and the arena that owns them
//!
//! This layer is independent of external concerns (no I/O, no config loading).

pub mod arena;
pub mod attribute;
pub mod error;
pub mod interval;
pub mod node;
pub mod segment;
pub mod traversal;

pub use arena::{NodeId, RangeForest};
pub use attribute::{AttributeValue, OpaqueAttribute};
pub use error::{RangeError, RangeResult};
pub use interval::{BoundType, Interval};
pub use node::RangeList;
pub use segment::Segment;
pub use traversal::BreadthFirstIterator;
