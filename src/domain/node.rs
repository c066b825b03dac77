//! The range list node stored in the forest arena.

use std::fmt;

use generational_arena::Index;

use crate::domain::interval::Interval;
use crate::domain::segment::Segment;

/// A node covering one interval, partitioned into ordered segments.
///
/// Nodes are owned by a [`RangeForest`](crate::domain::RangeForest) and
/// edited through it; the accessors here are read-only.
#[derive(Debug)]
pub struct RangeList<L, C> {
    pub(crate) id: Option<L>,
    /// Root = 1, each branch = owner level + 1
    pub(crate) level: u32,
    pub(crate) split_capacity: Option<usize>,
    pub(crate) branch_capacity: Option<usize>,
    /// Node this one branched off from; never owning
    pub(crate) parent: Option<Index>,
    /// Full coverage, ignoring internal splits
    pub(crate) range: Interval<C>,
    pub(crate) segments: Vec<Segment<C>>,
}

impl<L, C: Clone> RangeList<L, C> {
    pub(crate) fn new(range: Interval<C>, level: u32, parent: Option<Index>, weight: f64) -> Self {
        Self {
            id: None,
            level,
            split_capacity: None,
            branch_capacity: None,
            parent,
            segments: vec![Segment::new(range.clone(), weight)],
            range,
        }
    }
}

impl<L, C> RangeList<L, C> {
    pub fn id(&self) -> Option<&L> {
        self.id.as_ref()
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn parent(&self) -> Option<Index> {
        self.parent
    }

    pub fn range(&self) -> &Interval<C> {
        &self.range
    }

    pub fn segments(&self) -> &[Segment<C>] {
        &self.segments
    }

    /// Segment at 1-based position `i`.
    pub fn segment(&self, i: usize) -> Option<&Segment<C>> {
        i.checked_sub(1).and_then(|pos| self.segments.get(pos))
    }

    pub fn split_capacity(&self) -> Option<usize> {
        self.split_capacity
    }

    pub fn has_split_capacity(&self) -> bool {
        self.split_capacity.is_some()
    }

    pub fn branch_capacity(&self) -> Option<usize> {
        self.branch_capacity
    }

    pub fn has_branch_capacity(&self) -> bool {
        self.branch_capacity.is_some()
    }

    /// Number of segments.
    pub fn size(&self) -> usize {
        self.segments.len()
    }

    /// Number of cuts dividing the range, `size() - 1`.
    pub fn split_count(&self) -> usize {
        self.segments.len().saturating_sub(1)
    }

    /// A node without segments contributes nothing to counts or traversal.
    pub fn is_vacuous(&self) -> bool {
        self.segments.is_empty()
    }
}

impl<L: fmt::Debug, C: fmt::Display> fmt::Display for RangeList<L, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(id) = &self.id {
            write!(f, "{:?} ", id)?;
        }
        write!(f, "L{} {}:", self.level, self.range)?;
        for segment in &self.segments {
            write!(f, " {}", segment.range)?;
        }
        Ok(())
    }
}
