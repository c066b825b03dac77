//! Breadth-first walk over a node's branch tree.

use std::collections::VecDeque;

use generational_arena::Index;
use tracing::instrument;

use crate::domain::arena::RangeForest;
use crate::domain::node::RangeList;

/// Level-order walk over a node and its descendant branches.
///
/// Vacuous branches (no segments) are skipped, as is everything below them.
pub struct BreadthFirstIterator<'a, L, C> {
    forest: &'a RangeForest<L, C>,
    queue: VecDeque<Index>,
}

impl<'a, L, C> BreadthFirstIterator<'a, L, C> {
    pub(crate) fn new(forest: &'a RangeForest<L, C>, start: Index) -> Self {
        Self {
            forest,
            queue: VecDeque::from([start]),
        }
    }
}

impl<'a, L, C> Iterator for BreadthFirstIterator<'a, L, C> {
    type Item = (Index, &'a RangeList<L, C>);

    #[instrument(level = "trace", skip(self))]
    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.queue.pop_front() {
            if let Some(node) = self.forest.node(current_idx) {
                for segment in node.segments.iter().filter(|s| !s.branches.is_empty()) {
                    for &branch in &segment.branches {
                        if self.forest.node(branch).is_some_and(|b| !b.is_vacuous()) {
                            self.queue.push_back(branch);
                        }
                    }
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}
