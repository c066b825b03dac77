//! Arena owning every node of a branching range structure.
//!
//! Segments refer to their branches by generational index, and branches
//! refer back to the node they sprouted from the same way. Ownership runs
//! strictly from a segment to the branches listed inside it: whenever a
//! segment or branch is discarded, the whole subtree below it is released
//! from the arena.

use std::collections::VecDeque;
use std::fmt;

use generational_arena::{Arena, Index};
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::config::Settings;
use crate::domain::attribute::AttributeValue;
use crate::domain::error::{RangeError, RangeResult};
use crate::domain::interval::{BoundType, Interval};
use crate::domain::node::RangeList;
use crate::domain::segment::Segment;
use crate::domain::traversal::BreadthFirstIterator;

/// Handle to a node stored in a [`RangeForest`].
pub type NodeId = Index;

/// Arena-based storage for range list nodes and their branches.
///
/// Every structural edit goes through the forest so that released subtrees
/// never leave dangling indices behind.
#[derive(Debug)]
pub struct RangeForest<L, C> {
    arena: Arena<RangeList<L, C>>,
    /// Defaults applied to every node created by this forest
    settings: Settings,
}

impl<L, C> Default for RangeForest<L, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L, C> RangeForest<L, C> {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            arena: Arena::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Number of live nodes, roots and branches alike.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&RangeList<L, C>> {
        self.arena.get(id)
    }

    fn get(&self, id: NodeId) -> RangeResult<&RangeList<L, C>> {
        self.arena.get(id).ok_or(RangeError::NodeNotFound(id))
    }

    fn get_mut(&mut self, id: NodeId) -> RangeResult<&mut RangeList<L, C>> {
        self.arena.get_mut(id).ok_or(RangeError::NodeNotFound(id))
    }

    fn is_vacuous(&self, id: NodeId) -> bool {
        self.arena.get(id).map_or(true, RangeList::is_vacuous)
    }

    /// Branch length is the number of segments the branch holds.
    fn branch_length(&self, id: NodeId) -> usize {
        self.arena.get(id).map_or(0, RangeList::size)
    }

    fn live_branches(&self, segment: &Segment<C>) -> usize {
        segment.branches.iter().filter(|&&b| !self.is_vacuous(b)).count()
    }

    /// Removes `root` and everything reachable through its segments.
    fn release_subtree(&mut self, root: NodeId) {
        let mut queue = VecDeque::from([root]);
        while let Some(idx) = queue.pop_front() {
            if let Some(node) = self.arena.remove(idx) {
                for segment in node.segments {
                    queue.extend(segment.branches);
                }
            }
        }
    }

    /// Walks the branch tree below `id` level by level.
    pub fn iter_breadth_first(&self, id: NodeId) -> RangeResult<BreadthFirstIterator<'_, L, C>> {
        self.get(id)?;
        Ok(BreadthFirstIterator::new(self, id))
    }

    /// Level-order sequence of `id` and its non-vacuous descendant branches.
    ///
    /// Rebuilt from scratch on every call.
    pub fn traverse_by_breadth(&self, id: NodeId) -> RangeResult<Vec<NodeId>> {
        Ok(self.iter_breadth_first(id)?.map(|(idx, _)| idx).collect())
    }
}

/// Converts a 1-based segment index into a vector position.
fn segment_position<L, C>(node: &RangeList<L, C>, i: usize) -> RangeResult<usize> {
    if i == 0 || i > node.segments.len() {
        return Err(RangeError::IndexOutOfRange {
            index: i,
            len: node.segments.len(),
        });
    }
    Ok(i - 1)
}

impl<L, C> RangeForest<L, C>
where
    L: fmt::Debug,
    C: Ord + Clone + fmt::Debug,
{
    fn create_node(&mut self, range: Interval<C>, level: u32, parent: Option<NodeId>) -> NodeId {
        let mut node = RangeList::new(range, level, parent, self.settings.default_weight);
        node.split_capacity = self.settings.split_capacity;
        node.branch_capacity = self.settings.branch_capacity;
        self.arena.insert(node)
    }

    /// Creates a level 1 node covering `range` with a single segment.
    #[instrument(level = "debug", skip(self))]
    pub fn insert_root(&mut self, range: Interval<C>) -> NodeId {
        self.create_node(range, 1, None)
    }

    /// Releases a root node together with all of its branches.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_root(&mut self, id: NodeId) -> RangeResult<()> {
        if self.get(id)?.parent.is_some() {
            return Err(RangeError::NotARoot(id));
        }
        self.release_subtree(id);
        Ok(())
    }

    // ------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------

    #[instrument(level = "trace", skip(self))]
    pub fn size(&self, id: NodeId) -> RangeResult<usize> {
        Ok(self.get(id)?.size())
    }

    #[instrument(level = "trace", skip(self))]
    pub fn split_count(&self, id: NodeId) -> RangeResult<usize> {
        Ok(self.get(id)?.split_count())
    }

    /// Counts segments with no branches, or whose branches are all vacuous.
    #[instrument(level = "trace", skip(self))]
    pub fn empty_split_count(&self, id: NodeId) -> RangeResult<usize> {
        let node = self.get(id)?;
        Ok(node
            .segments
            .iter()
            .filter(|s| s.branches.iter().all(|&b| self.is_vacuous(b)))
            .count())
    }

    /// Counts direct, non-vacuous branches over all segments.
    #[instrument(level = "trace", skip(self))]
    pub fn branch_count(&self, id: NodeId) -> RangeResult<usize> {
        let node = self.get(id)?;
        Ok(node.segments.iter().map(|s| self.live_branches(s)).sum())
    }

    /// Counts non-vacuous branches of the 1-based segment `i`.
    #[instrument(level = "trace", skip(self))]
    pub fn branch_count_at(&self, id: NodeId, i: usize) -> RangeResult<usize> {
        let node = self.get(id)?;
        let pos = segment_position(node, i)?;
        Ok(self.live_branches(&node.segments[pos]))
    }

    // ------------------------------------------------------------
    // Mutators
    // ------------------------------------------------------------

    #[instrument(level = "debug", skip(self))]
    pub fn set_id(&mut self, id: NodeId, identifier: L) -> RangeResult<()> {
        self.get_mut(id)?.id = Some(identifier);
        Ok(())
    }

    /// Enforces `cap` as the segment limit and merges tail segments down to it.
    #[instrument(level = "debug", skip(self))]
    pub fn set_split_capacity(&mut self, id: NodeId, cap: usize) -> RangeResult<()> {
        self.get_mut(id)?.split_capacity = Some(cap);
        self.resize_split(id, cap)
    }

    /// Enforces `cap` as the per-segment branch limit, dropping longest branches first.
    #[instrument(level = "debug", skip(self))]
    pub fn set_branch_capacity(&mut self, id: NodeId, cap: usize) -> RangeResult<()> {
        self.get_mut(id)?.branch_capacity = Some(cap);
        self.resize_branch_all(id, cap, true)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn set_weight(&mut self, id: NodeId, i: usize, weight: f64) -> RangeResult<()> {
        let node = self.get_mut(id)?;
        let pos = segment_position(node, i)?;
        node.segments[pos].weight = weight;
        Ok(())
    }

    /// Merges tail-most adjacent segments until at most `size` remain.
    ///
    /// A node never drops below one segment.
    #[instrument(level = "debug", skip(self))]
    pub fn resize_split(&mut self, id: NodeId, size: usize) -> RangeResult<()> {
        let node = self.get(id)?;
        if let Some(capacity) = node.split_capacity {
            if size > capacity {
                debug!("Rejecting resize to {} segments, capacity {}", size, capacity);
                return Err(RangeError::SplitCapacityExceeded {
                    requested: size,
                    capacity,
                });
            }
        }

        let target = size.max(1);
        loop {
            let len = self.get(id)?.size();
            if len <= target {
                break;
            }
            self.merge_range(id, len - 1, len)?;
        }
        Ok(())
    }

    /// Releases branches of segment `i` until at most `size` remain.
    ///
    /// Branches are ranked by length (segment count); `remove_longer` drops
    /// from the long end, otherwise from the short end. Equal lengths keep
    /// insertion order, later branches ranking longer.
    #[instrument(level = "debug", skip(self))]
    pub fn resize_branch(
        &mut self,
        id: NodeId,
        i: usize,
        size: usize,
        remove_longer: bool,
    ) -> RangeResult<()> {
        let node = self.get(id)?;
        let pos = segment_position(node, i)?;
        let branches = &node.segments[pos].branches;
        if branches.len() <= size {
            return Ok(());
        }

        let excess = branches.len() - size;
        let ranked: Vec<NodeId> = branches
            .iter()
            .copied()
            .sorted_by_key(|&b| self.branch_length(b))
            .collect();
        let doomed: Vec<NodeId> = if remove_longer {
            ranked.into_iter().rev().take(excess).collect()
        } else {
            ranked.into_iter().take(excess).collect()
        };

        debug!("Releasing {} branches from segment {}", doomed.len(), i);
        self.get_mut(id)?.segments[pos]
            .branches
            .retain(|b| !doomed.contains(b));
        for branch in doomed {
            self.release_subtree(branch);
        }
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    pub fn resize_branch_all(
        &mut self,
        id: NodeId,
        size: usize,
        remove_longer: bool,
    ) -> RangeResult<()> {
        for i in 1..=self.size(id)? {
            self.resize_branch(id, i, size, remove_longer)?;
        }
        Ok(())
    }

    /// Shrinks or moves the node's coverage to `lower..upper`.
    ///
    /// Segments outside the new coverage are dropped with their branches, and
    /// so are branches no longer enclosed by it. The outer bound kinds of the
    /// node are kept; interior segment edges are untouched.
    #[instrument(level = "debug", skip(self))]
    pub fn resize_range(&mut self, id: NodeId, lower: C, upper: C) -> RangeResult<()> {
        if lower > upper {
            return Err(RangeError::InvertedRange);
        }
        let node = self.get(id)?;
        let first = node
            .segments
            .iter()
            .position(|s| s.range.contains(&lower))
            .ok_or(RangeError::NoSegmentContains)?;
        let mut last = node
            .segments
            .iter()
            .position(|s| s.range.contains(&upper))
            .ok_or(RangeError::NoSegmentContains)?;

        let lower_kind = node.range.lower_bound();
        let upper_kind = node.range.upper_bound();
        // an open upper end on a cut leaves nothing of the segment starting there
        if last > first
            && upper_kind == BoundType::Open
            && *node.segments[last].range.lower() == upper
        {
            last -= 1;
        }
        let new_range = Interval::new(lower.clone(), lower_kind, upper.clone(), upper_kind)?;
        let (first_range, last_range) = if first == last {
            (new_range.clone(), None)
        } else {
            let head = &node.segments[first].range;
            let tail = &node.segments[last].range;
            (
                Interval::new(lower, lower_kind, head.upper().clone(), head.upper_bound())?,
                Some(Interval::new(tail.lower().clone(), tail.lower_bound(), upper, upper_kind)?),
            )
        };

        let escaping: Vec<NodeId> = node.segments[first..=last]
            .iter()
            .flat_map(|s| s.branches.iter().copied())
            .filter(|&b| {
                self.arena
                    .get(b)
                    .is_some_and(|branch| !new_range.encloses(&branch.range))
            })
            .collect();

        let node = self.get_mut(id)?;
        let mut released: Vec<NodeId> = node
            .segments
            .drain(last + 1..)
            .flat_map(|s| s.branches)
            .collect();
        released.extend(node.segments.drain(..first).flat_map(|s| s.branches));
        node.segments[0].range = first_range;
        if let Some(tail_range) = last_range {
            if let Some(tail) = node.segments.last_mut() {
                tail.range = tail_range;
            }
        }
        for segment in &mut node.segments {
            segment.branches.retain(|b| !escaping.contains(b));
        }
        debug!("Resized range to {:?}, {} segments kept", new_range, node.segments.len());
        node.range = new_range;

        released.extend(escaping);
        for branch in released {
            self.release_subtree(branch);
        }
        Ok(())
    }

    /// Inserts or replaces attribute `key` on segment `i`.
    #[instrument(level = "debug", skip(self, key, value))]
    pub fn put_attribute(
        &mut self,
        id: NodeId,
        i: usize,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> RangeResult<()> {
        let node = self.get_mut(id)?;
        let pos = segment_position(node, i)?;
        node.segments[pos].attributes.insert(key.into(), value.into());
        Ok(())
    }

    /// Inserts or replaces attribute `key` on every segment.
    #[instrument(level = "debug", skip(self, key, value))]
    pub fn put_attribute_all(
        &mut self,
        id: NodeId,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> RangeResult<()> {
        let key = key.into();
        let value = value.into();
        for segment in &mut self.get_mut(id)?.segments {
            segment.attributes.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    /// Attaches a new branch over `range`; its lower end is taken as closed.
    ///
    /// The branch goes to the segment that starts or ends at `range.lower`.
    /// When no segment edge sits there the containing segment is split at
    /// that point and the branch goes to the right-hand half, unless the
    /// split capacity is exhausted, in which case the containing segment
    /// takes it unsplit.
    #[instrument(level = "debug", skip(self))]
    pub fn add_branch(&mut self, id: NodeId, range: Interval<C>) -> RangeResult<NodeId> {
        let range = Interval::new(
            range.lower().clone(),
            BoundType::Closed,
            range.upper().clone(),
            range.upper_bound(),
        )?;
        let node = self.get(id)?;
        if !node.range.encloses(&range) {
            debug!("Branch {:?} not enclosed by {:?}", range, node.range);
            return Err(RangeError::NotEnclosed);
        }

        let start = range.lower();
        let pos = node
            .segments
            .iter()
            .position(|s| s.range.contains(start))
            .ok_or(RangeError::NoSegmentContains)?;
        let segment = &node.segments[pos];
        let on_edge = segment.range.upper() == start || segment.range.lower() == start;
        let split_full = node
            .split_capacity
            .is_some_and(|capacity| node.segments.len() >= capacity);
        let target = if on_edge || split_full { pos } else { pos + 1 };

        if let Some(capacity) = node.branch_capacity {
            let occupied = if target == pos { segment.branches.len() } else { 0 };
            if occupied >= capacity {
                return Err(RangeError::BranchCapacityExceeded {
                    segment: target + 1,
                    capacity,
                });
            }
        }

        let level = node.level + 1;
        if target != pos {
            self.split_range(id, pos + 1, start.clone())?;
        }
        let child = self.create_node(range, level, Some(id));
        self.get_mut(id)?.segments[target].branches.push(child);
        debug!("Attached branch {:?} to segment {}", child, target + 1);
        Ok(child)
    }

    /// Attaches a branch `[segment[i].upper, upper]` to segment `i`.
    #[instrument(level = "debug", skip(self))]
    pub fn add_branch_at(&mut self, id: NodeId, i: usize, upper: C) -> RangeResult<NodeId> {
        let node = self.get(id)?;
        let pos = segment_position(node, i)?;
        let origin = node.segments[pos].range.upper().clone();
        let is_last = i == node.segments.len();
        let open_end = is_last && node.range.upper_bound() == BoundType::Open;
        if !node.range.contains(&origin) || open_end {
            return Err(RangeError::BranchOriginOutsideRange(i));
        }

        let range = Interval::closed(origin, upper)?;
        if !node.range.encloses(&range) {
            return Err(RangeError::NotEnclosed);
        }
        if let Some(capacity) = node.branch_capacity {
            if node.segments[pos].branches.len() >= capacity {
                return Err(RangeError::BranchCapacityExceeded { segment: i, capacity });
            }
        }

        let level = node.level + 1;
        let child = self.create_node(range, level, Some(id));
        self.get_mut(id)?.segments[pos].branches.push(child);
        debug!("Attached branch {:?} to segment {}", child, i);
        Ok(child)
    }

    /// Merges segments `i` and `j` into the lower position.
    ///
    /// The merged segment spans both and takes attributes, weight and
    /// branches from the higher-indexed one; the lower and any intervening
    /// segments are dropped with their branches.
    #[instrument(level = "debug", skip(self))]
    pub fn merge_range(&mut self, id: NodeId, i: usize, j: usize) -> RangeResult<()> {
        let node = self.get_mut(id)?;
        segment_position(node, i)?;
        segment_position(node, j)?;
        if i == j {
            return Err(RangeError::SameSegment(i));
        }
        let lo = i.min(j) - 1;
        let hi = i.max(j) - 1;

        let mut survivor = node.segments.remove(hi);
        survivor.range = node.segments[lo].range.span(&survivor.range);
        let released: Vec<NodeId> = node
            .segments
            .drain(lo..hi)
            .flat_map(|s| s.branches)
            .collect();
        debug!("Merged segments {}..={} into {:?}", lo + 1, hi + 1, survivor.range);
        node.segments.insert(lo, survivor);

        for branch in released {
            self.release_subtree(branch);
        }
        Ok(())
    }

    pub fn merge_next_range(&mut self, id: NodeId, i: usize) -> RangeResult<()> {
        match i.checked_add(1) {
            Some(next) => self.merge_range(id, i, next),
            None => Err(RangeError::IndexOutOfRange {
                index: i,
                len: self.size(id)?,
            }),
        }
    }

    /// Splits segment `i` at `cut` into `[lower, cut)` and `[cut, upper]`.
    ///
    /// The left half keeps the branches; the right half gets a copy of the
    /// attributes and the weight, and no branches.
    #[instrument(level = "debug", skip(self))]
    pub fn split_range(&mut self, id: NodeId, i: usize, cut: C) -> RangeResult<()> {
        let node = self.get_mut(id)?;
        let pos = segment_position(node, i)?;
        let segment = &node.segments[pos];
        if !segment.range.contains(&cut) || *segment.range.lower() == cut {
            return Err(RangeError::CutNotInSegment(i));
        }
        if let Some(capacity) = node.split_capacity {
            if node.segments.len() >= capacity {
                debug!("Rejecting split of segment {}, capacity {}", i, capacity);
                return Err(RangeError::SplitCapacityExceeded {
                    requested: node.segments.len() + 1,
                    capacity,
                });
            }
        }

        let left = Interval::new(
            segment.range.lower().clone(),
            segment.range.lower_bound(),
            cut.clone(),
            BoundType::Open,
        )?;
        let right = Interval::new(
            cut,
            BoundType::Closed,
            segment.range.upper().clone(),
            segment.range.upper_bound(),
        )?;
        let right_segment = Segment {
            range: right,
            attributes: segment.attributes.clone(),
            weight: segment.weight,
            branches: Vec::new(),
        };

        node.segments[pos].range = left;
        node.segments.insert(pos + 1, right_segment);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root(lower: i64, upper: i64) -> (RangeForest<String, i64>, NodeId) {
        let mut forest = RangeForest::new();
        let id = forest.insert_root(Interval::closed_open(lower, upper).unwrap());
        (forest, id)
    }

    #[test]
    fn given_new_root_when_inspected_then_single_segment_covers_range() {
        let (forest, id) = root(0, 100);
        let node = forest.node(id).unwrap();
        assert_eq!(node.level(), 1);
        assert_eq!(node.parent(), None);
        assert_eq!(node.size(), 1);
        assert_eq!(node.split_count(), 0);
        assert_eq!(node.segments()[0].range(), node.range());
    }

    #[test]
    fn given_released_branch_when_queried_then_node_not_found() {
        let (mut forest, id) = root(0, 100);
        forest.split_range(id, 1, 50).unwrap();
        let branch = forest.add_branch_at(id, 1, 60).unwrap();
        assert_eq!(forest.len(), 2);

        forest.merge_range(id, 1, 2).unwrap();

        assert_eq!(forest.len(), 1);
        assert_eq!(forest.size(branch), Err(RangeError::NodeNotFound(branch)));
    }

    #[test]
    fn given_nested_branches_when_root_removed_then_arena_empty() {
        let (mut forest, id) = root(0, 100);
        let child = forest
            .add_branch(id, Interval::closed_open(10, 20).unwrap())
            .unwrap();
        forest
            .add_branch(child, Interval::closed_open(12, 14).unwrap())
            .unwrap();
        assert_eq!(forest.len(), 3);

        assert_eq!(forest.remove_root(child), Err(RangeError::NotARoot(child)));
        forest.remove_root(id).unwrap();

        assert!(forest.is_empty());
    }

    #[test]
    fn given_settings_when_forest_creates_nodes_then_defaults_applied() {
        let settings = Settings {
            split_capacity: Some(4),
            branch_capacity: Some(2),
            default_weight: 0.5,
        };
        let mut forest: RangeForest<String, i64> = RangeForest::with_settings(settings);
        let id = forest.insert_root(Interval::closed(0, 10).unwrap());
        let node = forest.node(id).unwrap();

        assert_eq!(node.split_capacity(), Some(4));
        assert_eq!(node.branch_capacity(), Some(2));
        assert_eq!(node.segments()[0].weight(), 0.5);
    }
}
