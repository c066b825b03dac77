//! One partition unit of a node's range.

use std::collections::BTreeMap;

use generational_arena::Index;

use crate::domain::attribute::AttributeValue;
use crate::domain::interval::Interval;

/// A contiguous piece of a node's range with its own attributes, weight
/// and child branches.
#[derive(Debug, Clone)]
pub struct Segment<C> {
    pub(crate) range: Interval<C>,
    pub(crate) attributes: BTreeMap<String, AttributeValue>,
    pub(crate) weight: f64,
    /// Arena indices of the branches owned by this segment
    pub(crate) branches: Vec<Index>,
}

impl<C> Segment<C> {
    pub(crate) fn new(range: Interval<C>, weight: f64) -> Self {
        Self {
            range,
            attributes: BTreeMap::new(),
            weight,
            branches: Vec::new(),
        }
    }

    pub fn range(&self) -> &Interval<C> {
        &self.range
    }

    pub fn attributes(&self) -> &BTreeMap<String, AttributeValue> {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn branches(&self) -> &[Index] {
        &self.branches
    }
}
