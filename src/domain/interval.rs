//! Intervals over a totally ordered type with open or closed ends.

use std::cmp::Ordering;
use std::fmt;

use crate::domain::error::{RangeError, RangeResult};

/// Whether an endpoint belongs to the interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundType {
    Open,
    Closed,
}

impl BoundType {
    pub fn is_closed(self) -> bool {
        self == BoundType::Closed
    }
}

/// A bounded interval `lower..upper` whose ends are each open or closed.
///
/// Immutable once built. `(a, a)` is rejected; `[a, a)` and `(a, a]` are
/// valid empty intervals and `[a, a]` is a single point.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Interval<C> {
    lower: C,
    lower_bound: BoundType,
    upper: C,
    upper_bound: BoundType,
}

impl<C: Ord + Clone> Interval<C> {
    pub fn new(
        lower: C,
        lower_bound: BoundType,
        upper: C,
        upper_bound: BoundType,
    ) -> RangeResult<Self> {
        match lower.cmp(&upper) {
            Ordering::Greater => return Err(RangeError::InvalidInterval),
            Ordering::Equal if lower_bound == BoundType::Open && upper_bound == BoundType::Open => {
                return Err(RangeError::InvalidInterval)
            }
            _ => {}
        }
        Ok(Self {
            lower,
            lower_bound,
            upper,
            upper_bound,
        })
    }

    /// `[lower, upper]`
    pub fn closed(lower: C, upper: C) -> RangeResult<Self> {
        Self::new(lower, BoundType::Closed, upper, BoundType::Closed)
    }

    /// `(lower, upper)`
    pub fn open(lower: C, upper: C) -> RangeResult<Self> {
        Self::new(lower, BoundType::Open, upper, BoundType::Open)
    }

    /// `[lower, upper)`
    pub fn closed_open(lower: C, upper: C) -> RangeResult<Self> {
        Self::new(lower, BoundType::Closed, upper, BoundType::Open)
    }

    /// `(lower, upper]`
    pub fn open_closed(lower: C, upper: C) -> RangeResult<Self> {
        Self::new(lower, BoundType::Open, upper, BoundType::Closed)
    }

    pub fn lower(&self) -> &C {
        &self.lower
    }

    pub fn lower_bound(&self) -> BoundType {
        self.lower_bound
    }

    pub fn upper(&self) -> &C {
        &self.upper
    }

    pub fn upper_bound(&self) -> BoundType {
        self.upper_bound
    }

    pub fn is_empty(&self) -> bool {
        self.lower == self.upper && !(self.lower_bound.is_closed() && self.upper_bound.is_closed())
    }

    pub fn contains(&self, value: &C) -> bool {
        let above_lower = match self.lower_bound {
            BoundType::Closed => self.lower <= *value,
            BoundType::Open => self.lower < *value,
        };
        let below_upper = match self.upper_bound {
            BoundType::Closed => *value <= self.upper,
            BoundType::Open => *value < self.upper,
        };
        above_lower && below_upper
    }

    /// True when every point of `other` is also a point of `self`.
    pub fn encloses(&self, other: &Interval<C>) -> bool {
        let lower_ok = match self.lower.cmp(&other.lower) {
            Ordering::Less => true,
            Ordering::Equal => self.lower_bound.is_closed() || !other.lower_bound.is_closed(),
            Ordering::Greater => false,
        };
        let upper_ok = match self.upper.cmp(&other.upper) {
            Ordering::Greater => true,
            Ordering::Equal => self.upper_bound.is_closed() || !other.upper_bound.is_closed(),
            Ordering::Less => false,
        };
        lower_ok && upper_ok
    }

    /// Smallest interval enclosing both `self` and `other`.
    pub fn span(&self, other: &Interval<C>) -> Interval<C> {
        let (lower, lower_bound) = match self.lower.cmp(&other.lower) {
            Ordering::Less => (self.lower.clone(), self.lower_bound),
            Ordering::Greater => (other.lower.clone(), other.lower_bound),
            Ordering::Equal => (self.lower.clone(), outermost(self.lower_bound, other.lower_bound)),
        };
        let (upper, upper_bound) = match self.upper.cmp(&other.upper) {
            Ordering::Greater => (self.upper.clone(), self.upper_bound),
            Ordering::Less => (other.upper.clone(), other.upper_bound),
            Ordering::Equal => (self.upper.clone(), outermost(self.upper_bound, other.upper_bound)),
        };
        Interval {
            lower,
            lower_bound,
            upper,
            upper_bound,
        }
    }
}

fn outermost(a: BoundType, b: BoundType) -> BoundType {
    if a.is_closed() || b.is_closed() {
        BoundType::Closed
    } else {
        BoundType::Open
    }
}

impl<C: fmt::Display> fmt::Display for Interval<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = match self.lower_bound {
            BoundType::Closed => '[',
            BoundType::Open => '(',
        };
        let close = match self.upper_bound {
            BoundType::Closed => ']',
            BoundType::Open => ')',
        };
        write!(f, "{}{}, {}{}", open, self.lower, self.upper, close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Interval::closed(0, 10).unwrap(), 0, true)]
    #[case(Interval::closed(0, 10).unwrap(), 10, true)]
    #[case(Interval::open(0, 10).unwrap(), 0, false)]
    #[case(Interval::open(0, 10).unwrap(), 10, false)]
    #[case(Interval::closed_open(0, 10).unwrap(), 10, false)]
    #[case(Interval::open_closed(0, 10).unwrap(), 10, true)]
    #[case(Interval::closed(0, 10).unwrap(), 11, false)]
    fn given_interval_when_contains_then_respects_bound_types(
        #[case] interval: Interval<i64>,
        #[case] value: i64,
        #[case] expected: bool,
    ) {
        assert_eq!(interval.contains(&value), expected);
    }

    #[test]
    fn given_inverted_endpoints_when_new_then_rejected() {
        assert_eq!(Interval::closed(5, 1), Err(RangeError::InvalidInterval));
        assert_eq!(Interval::open(3, 3), Err(RangeError::InvalidInterval));
        assert!(Interval::closed_open(3, 3).unwrap().is_empty());
        assert!(!Interval::closed(3, 3).unwrap().is_empty());
    }

    #[test]
    fn given_equal_endpoints_when_encloses_then_bound_types_decide() {
        let outer = Interval::closed_open(0, 100).unwrap();
        assert!(outer.encloses(&Interval::closed_open(10, 20).unwrap()));
        assert!(outer.encloses(&Interval::closed_open(0, 100).unwrap()));
        assert!(!outer.encloses(&Interval::closed(0, 100).unwrap()));
        assert!(Interval::closed(0, 100).unwrap().encloses(&outer));
        assert!(!Interval::open(0, 100).unwrap().encloses(&Interval::closed(0, 50).unwrap()));
    }

    #[test]
    fn given_two_intervals_when_span_then_outermost_bounds_win() {
        let a = Interval::closed_open(0, 30).unwrap();
        let b = Interval::closed_open(30, 60).unwrap();
        assert_eq!(a.span(&b), Interval::closed_open(0, 60).unwrap());

        let c = Interval::open_closed(0, 60).unwrap();
        assert_eq!(a.span(&c), Interval::closed(0, 60).unwrap());

        let disjoint = Interval::open(80, 90).unwrap();
        assert_eq!(a.span(&disjoint), Interval::closed_open(0, 90).unwrap());
    }

    #[test]
    fn given_interval_when_displayed_then_uses_bracket_notation() {
        assert_eq!(Interval::closed_open(0, 30).unwrap().to_string(), "[0, 30)");
        assert_eq!(Interval::open_closed(1, 2).unwrap().to_string(), "(1, 2]");
    }
}
