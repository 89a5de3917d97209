//! Half-open index intervals over one matrix axis
//!
//! An [`Interval`] is `[begin, end)`. The recursion only ever creates intervals by splitting a
//! parent at its midpoint, so two siblings differ in size by at most one.
//!
//! Intervals convert to and from `(begin, end)` pairs and `Range<usize>`, so callers can hand
//! either form to the engine.

use std::ops::Range;

/// Half-open range `[begin, end)` of matrix indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Interval {
    begin: usize,
    end: usize,
}

impl Interval {
    /// Create `[begin, end)`. `begin > end` is a precondition violation.
    #[inline]
    pub fn new(begin: usize, end: usize) -> Self {
        debug_assert!(begin <= end, "interval [{begin}, {end}) is inverted");
        Self { begin, end }
    }

    #[inline]
    pub fn begin(&self) -> usize {
        self.begin
    }

    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.end - self.begin
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// `begin <= value < end`
    #[inline]
    pub fn contains(&self, value: usize) -> bool {
        value >= self.begin && value < self.end
    }

    /// Midpoint, rounded toward `begin`
    #[inline]
    pub fn mid(&self) -> usize {
        (self.begin + self.end) / 2
    }

    /// `[begin, mid)`
    #[inline]
    pub fn lower(&self) -> Self {
        Self::new(self.begin, self.mid())
    }

    /// `[mid, end)`
    #[inline]
    pub fn upper(&self) -> Self {
        Self::new(self.mid(), self.end)
    }

    /// Split at the midpoint into `(lower, upper)`
    #[inline]
    pub fn split(&self) -> (Self, Self) {
        (self.lower(), self.upper())
    }

    /// Join two adjacent intervals into `[lower.begin, upper.end)`.
    ///
    /// Adjacency (`lower.end == upper.begin`) is the caller's contract.
    #[inline]
    pub fn union(lower: Self, upper: Self) -> Self {
        debug_assert_eq!(lower.end, upper.begin, "union of non-adjacent intervals");
        Self::new(lower.begin, upper.end)
    }

    /// True when every index of `self` is smaller than every index of `other`
    #[inline]
    pub fn precedes(&self, other: &Self) -> bool {
        self.end <= other.begin
    }

    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.begin..self.end
    }

    /// `(begin, end)` pair form
    #[inline]
    pub fn bounds(&self) -> (usize, usize) {
        (self.begin, self.end)
    }
}

impl From<(usize, usize)> for Interval {
    fn from((begin, end): (usize, usize)) -> Self {
        Self::new(begin, end)
    }
}

impl From<Interval> for (usize, usize) {
    fn from(interval: Interval) -> Self {
        interval.bounds()
    }
}

impl From<Range<usize>> for Interval {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl From<Interval> for Range<usize> {
    fn from(interval: Interval) -> Self {
        interval.range()
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.begin, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_covers_parent() {
        for begin in 0..20 {
            for end in begin..40 {
                let parent = Interval::new(begin, end);
                let (lo, hi) = parent.split();

                assert_eq!(lo.begin(), parent.begin());
                assert_eq!(hi.end(), parent.end());
                assert_eq!(lo.end(), hi.begin());
                assert_eq!(lo.size() + hi.size(), parent.size());
                // Midpoint rounds toward begin
                assert!(lo.size() <= hi.size());
                assert!(hi.size() - lo.size() <= 1);
            }
        }
    }

    #[test]
    fn test_union_inverts_split() {
        let parent = Interval::new(3, 10);
        let (lo, hi) = parent.split();
        assert_eq!(Interval::union(lo, hi), parent);
    }

    #[test]
    fn test_contains_is_half_open() {
        let i = Interval::new(2, 5);
        assert!(!i.contains(1));
        assert!(i.contains(2));
        assert!(i.contains(4));
        assert!(!i.contains(5));
        assert!(!Interval::new(3, 3).contains(3));
    }

    #[test]
    fn test_pair_and_range_forms() {
        let from_pair: Interval = (4, 9).into();
        let from_range: Interval = (4..9).into();
        assert_eq!(from_pair, from_range);

        let (b, e): (usize, usize) = from_pair.into();
        assert_eq!((b, e), (4, 9));

        let r: Range<usize> = from_range.into();
        assert_eq!(r, 4..9);
        assert_eq!(from_pair.to_string(), "[4, 9)");
    }

    #[test]
    fn test_precedes() {
        let (lo, hi) = Interval::new(0, 8).split();
        assert!(lo.precedes(&hi));
        assert!(!hi.precedes(&lo));
    }
}
