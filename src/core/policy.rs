//! Base-case admission policy

use super::interval::Interval;

/// Decides when recursion bottoms out into a direct kernel call.
///
/// A call over several intervals is a base case as soon as *any* participant is small enough,
/// so recursion depth follows whichever axis shrinks first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasePolicy {
    block: usize,
}

impl BasePolicy {
    pub fn new(block: usize) -> Self {
        debug_assert!(block > 0, "block threshold must be positive");
        Self { block }
    }

    pub fn block(&self) -> usize {
        self.block
    }

    #[inline]
    pub fn is_base(&self, interval: Interval) -> bool {
        interval.size() <= self.block
    }

    #[inline]
    pub fn is_base_pair(&self, a: Interval, b: Interval) -> bool {
        self.is_base(a) || self.is_base(b)
    }

    #[inline]
    pub fn is_base_triple(&self, a: Interval, b: Interval, c: Interval) -> bool {
        self.is_base(a) || self.is_base(b) || self.is_base(c)
    }
}
