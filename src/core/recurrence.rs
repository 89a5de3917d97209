//! Combine operators for the triangular recurrence
//!
//! The engine evaluates, for ascending pivots `k` and every cell with `k < i` and `k < j`,
//!
//! ```text
//! M[i][j] = relax(M[i][j], M[i][k], M[k][j])
//! ```
//!
//! What `relax` means is up to the [`Recurrence`] implementation. The dependency structure
//! (and therefore the recursive schedule) is the same for all of them.

use std::ops::Add;

use super::element::{coalesce, guard, guard_with, Element};

/// Cell update applied once per `(pivot, cell)` pair
pub trait Recurrence<T: Element>: Sync {
    /// Fold the candidate built from `left = M[i][k]` and `right = M[k][j]` into `current`.
    fn relax(&self, current: T, left: T, right: T) -> T;
}

impl<T: Element, R: Recurrence<T> + ?Sized> Recurrence<T> for Box<R> {
    #[inline]
    fn relax(&self, current: T, left: T, right: T) -> T {
        (**self).relax(current, left, right)
    }
}

/// Shortest path: candidate `left + right`, keep the smaller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MinPlus;

impl<T> Recurrence<T> for MinPlus
where
    T: Element + Add<Output = T>,
{
    #[inline]
    fn relax(&self, current: T, left: T, right: T) -> T {
        let candidate = guard_with(left.is_defined() && right.is_defined(), || left + right);
        let improves = candidate.is_defined() && (!current.is_defined() || candidate < current);
        coalesce(guard(improves, candidate), current)
    }
}

/// Widest (bottleneck) path: candidate `min(left, right)`, keep the larger
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaxMin;

impl<T: Element> Recurrence<T> for MaxMin {
    #[inline]
    fn relax(&self, current: T, left: T, right: T) -> T {
        let narrowest = if left < right { left } else { right };
        let candidate = guard(left.is_defined() && right.is_defined(), narrowest);
        let improves = candidate.is_defined() && (!current.is_defined() || candidate > current);
        coalesce(guard(improves, candidate), current)
    }
}
