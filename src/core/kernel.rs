//! Base-case kernels
//!
//! Each kernel walks its pivots `k` in ascending order and, for each pivot, sweeps the block it
//! owns with a fixed [`DirectionPair`]: the outer loop walks tile columns, the inner loop walks
//! tile rows, which is the contiguous direction of a staged [`Tile`]. Cells updated for one pivot
//! feed later pivots, so the ascending pivot order is what the result depends on.
//!
//! For a fixed pivot the swept cells are never read (row `k` and column `k` lie outside the
//! sweep), so the [`DirectionPair`] only fixes the memory access order. Any pair gives the same
//! matrix.
//!
//! | Phase | Block written | Pivot read from | outer | inner |
//! |-------|---------------|-----------------|-------|-------|
//! | Diagonal (A) | `I × I` | itself | forward | forward |
//! | Row (B) | `K × J` | `K × K` and itself | backward | forward |
//! | Column (C) | `I × K` | `K × K` and itself | forward | forward |
//! | Cross (D) | `I × J` | `I × K`, `K × J` | forward | forward |

use serde::{Deserialize, Serialize};

use super::element::Element;
use super::recurrence::Recurrence;
use super::tile::Tile;

/// Iteration direction along one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Sweep directions for one pivot: `outer` over columns, `inner` over rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionPair {
    pub outer: Direction,
    pub inner: Direction,
}

/// Recursive call family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Diagonal block, pivots from the block itself
    Diagonal,
    /// Block right of a resolved diagonal block (pivot first)
    Row,
    /// Block below a resolved diagonal block (pivot second)
    Column,
    /// Off-diagonal block folding in pivots that precede both of its axes
    Cross,
}

impl Phase {
    pub const ALL: [Phase; 4] = [Phase::Diagonal, Phase::Row, Phase::Column, Phase::Cross];

    pub fn directions(self) -> DirectionPair {
        use Direction::*;
        let (outer, inner) = match self {
            Phase::Diagonal => (Forward, Forward),
            Phase::Row => (Backward, Forward),
            Phase::Column => (Forward, Forward),
            Phase::Cross => (Forward, Forward),
        };
        DirectionPair { outer, inner }
    }

    pub fn name(self) -> &'static str {
        match self {
            Phase::Diagonal => "diagonal",
            Phase::Row => "row",
            Phase::Column => "column",
            Phase::Cross => "cross",
        }
    }
}

#[inline(always)]
fn walk(direction: Direction, lo: usize, hi: usize, mut body: impl FnMut(usize)) {
    match direction {
        Direction::Forward => {
            for x in lo..hi {
                body(x)
            }
        }
        Direction::Backward => {
            for x in (lo..hi).rev() {
                body(x)
            }
        }
    }
}

#[inline(always)]
fn sweep(
    dirs: DirectionPair,
    rows: (usize, usize),
    cols: (usize, usize),
    mut body: impl FnMut(usize, usize),
) {
    walk(dirs.outer, cols.0, cols.1, |j| {
        walk(dirs.inner, rows.0, rows.1, |i| body(i, j))
    });
}

/// Phase A: resolve a diagonal tile `I × I` against its own pivots
pub fn diagonal<T, R>(x: &mut Tile<T>, recurrence: &R)
where
    T: Element,
    R: Recurrence<T> + ?Sized,
{
    diagonal_with(x, recurrence, Phase::Diagonal.directions());
}

fn diagonal_with<T, R>(x: &mut Tile<T>, recurrence: &R, dirs: DirectionPair)
where
    T: Element,
    R: Recurrence<T> + ?Sized,
{
    debug_assert_eq!(x.rows(), x.cols());
    let block = x.rows();

    for k in block.range() {
        let rest = (k + 1, block.end());
        sweep(dirs, rest, rest, |i, j| {
            let v = recurrence.relax(x.get(i, j), x.get(i, k), x.get(k, j));
            x.set(i, j, v);
        });
    }
}

/// Phase B: update `K × J` (right of the diagonal) from the resolved pivot tile `K × K`
pub fn row<T, R>(x: &mut Tile<T>, pivot: &Tile<T>, recurrence: &R)
where
    T: Element,
    R: Recurrence<T> + ?Sized,
{
    row_with(x, pivot, recurrence, Phase::Row.directions());
}

fn row_with<T, R>(x: &mut Tile<T>, pivot: &Tile<T>, recurrence: &R, dirs: DirectionPair)
where
    T: Element,
    R: Recurrence<T> + ?Sized,
{
    let pivots = pivot.rows();
    debug_assert_eq!(x.rows(), pivots);
    let cols = x.cols().bounds();

    for k in pivots.range() {
        sweep(dirs, (k + 1, pivots.end()), cols, |i, j| {
            let v = recurrence.relax(x.get(i, j), pivot.get(i, k), x.get(k, j));
            x.set(i, j, v);
        });
    }
}

/// Phase C: update `I × K` (below the diagonal) from the resolved pivot tile `K × K`
pub fn column<T, R>(x: &mut Tile<T>, pivot: &Tile<T>, recurrence: &R)
where
    T: Element,
    R: Recurrence<T> + ?Sized,
{
    column_with(x, pivot, recurrence, Phase::Column.directions());
}

fn column_with<T, R>(x: &mut Tile<T>, pivot: &Tile<T>, recurrence: &R, dirs: DirectionPair)
where
    T: Element,
    R: Recurrence<T> + ?Sized,
{
    let pivots = pivot.cols();
    debug_assert_eq!(x.cols(), pivots);
    let rows = x.rows().bounds();

    for k in pivots.range() {
        sweep(dirs, rows, (k + 1, pivots.end()), |i, j| {
            let v = recurrence.relax(x.get(i, j), x.get(i, k), pivot.get(k, j));
            x.set(i, j, v);
        });
    }
}

/// Phase D: fold pivots `K` into `I × J`, reading `left = I × K` and `right = K × J`
pub fn cross<T, R>(x: &mut Tile<T>, left: &Tile<T>, right: &Tile<T>, recurrence: &R)
where
    T: Element,
    R: Recurrence<T> + ?Sized,
{
    cross_with(x, left, right, recurrence, Phase::Cross.directions());
}

fn cross_with<T, R>(
    x: &mut Tile<T>,
    left: &Tile<T>,
    right: &Tile<T>,
    recurrence: &R,
    dirs: DirectionPair,
) where
    T: Element,
    R: Recurrence<T> + ?Sized,
{
    let pivots = left.cols();
    debug_assert_eq!(right.rows(), pivots);
    debug_assert_eq!(left.rows(), x.rows());
    debug_assert_eq!(right.cols(), x.cols());
    let (rows, cols) = (x.rows().bounds(), x.cols().bounds());

    for k in pivots.range() {
        sweep(dirs, rows, cols, |i, j| {
            let v = recurrence.relax(x.get(i, j), left.get(i, k), right.get(k, j));
            x.set(i, j, v);
        });
    }
}
