//! Recursive dispatcher
//!
//! A [`Step`] is one recursive call. A step that is not a base case expands into a [`Plan`]:
//! an ordered list of stages. Stages run strictly one after another; the steps inside one
//! stage write disjoint blocks and read nothing another step of the same stage writes, so
//! they are forked onto the executor.
//!
//! Splitting `I` into `I0 | I1` (and likewise `J`, `K`):
//!
//! ```text
//! Diagonal(I)        [Diagonal(I0)]
//!                    [Row(I0 -> I1), Column(I1 <- I0)]
//!                    [Cross(I1, I1; I0)]
//!                    [Diagonal(I1)]
//!
//! Row(K -> J)        [Row(K0 -> J0), Row(K0 -> J1)]
//!                    [Cross(K1, J0; K0), Cross(K1, J1; K0)]
//!                    [Row(K1 -> J0), Row(K1 -> J1)]
//!
//! Column(I <- K)     [Column(I0 <- K0), Column(I1 <- K0)]
//!                    [Cross(I0, K1; K0), Cross(I1, K1; K0)]
//!                    [Column(I0 <- K1), Column(I1 <- K1)]
//!
//! Cross(I, J; K)     [Cross(Ia, Jb; K0) for a, b in {0, 1}]
//!                    [Cross(Ia, Jb; K1) for a, b in {0, 1}]
//! ```
//!
//! Every `Row`/`Column` step relies on its pivot block `K × K` being fully resolved, and every
//! `Cross` step on `I × K` and `K × J` being final for the pivots in `K`.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use super::element::Element;
use super::executor::ForkJoin;
use super::interval::Interval;
use super::kernel::{self, Phase};
use super::matrix::SharedCells;
use super::policy::BasePolicy;
use super::recurrence::Recurrence;
use super::tile::Tile;

/// One recursive call of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Resolve `I × I` against pivots in `I`
    Diagonal(Interval),
    /// Update `pivot × dependent` from the resolved block `pivot × pivot`
    Row {
        pivot: Interval,
        dependent: Interval,
    },
    /// Update `dependent × pivot` from the resolved block `pivot × pivot`
    Column {
        dependent: Interval,
        pivot: Interval,
    },
    /// Fold pivots that precede both axes into `rows × cols`
    Cross {
        rows: Interval,
        cols: Interval,
        pivot: Interval,
    },
}

impl Step {
    pub fn row(pivot: Interval, dependent: Interval) -> Self {
        Step::Row { pivot, dependent }
    }

    pub fn column(dependent: Interval, pivot: Interval) -> Self {
        Step::Column { dependent, pivot }
    }

    pub fn cross(rows: Interval, cols: Interval, pivot: Interval) -> Self {
        Step::Cross { rows, cols, pivot }
    }

    /// Two-interval dispatch: the earlier interval is the pivot.
    ///
    /// `pair(I0, I1)` is a row update (pivot first), `pair(I1, I0)` a column update
    /// (pivot second). Overlapping intervals give a step that fails [`Step::is_well_formed`].
    pub fn pair(first: impl Into<Interval>, second: impl Into<Interval>) -> Self {
        let (first, second) = (first.into(), second.into());
        debug_assert!(
            first.precedes(&second) || second.precedes(&first),
            "pair dispatch over overlapping intervals {first} and {second}"
        );
        if first.precedes(&second) {
            Step::row(first, second)
        } else {
            Step::column(first, second)
        }
    }

    /// Whether the pivot interval lies entirely before the block the step writes.
    ///
    /// Plans only keep sibling steps disjoint for well-formed steps. Steps with an empty
    /// interval touch no cells and always qualify.
    pub fn is_well_formed(&self) -> bool {
        if self.intervals().iter().any(Interval::is_empty) {
            return true;
        }
        match *self {
            Step::Diagonal(_) => true,
            Step::Row { pivot, dependent } | Step::Column { dependent, pivot } => {
                pivot.precedes(&dependent)
            }
            Step::Cross { rows, cols, pivot } => pivot.precedes(&rows) && pivot.precedes(&cols),
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            Step::Diagonal(_) => Phase::Diagonal,
            Step::Row { .. } => Phase::Row,
            Step::Column { .. } => Phase::Column,
            Step::Cross { .. } => Phase::Cross,
        }
    }

    pub fn intervals(&self) -> Vec<Interval> {
        match *self {
            Step::Diagonal(i) => vec![i],
            Step::Row { pivot, dependent } => vec![pivot, dependent],
            Step::Column { dependent, pivot } => vec![dependent, pivot],
            Step::Cross { rows, cols, pivot } => vec![rows, cols, pivot],
        }
    }

    pub fn is_base(&self, policy: &BasePolicy) -> bool {
        match *self {
            Step::Diagonal(i) => policy.is_base(i),
            Step::Row { pivot, dependent } => policy.is_base_pair(pivot, dependent),
            Step::Column { dependent, pivot } => policy.is_base_pair(dependent, pivot),
            Step::Cross { rows, cols, pivot } => policy.is_base_triple(rows, cols, pivot),
        }
    }

    /// Smallest participating interval
    pub fn min_size(&self) -> usize {
        match *self {
            Step::Diagonal(i) => i.size(),
            Step::Row { pivot, dependent } => pivot.size().min(dependent.size()),
            Step::Column { dependent, pivot } => dependent.size().min(pivot.size()),
            Step::Cross { rows, cols, pivot } => rows.size().min(cols.size()).min(pivot.size()),
        }
    }

    /// Expand into ordered stages of independent sub-steps
    pub fn plan(&self) -> Plan {
        let stages = match *self {
            Step::Diagonal(i) => {
                let (i0, i1) = i.split();
                vec![
                    vec![Step::Diagonal(i0)],
                    vec![Step::pair(i0, i1), Step::pair(i1, i0)],
                    vec![Step::cross(i1, i1, i0)],
                    vec![Step::Diagonal(i1)],
                ]
            }
            Step::Row { pivot, dependent } => {
                let (k0, k1) = pivot.split();
                let (j0, j1) = dependent.split();
                vec![
                    vec![Step::pair(k0, j0), Step::pair(k0, j1)],
                    vec![Step::cross(k1, j0, k0), Step::cross(k1, j1, k0)],
                    vec![Step::pair(k1, j0), Step::pair(k1, j1)],
                ]
            }
            Step::Column { dependent, pivot } => {
                let (i0, i1) = dependent.split();
                let (k0, k1) = pivot.split();
                vec![
                    vec![Step::pair(i0, k0), Step::pair(i1, k0)],
                    vec![Step::cross(i0, k1, k0), Step::cross(i1, k1, k0)],
                    vec![Step::pair(i0, k1), Step::pair(i1, k1)],
                ]
            }
            Step::Cross { rows, cols, pivot } => {
                let (i0, i1) = rows.split();
                let (j0, j1) = cols.split();
                let (k0, k1) = pivot.split();
                let quadrants = |k: Interval| {
                    vec![
                        Step::cross(i0, j0, k),
                        Step::cross(i0, j1, k),
                        Step::cross(i1, j0, k),
                        Step::cross(i1, j1, k),
                    ]
                };
                vec![quadrants(k0), quadrants(k1)]
            }
        };
        Plan { stages }
    }
}

/// Ordered stages; steps within a stage are independent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    stages: Vec<Vec<Step>>,
}

impl Plan {
    pub fn stages(&self) -> &[Vec<Step>] {
        &self.stages
    }
}

/// Base-case kernel invocations per phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseCounts {
    pub diagonal: u64,
    pub row: u64,
    pub column: u64,
    pub cross: u64,
}

impl PhaseCounts {
    pub fn total(&self) -> u64 {
        Phase::ALL.iter().map(|&phase| self.get(phase)).sum()
    }

    pub fn get(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Diagonal => self.diagonal,
            Phase::Row => self.row,
            Phase::Column => self.column,
            Phase::Cross => self.cross,
        }
    }
}

/// Shared counters behind [`PhaseCounts`]; bumped from many worker threads
#[derive(Debug, Default)]
pub(crate) struct PhaseCounters {
    diagonal: AtomicU64,
    row: AtomicU64,
    column: AtomicU64,
    cross: AtomicU64,
}

impl PhaseCounters {
    fn record(&self, phase: Phase) {
        let counter = match phase {
            Phase::Diagonal => &self.diagonal,
            Phase::Row => &self.row,
            Phase::Column => &self.column,
            Phase::Cross => &self.cross,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> PhaseCounts {
        PhaseCounts {
            diagonal: self.diagonal.load(Ordering::Relaxed),
            row: self.row.load(Ordering::Relaxed),
            column: self.column.load(Ordering::Relaxed),
            cross: self.cross.load(Ordering::Relaxed),
        }
    }
}

/// Drives one computation over a shared matrix view
pub(crate) struct Dispatcher<'a, T, R: ?Sized, E> {
    pub(crate) cells: SharedCells<'a, T>,
    pub(crate) policy: BasePolicy,
    pub(crate) parallel_cutoff: usize,
    pub(crate) recurrence: &'a R,
    pub(crate) executor: &'a E,
    pub(crate) counters: &'a PhaseCounters,
}

impl<T, R, E> Dispatcher<'_, T, R, E>
where
    T: Element,
    R: Recurrence<T> + ?Sized,
    E: ForkJoin,
{
    /// Evaluate `step` to completion, including everything it forks.
    pub(crate) fn dispatch(&self, step: Step) {
        if step.is_base(&self.policy) {
            self.base_case(step);
            return;
        }

        let plan = step.plan();
        tracing::trace!(?step, stages = plan.stages().len(), "expand");

        let fork = step.min_size() >= self.parallel_cutoff;
        for stage in plan.stages() {
            self.run_stage(stage, fork);
        }
    }

    fn run_stage(&self, steps: &[Step], fork: bool) {
        match steps {
            [] => {}
            [only] => self.dispatch(*only),
            _ if !fork => {
                for step in steps {
                    self.dispatch(*step);
                }
            }
            _ => {
                let (left, right) = steps.split_at(steps.len() / 2);
                self.executor.join(
                    || self.run_stage(left, fork),
                    || self.run_stage(right, fork),
                );
            }
        }
    }

    fn base_case(&self, step: Step) {
        self.counters.record(step.phase());
        let block = self.policy.block();
        let cells = self.cells;

        // SAFETY: the plan guarantees this step owns the block it writes and that nothing it
        // reads is written by a concurrently running step.
        unsafe {
            match step {
                Step::Diagonal(i) => {
                    let mut x = Tile::stage_shared(cells, i, i, block);
                    kernel::diagonal(&mut x, self.recurrence);
                    x.unstage_shared(cells);
                }
                Step::Row { pivot, dependent } => {
                    let p = Tile::stage_shared(cells, pivot, pivot, block);
                    let mut x = Tile::stage_shared(cells, pivot, dependent, block);
                    kernel::row(&mut x, &p, self.recurrence);
                    x.unstage_shared(cells);
                }
                Step::Column { dependent, pivot } => {
                    let p = Tile::stage_shared(cells, pivot, pivot, block);
                    let mut x = Tile::stage_shared(cells, dependent, pivot, block);
                    kernel::column(&mut x, &p, self.recurrence);
                    x.unstage_shared(cells);
                }
                Step::Cross { rows, cols, pivot } => {
                    let left = Tile::stage_shared(cells, rows, pivot, block);
                    let right = Tile::stage_shared(cells, pivot, cols, block);
                    let mut x = Tile::stage_shared(cells, rows, cols, block);
                    kernel::cross(&mut x, &left, &right, self.recurrence);
                    x.unstage_shared(cells);
                }
            }
        }
    }
}
