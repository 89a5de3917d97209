//! Closure engine: configuration, executor and recurrence bundled for repeated runs

use std::time::Instant;

use serde::Serialize;
use tracing::debug;

use super::config::EngineConfig;
use super::dispatch::{Dispatcher, PhaseCounters, PhaseCounts, Step};
use super::element::Element;
use super::error::{Error, Result};
use super::executor::{ForkJoin, Rayon};
use super::interval::Interval;
use super::matrix::DistMatrix;
use super::policy::BasePolicy;
use super::recurrence::{MinPlus, Recurrence};

/// Result of one engine run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub dim: usize,
    pub block: usize,
    pub executor: &'static str,
    pub base_cases: PhaseCounts,
    pub elapsed_ms: f64,
}

/// Recursive blocked evaluator of the triangular recurrence
pub struct ClosureEngine<R = MinPlus, E = Rayon> {
    config: EngineConfig,
    recurrence: R,
    executor: E,
    pool: Option<rayon::ThreadPool>,
}

impl ClosureEngine<MinPlus, Rayon> {
    /// Min-plus engine on rayon
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let pool = match config.threads {
            Some(threads) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("butterfly-closure-{i}"))
                    .build()
                    .map_err(|e| Error::InvalidInput(format!("thread pool: {e}")))?,
            ),
            None => None,
        };
        Ok(Self {
            config,
            recurrence: MinPlus,
            executor: Rayon,
            pool,
        })
    }
}

impl<R, E> ClosureEngine<R, E> {
    pub fn with_recurrence<R2>(self, recurrence: R2) -> ClosureEngine<R2, E> {
        ClosureEngine {
            config: self.config,
            recurrence,
            executor: self.executor,
            pool: self.pool,
        }
    }

    pub fn with_executor<E2: ForkJoin>(self, executor: E2) -> ClosureEngine<R, E2> {
        ClosureEngine {
            config: self.config,
            recurrence: self.recurrence,
            executor,
            pool: self.pool,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn recurrence(&self) -> &R {
        &self.recurrence
    }
}

impl<R, E> ClosureEngine<R, E>
where
    E: ForkJoin,
{
    /// Evaluate the recurrence over the whole matrix
    pub fn run<T>(&self, matrix: &mut DistMatrix<T>) -> RunSummary
    where
        T: Element,
        R: Recurrence<T>,
    {
        let full = Interval::new(0, matrix.dim());
        self.execute(matrix, Step::Diagonal(full))
    }

    /// Evaluate the recurrence restricted to the diagonal block `interval × interval`
    pub fn run_interval<T>(
        &self,
        matrix: &mut DistMatrix<T>,
        interval: impl Into<Interval>,
    ) -> Result<RunSummary>
    where
        T: Element,
        R: Recurrence<T>,
    {
        self.run_step(matrix, Step::Diagonal(interval.into()))
    }

    /// Evaluate a single recursive call.
    ///
    /// Steps whose pivot does not lie before the block they write are rejected, since their
    /// plans would let parallel siblings touch the same cells. Row, column and cross steps
    /// assume the blocks they read are already resolved; issuing them out of order is not
    /// detected.
    pub fn run_step<T>(&self, matrix: &mut DistMatrix<T>, step: Step) -> Result<RunSummary>
    where
        T: Element,
        R: Recurrence<T>,
    {
        let dim = matrix.dim();
        if let Some(bad) = step.intervals().into_iter().find(|i| i.end() > dim) {
            return Err(Error::IntervalOutOfRange {
                begin: bad.begin(),
                end: bad.end(),
                dim,
            });
        }
        if !step.is_well_formed() {
            return Err(Error::InvalidInput(format!(
                "{step:?}: pivot interval must precede the block it updates"
            )));
        }
        Ok(self.execute(matrix, step))
    }

    fn execute<T>(&self, matrix: &mut DistMatrix<T>, step: Step) -> RunSummary
    where
        T: Element,
        R: Recurrence<T>,
    {
        let start = Instant::now();
        let dim = matrix.dim();
        let counters = PhaseCounters::default();
        debug!(
            dim,
            block = self.config.block,
            executor = self.executor.name(),
            ?step,
            "closure run starting"
        );

        let dispatcher = Dispatcher {
            cells: matrix.shared(),
            policy: BasePolicy::new(self.config.block),
            parallel_cutoff: self.config.parallel_cutoff,
            recurrence: &self.recurrence,
            executor: &self.executor,
            counters: &counters,
        };
        match &self.pool {
            Some(pool) => pool.install(|| dispatcher.dispatch(step)),
            None => dispatcher.dispatch(step),
        }

        let summary = RunSummary {
            dim,
            block: self.config.block,
            executor: self.executor.name(),
            base_cases: counters.snapshot(),
            elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
        };
        debug!(
            elapsed_ms = summary.elapsed_ms,
            base_cases = summary.base_cases.total(),
            "closure run finished"
        );
        summary
    }
}
