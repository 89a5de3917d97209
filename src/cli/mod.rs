//! CLI-specific utilities for butterfly-closure
//!
//! This module contains code specific to the command-line interface,
//! separate from the core library functionality.

pub mod progress;
pub mod report;

pub use progress::ProgressManager;
pub use report::{BenchReport, LatencySummary};

use anyhow::{Context, Result};
use butterfly_closure::{
    ClosureEngine, DistMatrix, EngineConfig, MaxMin, MinPlus, Rayon, Recurrence, RunSummary,
    Sequential,
};
use clap::{Args, ValueEnum};
use serde::Serialize;

/// Element type used by the command-line tools
pub type Weight = i64;

/// Combine operator selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecurrenceKind {
    /// Shortest path (min over sums)
    MinPlus,
    /// Widest path (max over bottlenecks)
    MaxMin,
}

impl RecurrenceKind {
    fn boxed(self) -> Box<dyn Recurrence<Weight>> {
        match self {
            RecurrenceKind::MinPlus => Box::new(MinPlus),
            RecurrenceKind::MaxMin => Box::new(MaxMin),
        }
    }
}

/// Engine flags shared by all subcommands
#[derive(Debug, Clone, Args)]
pub struct EngineArgs {
    /// Base-case threshold (overrides BUTTERFLY_BLOCK, default 64)
    #[arg(short, long)]
    pub block: Option<usize>,

    /// Smallest interval that still forks parallel tasks (overrides BUTTERFLY_PARALLEL_CUTOFF)
    #[arg(long)]
    pub parallel_cutoff: Option<usize>,

    /// Worker threads (overrides BUTTERFLY_THREADS, default: one per CPU)
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Run every task on the calling thread
    #[arg(long)]
    pub sequential: bool,

    /// Combine operator
    #[arg(long, value_enum, default_value_t = RecurrenceKind::MinPlus)]
    pub recurrence: RecurrenceKind,
}

impl EngineArgs {
    /// Environment first, then flags
    pub fn config(&self) -> Result<EngineConfig> {
        let mut config = EngineConfig::from_env().context("Invalid BUTTERFLY_* environment")?;
        if let Some(block) = self.block {
            config.block = block;
        }
        if let Some(cutoff) = self.parallel_cutoff {
            config.parallel_cutoff = cutoff;
        }
        if self.threads.is_some() {
            config.threads = self.threads;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn build(&self) -> Result<Engine> {
        let config = self.config()?;
        let threads = config.threads.unwrap_or_else(num_cpus::get);
        let engine = ClosureEngine::new(config)
            .context("Failed to build engine")?
            .with_recurrence(self.recurrence.boxed());

        Ok(if self.sequential {
            Engine::Sequential(engine.with_executor(Sequential))
        } else {
            tracing::debug!(threads, "using rayon executor");
            Engine::Parallel(engine)
        })
    }
}

/// Engine with the executor picked at runtime
pub enum Engine {
    Parallel(ClosureEngine<Box<dyn Recurrence<Weight>>, Rayon>),
    Sequential(ClosureEngine<Box<dyn Recurrence<Weight>>, Sequential>),
}

impl Engine {
    pub fn run(&self, matrix: &mut DistMatrix<Weight>) -> RunSummary {
        match self {
            Engine::Parallel(engine) => engine.run(matrix),
            Engine::Sequential(engine) => engine.run(matrix),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        match self {
            Engine::Parallel(engine) => engine.config(),
            Engine::Sequential(engine) => engine.config(),
        }
    }

    pub fn recurrence(&self) -> &dyn Recurrence<Weight> {
        match self {
            Engine::Parallel(engine) => &**engine.recurrence(),
            Engine::Sequential(engine) => &**engine.recurrence(),
        }
    }
}

/// Recompute with the plain triple loop and compare
pub fn verify(
    engine: &Engine,
    input: &DistMatrix<Weight>,
    result: &DistMatrix<Weight>,
) -> Result<()> {
    let mut expected = input.clone();
    butterfly_closure::relax_naive(&mut expected, engine.recurrence());

    if let Some((i, j)) = butterfly_closure::core::reference::first_difference(&expected, result) {
        anyhow::bail!(
            "Verification failed at cell ({i}, {j}): engine produced {}, reference produced {}",
            result.get(i, j),
            expected.get(i, j)
        );
    }
    Ok(())
}
