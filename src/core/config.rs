//! Engine configuration
//!
//! Defaults, then environment (`BUTTERFLY_BLOCK`, `BUTTERFLY_PARALLEL_CUTOFF`,
//! `BUTTERFLY_THREADS`), then whatever the caller sets explicitly.

use serde::{Deserialize, Serialize};

use super::error::{Error, Result};

/// Default base-case threshold
pub const DEFAULT_BLOCK: usize = 64;

/// Intervals smaller than this run their stage on the calling thread
pub const DEFAULT_PARALLEL_CUTOFF: usize = 128;

pub const ENV_BLOCK: &str = "BUTTERFLY_BLOCK";
pub const ENV_PARALLEL_CUTOFF: &str = "BUTTERFLY_PARALLEL_CUTOFF";
pub const ENV_THREADS: &str = "BUTTERFLY_THREADS";

/// Configuration for one engine; read-only while a computation runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Base-case threshold `B`: intervals of at most this size are evaluated directly
    pub block: usize,

    /// Minimum interval size for which independent sub-calls are forked
    pub parallel_cutoff: usize,

    /// Worker threads for a dedicated pool; `None` uses the global rayon pool
    pub threads: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            block: DEFAULT_BLOCK,
            parallel_cutoff: DEFAULT_PARALLEL_CUTOFF,
            threads: None,
        }
    }
}

impl EngineConfig {
    pub fn with_block(mut self, block: usize) -> Self {
        self.block = block;
        self
    }

    pub fn with_parallel_cutoff(mut self, cutoff: usize) -> Self {
        self.parallel_cutoff = cutoff;
        self
    }

    pub fn with_threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.block == 0 {
            return Err(Error::InvalidBlockSize(self.block));
        }
        if self.parallel_cutoff == 0 {
            return Err(Error::InvalidParallelCutoff(self.parallel_cutoff));
        }
        if self.threads == Some(0) {
            return Err(Error::InvalidInput("thread count must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Defaults overlaid with the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(block) = parse_var(&lookup, ENV_BLOCK)? {
            config.block = block;
        }
        if let Some(cutoff) = parse_var(&lookup, ENV_PARALLEL_CUTOFF)? {
            config.parallel_cutoff = cutoff;
        }
        if let Some(threads) = parse_var(&lookup, ENV_THREADS)? {
            config.threads = Some(threads);
        }
        config.validate()?;
        Ok(config)
    }
}

fn parse_var(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<usize>> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|e| Error::InvalidInput(format!("{key}={raw:?}: {e}"))),
    }
}
