//! Simulator: replays a trace through one cache.
//!
//! Operations are processed strictly in trace order, each to completion
//! before the next, since ordering decides recency and therefore which lines
//! are evicted. The first malformed trace line stops the run.

use tracing::debug;

use crate::cache::{CacheSim, Outcome};
use crate::common::error::{ConfigError, SimError, TraceError};
use crate::config::CacheConfig;
use crate::stats::FinalStats;
use crate::trace::MemoryOperation;

/// Top-level simulator: the cache plus a count of replayed operations.
#[derive(Debug, Clone)]
pub struct Simulator {
    /// The simulated cache.
    pub cache: CacheSim,
    operations: u64,
}

impl Simulator {
    /// Creates a simulator with an empty cache.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the geometry is invalid.
    pub fn new(config: &CacheConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            cache: CacheSim::new(config)?,
            operations: 0,
        })
    }

    /// Number of operations replayed so far.
    pub fn operations(&self) -> u64 {
        self.operations
    }

    /// Replays a single operation.
    pub fn step(&mut self, op: MemoryOperation) -> Outcome {
        self.operations += 1;
        self.cache.process(op)
    }

    /// Replays a whole trace and returns the final statistics.
    ///
    /// # Errors
    ///
    /// Returns the first [`TraceError`] produced by `ops`; operations before it
    /// have already been applied to the cache.
    pub fn run<I>(&mut self, ops: I) -> Result<FinalStats, SimError>
    where
        I: IntoIterator<Item = Result<MemoryOperation, TraceError>>,
    {
        self.run_with(ops, |_, _| {})
    }

    /// Replays a whole trace, calling `observer` after every operation.
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run).
    pub fn run_with<I, F>(&mut self, ops: I, mut observer: F) -> Result<FinalStats, SimError>
    where
        I: IntoIterator<Item = Result<MemoryOperation, TraceError>>,
        F: FnMut(&MemoryOperation, &Outcome),
    {
        for op in ops {
            let op = op?;
            let outcome = self.step(op);
            observer(&op, &outcome);
        }
        debug!(operations = self.operations, "trace exhausted");
        Ok(self.cache.finalize())
    }
}

/// Builds a cache for `config`, replays `ops` and returns the final statistics.
///
/// # Errors
///
/// Returns [`SimError::Config`] for an invalid geometry (nothing is simulated)
/// or [`SimError::Trace`] for the first malformed operation.
///
/// # Examples
///
/// ```
/// use csim_core::config::CacheConfig;
/// use csim_core::sim::simulate;
/// use csim_core::trace::TraceReader;
///
/// let trace = TraceReader::from_text("L 0,1\nL 1,1\nL 0,1\n");
/// let stats = simulate(&CacheConfig::new(0, 2, 0), trace).unwrap();
/// assert_eq!((stats.hits, stats.misses, stats.evictions), (1, 2, 0));
/// ```
pub fn simulate<I>(config: &CacheConfig, ops: I) -> Result<FinalStats, SimError>
where
    I: IntoIterator<Item = Result<MemoryOperation, TraceError>>,
{
    Simulator::new(config)?.run(ops)
}
