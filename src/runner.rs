//! Trace Runner
//!
//! Drives a whole trace through a fresh [`HybridCache`] and assembles the
//! [`Report`]. Every run builds its own cache, so a `TraceRunner` can be
//! reused and shared freely.
//!
//! When `record_steps` is set, each access leaves behind an immutable
//! [`Step`] holding a copy of the grid and chains as they stood right after
//! the access, before any rebuild it triggered.

extern crate alloc;

use crate::cache::HybridCache;
use crate::config::EngineConfig;
use crate::error::SimError;
use crate::resolver::{AccessKind, Location};
use crate::Key;
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Snapshot of one access, for visualization.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Step {
    /// The key that was accessed.
    pub address: Key,
    /// `hit` or `miss`.
    pub result: AccessKind,
    /// Where the access was resolved.
    pub location: Location,
    /// Row-major grid contents, `None` for empty slots.
    pub cache: Vec<Option<Key>>,
    /// Chained keys, row-major by cell then in chain order.
    pub chained: Vec<Key>,
    /// Whether this access triggered a rebuild.
    pub rehashed: bool,
}

/// Result of one simulation run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Report {
    /// Accesses that found their key resident.
    pub hits: u64,
    /// Accesses that stored a new key.
    pub misses: u64,
    /// Misses stored away from the key's primary slot.
    pub collisions: u64,
    /// Hits found by quadratic or double probing.
    pub probe_hits: u64,
    /// Misses stored by quadratic or double probing.
    pub probe_misses: u64,
    /// Hits found in a chain.
    pub chain_hits: u64,
    /// Misses appended to a chain.
    pub chain_misses: u64,
    /// Load factor of the final table.
    pub load_factor: f64,
    /// Number of rebuilds during the run.
    pub rehashes: u64,
    /// Grid side of the final table.
    pub dimension: usize,
    /// Per-access snapshots; empty when step recording is off.
    pub steps: Vec<Step>,
}

impl Report {
    /// Iterates the recorded steps in trace order. Can be called any number
    /// of times.
    pub fn steps(&self) -> core::slice::Iter<'_, Step> {
        self.steps.iter()
    }

    /// Total accesses.
    #[inline]
    pub fn requests(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of accesses that hit.
    pub fn hit_rate(&self) -> f64 {
        match self.requests() {
            0 => 0.0,
            n => self.hits as f64 / n as f64,
        }
    }
}

/// Runs traces with a fixed configuration.
///
/// # Examples
///
/// ```
/// use hybrid_cache::{TraceRunner, EngineConfig};
///
/// let runner = TraceRunner::new(EngineConfig::default());
/// let report = runner.run(&[4, 8, 4]).unwrap();
/// assert_eq!(report.hits, 1);
/// assert_eq!(report.misses, 2);
/// assert_eq!(report.steps().count(), 3);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TraceRunner {
    config: EngineConfig,
}

impl TraceRunner {
    /// Creates a runner. The configuration is validated on each run.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Configuration every run uses.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Simulates `keys` in order on a fresh cache.
    ///
    /// Fails with [`SimError::EmptyTrace`] for an empty slice and with
    /// [`SimError::InvalidConfig`] if the configuration does not validate.
    pub fn run(&self, keys: &[Key]) -> Result<Report, SimError> {
        if keys.is_empty() {
            return Err(SimError::EmptyTrace);
        }
        let mut cache = HybridCache::init(self.config)?;
        tracing::debug!(
            keys = keys.len(),
            dimension = cache.dimension(),
            "trace run: start"
        );

        let mut steps = Vec::new();
        if self.config.record_steps {
            steps.reserve_exact(keys.len());
        }

        for &key in keys {
            if !self.config.record_steps {
                cache.access(key);
                continue;
            }
            // snapshot before the growth check so the step shows the table
            // the access actually landed in
            let outcome = cache.access_deferred(key);
            let table = cache.table();
            let mut step = Step {
                address: key,
                result: outcome.kind,
                location: outcome.location,
                cache: table.grid_snapshot(),
                chained: table.chained_keys(),
                rehashed: false,
            };
            step.rehashed = cache.finish_access(outcome);
            steps.push(step);
        }

        let metrics = *cache.metrics();
        let report = Report {
            hits: metrics.hits,
            misses: metrics.misses,
            collisions: metrics.collisions,
            probe_hits: metrics.probe_hits,
            probe_misses: metrics.probe_misses,
            chain_hits: metrics.chain_hits,
            chain_misses: metrics.chain_misses,
            load_factor: cache.load_factor(),
            rehashes: metrics.rehashes,
            dimension: cache.dimension(),
            steps,
        };
        tracing::debug!(
            hits = report.hits,
            misses = report.misses,
            collisions = report.collisions,
            rehashes = report.rehashes,
            dimension = report.dimension,
            "trace run: finished"
        );
        Ok(report)
    }
}
