// Data models for trace simulation

use hybrid_cache::{EngineConfig, HashScheme, Key, Report};
use serde::Serialize;
use std::fmt;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

/// Where the keys of a simulation come from
#[derive(Debug, Clone, PartialEq)]
pub enum TraceSource {
    /// A single trace file
    File(PathBuf),
    /// Keys given directly on the command line
    Inline(Vec<Key>),
    /// Every trace file in a directory, optionally filtered by a glob pattern
    Directory {
        dir: PathBuf,
        pattern: Option<String>,
    },
}

impl fmt::Display for TraceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceSource::File(path) => write!(f, "{}", path.display()),
            TraceSource::Inline(keys) => write!(f, "<{} inline keys>", keys.len()),
            TraceSource::Directory { dir, pattern } => match pattern {
                Some(p) => write!(f, "{}/{}", dir.display(), p),
                None => write!(f, "{}", dir.display()),
            },
        }
    }
}

/// Command-line overrides applied on top of a base engine configuration.
/// `None` leaves the base value untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EngineOverrides {
    pub initial_dimension: Option<NonZeroUsize>,
    pub load_factor_threshold: Option<f64>,
    pub max_quadratic_probes: Option<usize>,
    pub max_double_probes: Option<usize>,
    pub hash_scheme: Option<HashScheme>,
    /// Set to disable per-access snapshots
    pub no_steps: bool,
}

impl EngineOverrides {
    /// Applies the overrides to `base`
    pub fn apply(&self, mut base: EngineConfig) -> EngineConfig {
        if let Some(dim) = self.initial_dimension {
            base.initial_dimension = dim;
        }
        if let Some(threshold) = self.load_factor_threshold {
            base.load_factor_threshold = threshold;
        }
        if let Some(probes) = self.max_quadratic_probes {
            base.max_quadratic_probes = probes;
        }
        if let Some(probes) = self.max_double_probes {
            base.max_double_probes = probes;
        }
        if let Some(scheme) = self.hash_scheme {
            base.hash_scheme = scheme;
        }
        if self.no_steps {
            base.record_steps = false;
        }
        base
    }
}

/// Configuration for a simulation run
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Engine settings shared by every trace in the run
    pub engine: EngineConfig,
    /// Input keys
    pub source: TraceSource,
    /// Worker threads for batch runs
    pub thread_count: usize,
    /// Record failing traces in a batch and carry on instead of failing
    /// the whole run
    pub keep_going: bool,
}

/// Result of simulating one trace
#[derive(Debug, Clone)]
pub struct TraceOutcome {
    /// Trace name (file name, or "inline")
    pub trace: String,
    /// Number of keys in the trace
    pub keys: usize,
    /// Number of distinct keys in the trace
    pub unique_keys: usize,
    /// Engine report
    pub report: Report,
    /// Wall time spent in the engine
    pub duration: Duration,
}

impl TraceOutcome {
    /// Hit rate as a percentage
    pub fn hit_rate(&self) -> f64 {
        self.report.hit_rate() * 100.0
    }

    /// Flattens the outcome into a CSV row
    pub fn csv_row(&self) -> CsvResultRow {
        let r = &self.report;
        CsvResultRow {
            trace: self.trace.clone(),
            keys: self.keys,
            unique_keys: self.unique_keys,
            hits: r.hits,
            misses: r.misses,
            collisions: r.collisions,
            load_factor: r.load_factor,
            probe_hits: r.probe_hits,
            probe_misses: r.probe_misses,
            chain_hits: r.chain_hits,
            chain_misses: r.chain_misses,
            rehashes: r.rehashes,
            dimension: r.dimension,
            hit_rate: self.hit_rate(),
        }
    }
}

/// A trace that could not be simulated
#[derive(Debug)]
pub struct TraceFailure {
    /// Trace file name
    pub trace: String,
    /// What went wrong, with the file path in its context
    pub error: anyhow::Error,
}

/// Results of a batch run
#[derive(Debug)]
pub struct BatchResult {
    /// One outcome per successful trace file, in file name order
    pub outcomes: Vec<TraceOutcome>,
    /// Traces that failed, in file name order
    pub failures: Vec<TraceFailure>,
    /// Wall time for the whole batch
    pub duration: Duration,
}

impl BatchResult {
    /// Total keys across all traces
    pub fn total_keys(&self) -> usize {
        self.outcomes.iter().map(|o| o.keys).sum()
    }
}

/// CSV export row for simulation results
#[derive(Debug, Serialize)]
pub struct CsvResultRow {
    pub trace: String,
    pub keys: usize,
    pub unique_keys: usize,
    pub hits: u64,
    pub misses: u64,
    pub collisions: u64,
    pub load_factor: f64,
    pub probe_hits: u64,
    pub probe_misses: u64,
    pub chain_hits: u64,
    pub chain_misses: u64,
    pub rehashes: u64,
    pub dimension: usize,
    /// Percentage, 0-100
    pub hit_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply_only_set_fields() {
        let base = EngineConfig::default();
        let overrides = EngineOverrides {
            initial_dimension: NonZeroUsize::new(16),
            hash_scheme: Some(HashScheme::Modulo),
            no_steps: true,
            ..EngineOverrides::default()
        };
        let config = overrides.apply(base);
        assert_eq!(config.initial_dimension.get(), 16);
        assert_eq!(config.hash_scheme, HashScheme::Modulo);
        assert!(!config.record_steps);
        assert_eq!(config.load_factor_threshold, base.load_factor_threshold);
        assert_eq!(config.max_quadratic_probes, base.max_quadratic_probes);

        assert_eq!(EngineOverrides::default().apply(base), base);
    }

    #[test]
    fn test_source_display() {
        assert_eq!(TraceSource::Inline(vec![1, 2, 3]).to_string(), "<3 inline keys>");
        let dir = TraceSource::Directory {
            dir: PathBuf::from("traces"),
            pattern: Some("*.txt".to_string()),
        };
        assert_eq!(dir.to_string(), "traces/*.txt");
    }
}
