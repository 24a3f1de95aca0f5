//! Engine Configuration
//!
//! A single struct with public fields, filled in directly or deserialized from
//! JSON (with the `serde` feature). Every field has a default, so a partial
//! JSON object is enough.
//!
//! # Examples
//!
//! ```
//! use hybrid_cache::config::EngineConfig;
//! use hybrid_cache::HashScheme;
//! use core::num::NonZeroUsize;
//!
//! let config = EngineConfig {
//!     initial_dimension: NonZeroUsize::new(4).unwrap(),
//!     hash_scheme: HashScheme::Modulo,
//!     ..EngineConfig::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

extern crate alloc;

use crate::error::SimError;
use crate::hash::HashScheme;
use crate::resize::MAX_DIMENSION;
use crate::resolver::ProbeBudget;
use alloc::format;
use core::fmt;
use core::num::NonZeroUsize;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default grid side.
pub const DEFAULT_INITIAL_DIMENSION: usize = 8;
/// Default rehash threshold.
pub const DEFAULT_LOAD_FACTOR_THRESHOLD: f64 = 0.75;
/// Default quadratic probe budget.
pub const DEFAULT_MAX_QUADRATIC_PROBES: usize = 5;
/// Default double-hashing probe budget.
pub const DEFAULT_MAX_DOUBLE_PROBES: usize = 5;

fn default_initial_dimension() -> NonZeroUsize {
    NonZeroUsize::new(DEFAULT_INITIAL_DIMENSION).unwrap_or(NonZeroUsize::MIN)
}

#[cfg(feature = "serde")]
fn default_load_factor_threshold() -> f64 {
    DEFAULT_LOAD_FACTOR_THRESHOLD
}

#[cfg(feature = "serde")]
fn default_max_quadratic_probes() -> usize {
    DEFAULT_MAX_QUADRATIC_PROBES
}

#[cfg(feature = "serde")]
fn default_max_double_probes() -> usize {
    DEFAULT_MAX_DOUBLE_PROBES
}

#[cfg(feature = "serde")]
fn default_record_steps() -> bool {
    true
}

/// Configuration for one simulation run.
///
/// # Fields
///
/// - `initial_dimension`: grid side `D` at the start of the run (`D²` cells).
/// - `load_factor_threshold`: rebuild once `keys / D²` exceeds this, in `(0, 1]`.
/// - `max_quadratic_probes` / `max_double_probes`: probe budgets; 0 skips a phase.
/// - `hash_scheme`: which primary/secondary hash pair to use.
/// - `record_steps`: keep a per-access grid snapshot for visualization.
#[derive(Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct EngineConfig {
    /// Grid side length at the start of a run.
    #[cfg_attr(feature = "serde", serde(default = "default_initial_dimension"))]
    pub initial_dimension: NonZeroUsize,
    /// Load factor above which the table is rebuilt.
    #[cfg_attr(feature = "serde", serde(default = "default_load_factor_threshold"))]
    pub load_factor_threshold: f64,
    /// Quadratic probes tried before double hashing.
    #[cfg_attr(feature = "serde", serde(default = "default_max_quadratic_probes"))]
    pub max_quadratic_probes: usize,
    /// Double-hashing probes tried before chaining.
    #[cfg_attr(feature = "serde", serde(default = "default_max_double_probes"))]
    pub max_double_probes: usize,
    /// Primary/secondary hash pair.
    #[cfg_attr(feature = "serde", serde(default))]
    pub hash_scheme: HashScheme,
    /// Record a snapshot for every access.
    #[cfg_attr(feature = "serde", serde(default = "default_record_steps"))]
    pub record_steps: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_dimension: default_initial_dimension(),
            load_factor_threshold: DEFAULT_LOAD_FACTOR_THRESHOLD,
            max_quadratic_probes: DEFAULT_MAX_QUADRATIC_PROBES,
            max_double_probes: DEFAULT_MAX_DOUBLE_PROBES,
            hash_scheme: HashScheme::default(),
            record_steps: true,
        }
    }
}

impl EngineConfig {
    /// Probe budgets as used by the resolver.
    #[inline]
    pub fn probe_budget(&self) -> ProbeBudget {
        ProbeBudget {
            quadratic: self.max_quadratic_probes,
            double: self.max_double_probes,
        }
    }

    /// Checks that every field is in range.
    pub fn validate(&self) -> Result<(), SimError> {
        let threshold = self.load_factor_threshold;
        if !threshold.is_finite() || threshold <= 0.0 || threshold > 1.0 {
            return Err(SimError::InvalidConfig(format!(
                "load_factor_threshold must be in (0, 1], got {threshold}"
            )));
        }
        if self.initial_dimension.get() > MAX_DIMENSION {
            return Err(SimError::InvalidConfig(format!(
                "initial_dimension must be at most {MAX_DIMENSION}, got {}",
                self.initial_dimension
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineConfig")
            .field("initial_dimension", &self.initial_dimension)
            .field("load_factor_threshold", &self.load_factor_threshold)
            .field("max_quadratic_probes", &self.max_quadratic_probes)
            .field("max_double_probes", &self.max_double_probes)
            .field("hash_scheme", &self.hash_scheme)
            .field("record_steps", &self.record_steps)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.initial_dimension.get(), 8);
        assert_eq!(config.load_factor_threshold, 0.75);
        assert_eq!(config.probe_budget(), ProbeBudget::default());
        assert_eq!(config.hash_scheme, HashScheme::Mix);
        assert!(config.record_steps);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_threshold_out_of_range() {
        for bad in [0.0, -0.5, 1.5, f64::NAN, f64::INFINITY] {
            let config = EngineConfig {
                load_factor_threshold: bad,
                ..EngineConfig::default()
            };
            assert!(
                matches!(config.validate(), Err(SimError::InvalidConfig(_))),
                "{bad} accepted"
            );
        }
        let config = EngineConfig {
            load_factor_threshold: 1.0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_dimension_too_large() {
        let config = EngineConfig {
            initial_dimension: NonZeroUsize::new(MAX_DIMENSION + 1).unwrap(),
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
