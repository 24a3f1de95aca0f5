//! Hybrid Cache
//!
//! Ties the pieces of one run together: a [`Table`], the collision resolver,
//! the [`ResizeManager`] and the stats collector. Each access is resolved,
//! counted, and followed by a growth check when it stored a new key.
//!
//! A `HybridCache` is an ordinary owned value. Separate runs use separate
//! instances and share nothing.
//!
//! # Examples
//!
//! ```
//! use hybrid_cache::{HybridCache, Location};
//! use hybrid_cache::config::EngineConfig;
//!
//! let mut cache = HybridCache::init(EngineConfig::default()).unwrap();
//! let first = cache.access(42);
//! let second = cache.access(42);
//! assert!(first.is_miss() && second.is_hit());
//! assert_eq!(first.location, second.location);
//! assert_eq!(cache.metrics().hits, 1);
//! ```

extern crate alloc;

use crate::config::EngineConfig;
use crate::error::SimError;
use crate::metrics::{CacheMetrics, HybridCacheMetrics};
use crate::resize::{Growth, ResizeManager};
use crate::resolver::{self, Outcome, Probe, ProbeBudget};
use crate::table::Table;
use crate::Key;
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

/// A single-run cache simulated on a hybrid hash table.
#[derive(Debug, Clone)]
pub struct HybridCache {
    config: EngineConfig,
    budget: ProbeBudget,
    table: Table,
    resizer: ResizeManager,
    metrics: HybridCacheMetrics,
    last_growth: Option<Growth>,
}

impl HybridCache {
    /// Creates an empty cache after validating `config`.
    pub fn init(config: EngineConfig) -> Result<Self, SimError> {
        config.validate()?;
        let budget = config.probe_budget();
        Ok(Self {
            config,
            budget,
            table: Table::new(config.initial_dimension.get(), config.hash_scheme),
            resizer: ResizeManager::new(config.load_factor_threshold, budget),
            metrics: HybridCacheMetrics::new(),
            last_growth: None,
        })
    }

    /// Resolves one trace reference: hit if resident, otherwise stores it.
    pub fn access(&mut self, key: Key) -> Outcome {
        let outcome = self.access_deferred(key);
        self.finish_access(outcome);
        outcome
    }

    /// First half of [`access`](Self::access): resolve and count, but leave
    /// the growth check to [`finish_access`](Self::finish_access).
    pub(crate) fn access_deferred(&mut self, key: Key) -> Outcome {
        let resolution = resolver::resolve(&mut self.table, key, &self.budget);
        self.metrics.record(&resolution);
        self.last_growth = None;
        resolution.outcome
    }

    /// Runs the growth check after a miss. Returns true if the table was rebuilt.
    pub(crate) fn finish_access(&mut self, outcome: Outcome) -> bool {
        if outcome.is_hit() {
            return false;
        }
        match self.resizer.maybe_grow(&mut self.table) {
            Some(growth) => {
                self.metrics.record_rehash();
                self.last_growth = Some(growth);
                true
            }
            None => false,
        }
    }

    /// True if `key` is resident. Does not count as an access.
    pub fn contains(&self, key: Key) -> bool {
        matches!(
            resolver::locate(&self.table, key, &self.budget),
            Probe::Found { .. }
        )
    }

    /// The rebuild triggered by the most recent access, if any.
    #[inline]
    pub fn last_growth(&self) -> Option<Growth> {
        self.last_growth
    }

    /// Number of resident keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// True when no key is resident.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Current grid side.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.table.dimension()
    }

    /// Current load factor; chained keys count as occupied.
    #[inline]
    pub fn load_factor(&self) -> f64 {
        self.table.load_factor()
    }

    /// Accumulated counters.
    #[inline]
    pub fn metrics(&self) -> &HybridCacheMetrics {
        &self.metrics
    }

    /// The underlying table.
    #[inline]
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Configuration this cache was built with.
    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resident keys in rehash order.
    pub fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.table.keys()
    }
}

impl CacheMetrics for HybridCache {
    fn metrics(&self) -> BTreeMap<String, f64> {
        let mut map = self.metrics.to_btreemap();
        map.insert("load_factor".to_string(), self.load_factor());
        map.insert("dimension".to_string(), self.dimension() as f64);
        map.insert("resident_keys".to_string(), self.len() as f64);
        map.insert(
            "chained_keys".to_string(),
            self.table.chains().len() as f64,
        );
        map
    }

    fn algorithm_name(&self) -> &'static str {
        self.metrics.algorithm_name()
    }
}
