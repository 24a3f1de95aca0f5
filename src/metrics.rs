//! Stats Collector
//!
//! Monotonic counters fed by every trace-driven resolution, reported through a
//! BTreeMap so the output always has the same key order.
//!
//! Each [`Resolution`] bumps exactly the counters implied by its
//! `(hit|miss, location)` pair:
//!
//! | Outcome            | Counters                    |
//! |--------------------|-----------------------------|
//! | Hit@Primary        | `hits`                      |
//! | Miss@Primary       | `misses`                    |
//! | Hit@Probe(any)     | `hits`, `probe_hits`        |
//! | Miss@Probe(any)    | `misses`, `probe_misses`    |
//! | Hit@Chain          | `hits`, `chain_hits`        |
//! | Miss@Chain         | `misses`, `chain_misses`    |
//!
//! plus `collisions` when the resolution reports one. Quadratic and double
//! hashing share the `probe_*` counters.
//!
//! The load factor is not a counter; it is read from the table on demand.

extern crate alloc;

use crate::resolver::{AccessKind, Location, Resolution};
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

/// Trait for anything that reports metrics in deterministic order.
pub trait CacheMetrics {
    /// Returns all metrics as key-value pairs in deterministic order
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Name of the algorithm producing these metrics
    fn algorithm_name(&self) -> &'static str;
}

/// Counters accumulated over one simulation run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HybridCacheMetrics {
    /// Resolutions that found the key already resident
    pub hits: u64,
    /// Resolutions that stored a new key
    pub misses: u64,
    /// New keys whose home slot held a different key
    pub collisions: u64,
    /// Hits found by quadratic probing or double hashing
    pub probe_hits: u64,
    /// New keys stored by quadratic probing or double hashing
    pub probe_misses: u64,
    /// Hits found in a chain
    pub chain_hits: u64,
    /// New keys appended to a chain
    pub chain_misses: u64,
    /// Table rebuilds triggered by the load factor
    pub rehashes: u64,
}

impl HybridCacheMetrics {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one trace-driven resolution.
    pub fn record(&mut self, resolution: &Resolution) {
        let outcome = resolution.outcome;
        match outcome.kind {
            AccessKind::Hit => {
                self.hits += 1;
                match outcome.location {
                    Location::Primary => {}
                    Location::ProbeQuadratic | Location::ProbeDouble => self.probe_hits += 1,
                    Location::Chain => self.chain_hits += 1,
                }
            }
            AccessKind::Miss => {
                self.misses += 1;
                match outcome.location {
                    Location::Primary => {}
                    Location::ProbeQuadratic | Location::ProbeDouble => self.probe_misses += 1,
                    Location::Chain => self.chain_misses += 1,
                }
            }
        }
        if resolution.collided {
            self.collisions += 1;
        }
    }

    /// Records a table rebuild.
    pub fn record_rehash(&mut self) {
        self.rehashes += 1;
    }

    /// Total resolutions recorded.
    #[inline]
    pub fn requests(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of requests that hit, 0.0 when nothing was recorded.
    pub fn hit_rate(&self) -> f64 {
        let requests = self.requests();
        if requests > 0 {
            self.hits as f64 / requests as f64
        } else {
            0.0
        }
    }

    /// Fraction of requests that missed, 0.0 when nothing was recorded.
    pub fn miss_rate(&self) -> f64 {
        let requests = self.requests();
        if requests > 0 {
            self.misses as f64 / requests as f64
        } else {
            0.0
        }
    }

    /// Convert to BTreeMap for reporting
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();

        metrics.insert("hits".to_string(), self.hits as f64);
        metrics.insert("misses".to_string(), self.misses as f64);
        metrics.insert("requests".to_string(), self.requests() as f64);
        metrics.insert("collisions".to_string(), self.collisions as f64);
        metrics.insert("probe_hits".to_string(), self.probe_hits as f64);
        metrics.insert("probe_misses".to_string(), self.probe_misses as f64);
        metrics.insert("chain_hits".to_string(), self.chain_hits as f64);
        metrics.insert("chain_misses".to_string(), self.chain_misses as f64);
        metrics.insert("rehashes".to_string(), self.rehashes as f64);

        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics.insert("miss_rate".to_string(), self.miss_rate());

        metrics
    }
}

impl CacheMetrics for HybridCacheMetrics {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "Hybrid"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::Outcome;

    fn res(outcome: Outcome, collided: bool) -> Resolution {
        Resolution { outcome, collided }
    }

    #[test]
    fn test_counters_follow_outcome() {
        let mut m = HybridCacheMetrics::new();
        m.record(&res(Outcome::miss(Location::Primary), false));
        m.record(&res(Outcome::miss(Location::ProbeQuadratic), true));
        m.record(&res(Outcome::miss(Location::ProbeDouble), true));
        m.record(&res(Outcome::miss(Location::Chain), true));
        m.record(&res(Outcome::hit(Location::Primary), false));
        m.record(&res(Outcome::hit(Location::ProbeDouble), false));
        m.record(&res(Outcome::hit(Location::Chain), false));

        assert_eq!(m.hits, 3);
        assert_eq!(m.misses, 4);
        assert_eq!(m.collisions, 3);
        assert_eq!(m.probe_misses, 2);
        assert_eq!(m.probe_hits, 1);
        assert_eq!(m.chain_misses, 1);
        assert_eq!(m.chain_hits, 1);
        assert_eq!(m.requests(), 7);
    }

    #[test]
    fn test_rates_and_map() {
        let mut m = HybridCacheMetrics::new();
        assert_eq!(m.hit_rate(), 0.0);
        assert_eq!(m.miss_rate(), 0.0);
        m.record(&res(Outcome::miss(Location::Primary), false));
        m.record(&res(Outcome::hit(Location::Primary), false));
        m.record_rehash();
        assert_eq!(m.hit_rate(), 0.5);

        let map = m.metrics();
        assert_eq!(map.get("hits"), Some(&1.0));
        assert_eq!(map.get("rehashes"), Some(&1.0));
        assert_eq!(map.get("hit_rate"), Some(&0.5));
        let keys: alloc::vec::Vec<&String> = map.keys().collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(m.algorithm_name(), "Hybrid");
    }
}
