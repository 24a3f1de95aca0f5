//! Resize Manager
//!
//! Watches the load factor after every newly stored key and rebuilds the
//! table at a larger dimension once it crosses the configured threshold.
//!
//! A rebuild allocates a complete new [`Table`], re-drives every surviving key
//! through the collision resolver against it, and only then replaces the old
//! one. The old and new generations never share storage.
//!
//! Re-driven keys are capacity management, not trace traffic, so their
//! outcomes are discarded and never reach the stats collector.

use crate::resolver::{self, ProbeBudget};
use crate::table::Table;

/// Largest grid side the manager will grow to. Past this point chains absorb
/// any further growth.
pub const MAX_DIMENSION: usize = 4096;

/// Record of one completed rebuild.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Growth {
    /// Dimension before the rebuild.
    pub old_dimension: usize,
    /// Dimension after the rebuild.
    pub new_dimension: usize,
    /// Load factor just before the rebuild.
    pub load_before: f64,
    /// Load factor just after the rebuild.
    pub load_after: f64,
}

/// Load-factor driven growth policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeManager {
    threshold: f64,
    budget: ProbeBudget,
}

impl ResizeManager {
    /// Creates a manager that grows tables whose load factor exceeds `threshold`.
    pub fn new(threshold: f64, budget: ProbeBudget) -> Self {
        Self { threshold, budget }
    }

    /// The configured threshold.
    #[inline]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// True when `table` is over the threshold and still allowed to grow.
    #[inline]
    pub fn needs_growth(&self, table: &Table) -> bool {
        table.load_factor() > self.threshold && table.dimension() < MAX_DIMENSION
    }

    /// Smallest doubling of the current dimension that brings `len` keys back
    /// under the threshold, capped at [`MAX_DIMENSION`].
    pub fn target_dimension(&self, table: &Table) -> usize {
        let len = table.len() as f64;
        let mut dim = table.dimension().saturating_mul(2).min(MAX_DIMENSION);
        while dim < MAX_DIMENSION && len / (dim * dim) as f64 > self.threshold {
            dim = dim.saturating_mul(2).min(MAX_DIMENSION);
        }
        dim
    }

    /// Rebuilds `table` if it needs to grow. Returns what happened, if anything.
    pub fn maybe_grow(&self, table: &mut Table) -> Option<Growth> {
        if !self.needs_growth(table) {
            return None;
        }
        let new_dimension = self.target_dimension(table);
        Some(self.rehash(table, new_dimension))
    }

    /// Rebuilds `table` at `new_dimension` unconditionally.
    pub fn rehash(&self, table: &mut Table, new_dimension: usize) -> Growth {
        let old_dimension = table.dimension();
        let load_before = table.load_factor();

        let mut fresh = Table::new(new_dimension, table.hasher());
        for key in table.keys() {
            resolver::resolve(&mut fresh, key, &self.budget);
        }
        debug_assert_eq!(fresh.len(), table.len());
        *table = fresh;

        let growth = Growth {
            old_dimension,
            new_dimension,
            load_before,
            load_after: table.load_factor(),
        };
        tracing::info!(
            old_dimension,
            new_dimension,
            keys = table.len(),
            load_before = growth.load_before,
            load_after = growth.load_after,
            "hybrid table: grow complete"
        );
        growth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::HashScheme;
    use alloc::vec::Vec;

    fn fill(table: &mut Table, keys: impl IntoIterator<Item = u64>) {
        let budget = ProbeBudget::default();
        for k in keys {
            resolver::resolve(table, k, &budget);
        }
    }

    #[test]
    fn test_no_growth_under_threshold() {
        let manager = ResizeManager::new(0.75, ProbeBudget::default());
        let mut table = Table::new(4, HashScheme::Mix);
        fill(&mut table, 0..12);
        assert_eq!(table.load_factor(), 0.75);
        assert!(manager.maybe_grow(&mut table).is_none());
        assert_eq!(table.dimension(), 4);
    }

    #[test]
    fn test_growth_keeps_every_key() {
        let manager = ResizeManager::new(0.75, ProbeBudget::default());
        let mut table = Table::new(4, HashScheme::Mix);
        fill(&mut table, 100..113);
        let mut before: Vec<u64> = table.keys().collect();

        let growth = manager.maybe_grow(&mut table).expect("over threshold");
        assert_eq!(growth.old_dimension, 4);
        assert_eq!(growth.new_dimension, 8);
        assert!(growth.load_after < growth.load_before);
        assert!(growth.load_after <= 0.75);

        let mut after: Vec<u64> = table.keys().collect();
        before.sort_unstable();
        after.sort_unstable();
        assert_eq!(before, after);
        assert!(table.check_invariants().is_ok());
    }

    #[test]
    fn test_target_dimension_doubles_until_under_threshold() {
        let manager = ResizeManager::new(0.5, ProbeBudget::default());
        // one cell holding many chained keys
        let mut table = Table::new(1, HashScheme::Mix);
        fill(&mut table, 0..20);
        assert_eq!(table.len(), 20);
        // 20 / 4 > 0.5, 20 / 16 > 0.5, 20 / 64 <= 0.5
        assert_eq!(manager.target_dimension(&table), 8);
        let growth = manager.maybe_grow(&mut table).expect("over threshold");
        assert_eq!(growth.new_dimension, 8);
        assert_eq!(table.len(), 20);
    }
}
