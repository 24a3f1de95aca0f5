//! Hybrid Table
//!
//! The table owns one [`Grid`] and one [`ChainStore`] of the same dimension,
//! plus the hash scheme used to place keys in them. It is a plain owned value:
//! one simulation run creates one table, and a rebuild produces a new table
//! that replaces the old one wholesale.
//!
//! Invariant: every stored key lives in exactly one place, either a grid slot
//! or a chain entry.

extern crate alloc;

use crate::chain::ChainStore;
use crate::error::SimError;
use crate::grid::{Grid, Slot};
use crate::hash::{Coord, HashScheme, KeyHasher};
use crate::Key;
use alloc::format;
use alloc::vec::Vec;

#[cfg(feature = "hashbrown")]
use hashbrown::HashSet;

#[cfg(not(feature = "hashbrown"))]
use std::collections::HashSet;

/// Grid + chains for one table generation.
#[derive(Debug, Clone)]
pub struct Table {
    grid: Grid,
    chains: ChainStore,
    hasher: HashScheme,
}

impl Table {
    /// Creates an empty table of the given dimension.
    pub fn new(dim: usize, hasher: HashScheme) -> Self {
        Self {
            grid: Grid::new(dim),
            chains: ChainStore::new(dim),
            hasher,
        }
    }

    /// Side length of the grid.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.grid.dimension()
    }

    /// Number of grid cells, `D²`.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.grid.capacity()
    }

    /// Keys stored, grid and chains together.
    #[inline]
    pub fn len(&self) -> usize {
        self.grid.occupied_count() + self.chains.len()
    }

    /// True when nothing has been stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `len / D²`. Chained keys count as occupied capacity, so this can exceed 1.0.
    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }

    /// Hash scheme in use.
    #[inline]
    pub fn hasher(&self) -> HashScheme {
        self.hasher
    }

    /// Home coordinate of `key` at the current dimension.
    #[inline]
    pub fn home(&self, key: Key) -> Coord {
        self.hasher.primary(key, self.dimension())
    }

    /// Double-hashing step of `key` at the current dimension.
    #[inline]
    pub fn step(&self, key: Key) -> usize {
        self.hasher.secondary(key, self.dimension())
    }

    /// Read access to the grid.
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Read access to the chains.
    #[inline]
    pub fn chains(&self) -> &ChainStore {
        &self.chains
    }

    #[inline]
    pub(crate) fn slot(&self, at: Coord) -> Slot {
        self.grid.get(at)
    }

    #[inline]
    pub(crate) fn place(&mut self, at: Coord, key: Key) {
        debug_assert!(self.grid.get(at).is_empty());
        self.grid.set(at, key);
    }

    #[inline]
    pub(crate) fn chain(&mut self, at: Coord, key: Key) {
        self.chains.append(at, key);
    }

    /// Every stored key: grid slots in row-major order, then chain entries
    /// cell by cell in chain order.
    pub fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.grid
            .iter()
            .map(|(_, k)| k)
            .chain(self.chains.iter().map(|(_, k)| k))
    }

    /// Row-major copy of the grid, `None` for empty slots.
    pub fn grid_snapshot(&self) -> Vec<Option<Key>> {
        self.grid.snapshot()
    }

    /// Copy of every chained key in [`ChainStore::iter`] order.
    pub fn chained_keys(&self) -> Vec<Key> {
        self.chains.iter().map(|(_, k)| k).collect()
    }

    /// Verifies that no key is stored twice and that the counters agree with
    /// the stored contents.
    pub fn check_invariants(&self) -> Result<(), SimError> {
        let mut seen = HashSet::with_capacity(self.len());
        let mut counted = 0usize;
        for key in self.keys() {
            counted += 1;
            if !seen.insert(key) {
                return Err(SimError::Invariant(format!(
                    "key {key} is stored more than once"
                )));
            }
        }
        if counted != self.len() {
            return Err(SimError::Invariant(format!(
                "table reports {} keys but holds {counted}",
                self.len()
            )));
        }
        for (at, key) in self.chains.iter() {
            if self.home(key) != at {
                return Err(SimError::Invariant(format!(
                    "key {key} is chained at ({}, {}) instead of its home cell",
                    at.i, at.j
                )));
            }
        }
        Ok(())
    }
}
