//! Chain Store
//!
//! One append-only bucket per grid cell. A bucket only fills once probing has
//! failed for a key whose home cell it is. Buckets are allocated lazily, so a
//! table that never falls back to chaining pays for one empty `Vec` header per
//! cell and nothing else.

extern crate alloc;

use crate::hash::Coord;
use crate::Key;
use alloc::vec::Vec;

/// Per-cell overflow chains for a `D×D` grid.
#[derive(Debug, Clone)]
pub struct ChainStore {
    dim: usize,
    buckets: Vec<Vec<Key>>,
    len: usize,
}

impl ChainStore {
    /// Creates an empty store for a `dim × dim` grid.
    pub fn new(dim: usize) -> Self {
        let mut buckets = Vec::with_capacity(dim * dim);
        buckets.resize_with(dim * dim, Vec::new);
        Self {
            dim,
            buckets,
            len: 0,
        }
    }

    #[inline]
    fn index(&self, at: Coord) -> usize {
        debug_assert!(at.i < self.dim && at.j < self.dim);
        at.i * self.dim + at.j
    }

    /// Appends `key` to the chain hanging from `at`.
    pub fn append(&mut self, at: Coord, key: Key) {
        let idx = self.index(at);
        self.buckets[idx].push(key);
        self.len += 1;
    }

    /// True if the chain at `at` holds `key`.
    pub fn contains(&self, at: Coord, key: Key) -> bool {
        self.buckets[self.index(at)].contains(&key)
    }

    /// Keys chained at `at`, in append order.
    pub fn iter_at(&self, at: Coord) -> core::iter::Copied<core::slice::Iter<'_, Key>> {
        self.buckets[self.index(at)].iter().copied()
    }

    /// Every chained key, cell by cell in row-major order, chain order within a cell.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, Key)> + '_ {
        let dim = self.dim;
        self.buckets.iter().enumerate().flat_map(move |(idx, bucket)| {
            let at = Coord {
                i: idx / dim,
                j: idx % dim,
            };
            bucket.iter().map(move |&k| (at, k))
        })
    }

    /// Total number of chained keys across all cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when no key has been chained.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Length of the longest chain.
    pub fn longest(&self) -> usize {
        self.buckets.iter().map(Vec::len).max().unwrap_or(0)
    }
}
