//! Grid Store
//!
//! A fixed-capacity `D×D` array of slots stored row-major in one allocation.
//! Each slot is either empty or holds exactly one key. The grid never resizes
//! itself; growth is done by building a fresh grid (see [`crate::resize`]).

extern crate alloc;

use crate::hash::Coord;
use crate::Key;
use alloc::vec;
use alloc::vec::Vec;

/// State of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Slot {
    /// Nothing stored here.
    #[default]
    Empty,
    /// Holds one key.
    Occupied(Key),
}

impl Slot {
    /// The stored key, if any.
    #[inline]
    pub fn key(&self) -> Option<Key> {
        match *self {
            Slot::Empty => None,
            Slot::Occupied(k) => Some(k),
        }
    }

    /// True for [`Slot::Empty`].
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }
}

/// Square grid of [`Slot`]s.
#[derive(Debug, Clone)]
pub struct Grid {
    dim: usize,
    slots: Vec<Slot>,
    occupied: usize,
}

impl Grid {
    /// Creates an empty `dim × dim` grid.
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            slots: vec![Slot::Empty; dim * dim],
            occupied: 0,
        }
    }

    #[inline]
    fn index(&self, at: Coord) -> usize {
        debug_assert!(at.i < self.dim && at.j < self.dim);
        at.i * self.dim + at.j
    }

    /// Slot at `at`.
    #[inline]
    pub fn get(&self, at: Coord) -> Slot {
        self.slots[self.index(at)]
    }

    /// Stores `key` at `at`, replacing whatever was there.
    pub fn set(&mut self, at: Coord, key: Key) {
        let idx = self.index(at);
        if self.slots[idx].is_empty() {
            self.occupied += 1;
        }
        self.slots[idx] = Slot::Occupied(key);
    }

    /// Empties the slot at `at`.
    pub fn clear(&mut self, at: Coord) {
        let idx = self.index(at);
        if !self.slots[idx].is_empty() {
            self.occupied -= 1;
        }
        self.slots[idx] = Slot::Empty;
    }

    /// Side length `D`.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dim
    }

    /// Total number of cells, `D²`.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots.
    #[inline]
    pub fn occupied_count(&self) -> usize {
        self.occupied
    }

    /// Occupied slots in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, Key)> + '_ {
        let dim = self.dim;
        self.slots.iter().enumerate().filter_map(move |(idx, slot)| {
            slot.key().map(|k| {
                (
                    Coord {
                        i: idx / dim,
                        j: idx % dim,
                    },
                    k,
                )
            })
        })
    }

    /// Copy of every slot in row-major order, `None` for empty cells.
    pub fn snapshot(&self) -> Vec<Option<Key>> {
        self.slots.iter().map(Slot::key).collect()
    }
}
