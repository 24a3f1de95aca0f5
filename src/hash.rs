//! Key Hash Functions
//!
//! Two independent, pure functions drive every placement decision in the table:
//!
//! - **primary**: maps a key to its home coordinate `(i, j)` in a `D×D` grid.
//! - **secondary**: maps a key to the step used by double hashing.
//!
//! Both take the current dimension as an argument instead of capturing it, so
//! the same hasher is reused unchanged when the table is rebuilt at a larger
//! dimension.
//!
//! # Probe sequences
//!
//! ```text
//! quadratic:  (i + p², j + p²)       mod D,  p = 1..=max_quadratic_probes
//! double:     (i + p·s, j + p·s)     mod D,  p = 1..=max_double_probes, s = secondary(key)
//! ```

use crate::Key;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const MIX_MULTIPLIER: u64 = 0x45d9f3b;
const SECONDARY_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// A grid coordinate. Both components are always reduced modulo the table dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Coord {
    /// Row index.
    pub i: usize,
    /// Column index.
    pub j: usize,
}

impl Coord {
    /// Creates a coordinate reduced modulo `dim` on both axes.
    #[inline]
    pub fn wrapped(i: usize, j: usize, dim: usize) -> Self {
        Self {
            i: i % dim,
            j: j % dim,
        }
    }

    /// Coordinate of the `p`-th quadratic probe from `self`.
    #[inline]
    pub fn quadratic(self, p: usize, dim: usize) -> Self {
        let offset = (p % dim) * (p % dim) % dim;
        Self::wrapped(self.i + offset, self.j + offset, dim)
    }

    /// Coordinate of the `p`-th double-hashing probe from `self` with the given step.
    #[inline]
    pub fn stepped(self, p: usize, step: usize, dim: usize) -> Self {
        let offset = (p % dim) * (step % dim) % dim;
        Self::wrapped(self.i + offset, self.j + offset, dim)
    }
}

/// A pair of deterministic hash functions over keys.
///
/// Implementations must be pure: the same `(key, dim)` always yields the same
/// result, and [`secondary`](KeyHasher::secondary) never returns zero.
pub trait KeyHasher {
    /// Home coordinate of `key` in a `dim × dim` grid.
    fn primary(&self, key: Key, dim: usize) -> Coord;

    /// Double-hashing step for `key`; always non-zero.
    fn secondary(&self, key: Key, dim: usize) -> usize;
}

/// Avalanche mixer used by [`MixHasher`].
#[inline]
pub fn mix(key: Key) -> u64 {
    let mut x = key;
    x = ((x >> 16) ^ x).wrapping_mul(MIX_MULTIPLIER);
    x = ((x >> 16) ^ x).wrapping_mul(MIX_MULTIPLIER);
    (x >> 16) ^ x
}

#[inline]
fn step_in(value: u64, dim: usize) -> usize {
    if dim <= 1 {
        return 1;
    }
    // dim - 1 fits in u64 on every supported target
    1 + (value % (dim as u64 - 1)) as usize
}

/// Default hasher: bit-mixes the key before reducing it onto the grid.
///
/// The row comes from the low part of the mixed value and the column from the
/// quotient, so keys sharing a row are still spread across columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MixHasher;

impl KeyHasher for MixHasher {
    fn primary(&self, key: Key, dim: usize) -> Coord {
        let h = mix(key);
        let d = dim as u64;
        Coord {
            i: (h % d) as usize,
            j: ((h / d) % d) as usize,
        }
    }

    fn secondary(&self, key: Key, dim: usize) -> usize {
        step_in(mix(key ^ SECONDARY_SALT), dim)
    }
}

/// Diagonal modulo hasher: `primary(k) = (k mod D, k mod D)`.
///
/// Useful for hand-checkable traces, since colliding keys are obvious.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModuloHasher;

impl KeyHasher for ModuloHasher {
    fn primary(&self, key: Key, dim: usize) -> Coord {
        let cell = (key % dim as u64) as usize;
        Coord { i: cell, j: cell }
    }

    fn secondary(&self, key: Key, dim: usize) -> usize {
        step_in(key, dim)
    }
}

/// Hash scheme selected by configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum HashScheme {
    /// [`MixHasher`]
    #[default]
    Mix,
    /// [`ModuloHasher`]
    Modulo,
}

impl HashScheme {
    /// Lowercase name, as accepted on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            HashScheme::Mix => "mix",
            HashScheme::Modulo => "modulo",
        }
    }
}

impl KeyHasher for HashScheme {
    #[inline]
    fn primary(&self, key: Key, dim: usize) -> Coord {
        match self {
            HashScheme::Mix => MixHasher.primary(key, dim),
            HashScheme::Modulo => ModuloHasher.primary(key, dim),
        }
    }

    #[inline]
    fn secondary(&self, key: Key, dim: usize) -> usize {
        match self {
            HashScheme::Mix => MixHasher.secondary(key, dim),
            HashScheme::Modulo => ModuloHasher.secondary(key, dim),
        }
    }
}

impl core::str::FromStr for HashScheme {
    type Err = alloc::string::String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mix" => Ok(HashScheme::Mix),
            "modulo" | "mod" => Ok(HashScheme::Modulo),
            other => Err(alloc::format!("unknown hash scheme '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_is_in_bounds_and_stable() {
        for dim in [1usize, 2, 3, 8, 17, 64] {
            for key in 0..500u64 {
                let a = MixHasher.primary(key, dim);
                let b = MixHasher.primary(key, dim);
                assert_eq!(a, b);
                assert!(a.i < dim && a.j < dim);
            }
        }
    }

    #[test]
    fn test_secondary_never_zero() {
        for dim in [1usize, 2, 4, 8, 33] {
            for key in 0..1000u64 {
                assert!(MixHasher.secondary(key, dim) >= 1);
                assert!(ModuloHasher.secondary(key, dim) >= 1);
            }
        }
        assert_eq!(MixHasher.secondary(u64::MAX, 16), MixHasher.secondary(u64::MAX, 16));
    }

    #[test]
    fn test_modulo_hasher_is_diagonal() {
        assert_eq!(ModuloHasher.primary(5, 4), Coord { i: 1, j: 1 });
        assert_eq!(ModuloHasher.primary(2, 4), Coord { i: 2, j: 2 });
        assert_eq!(ModuloHasher.secondary(9, 4), 1);
        assert_eq!(ModuloHasher.secondary(10, 4), 2);
    }

    #[test]
    fn test_mix_spreads_sequential_keys() {
        let dim = 16;
        let mut seen = [[false; 16]; 16];
        for key in 0..256u64 {
            let c = MixHasher.primary(key, dim);
            seen[c.i][c.j] = true;
        }
        let used = seen.iter().flatten().filter(|&&b| b).count();
        // 256 keys over 256 cells; a uniform spread touches about 63% of them
        assert!(used > 96, "only {used} cells used");
    }

    #[test]
    fn test_probe_offsets_wrap() {
        let base = Coord { i: 3, j: 1 };
        assert_eq!(base.quadratic(1, 4), Coord { i: 0, j: 2 });
        assert_eq!(base.quadratic(2, 4), Coord { i: 3, j: 1 });
        assert_eq!(base.stepped(3, 2, 4), Coord { i: 1, j: 3 });
    }

    #[test]
    fn test_scheme_parse() {
        assert_eq!("mix".parse::<HashScheme>(), Ok(HashScheme::Mix));
        assert_eq!("Modulo".parse::<HashScheme>(), Ok(HashScheme::Modulo));
        assert!("sha".parse::<HashScheme>().is_err());
    }
}
