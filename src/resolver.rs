//! Collision Resolver
//!
//! Resolves one key against a [`Table`], inserting it if it is not already
//! present. The search follows a fixed order and stops at the first case that
//! applies:
//!
//! 1. **Primary**: the key's home slot. Empty means insert here; same key means hit.
//! 2. **Quadratic probing**: `(i + p², j + p²)` for `p = 1..=quadratic`.
//! 3. **Double hashing**: `(i + p·s, j + p·s)` for `p = 1..=double`, `s = secondary(key)`.
//! 4. **Chaining**: the chain hanging from the home slot, which never fails.
//!
//! ```text
//!            home slot
//!   ┌──────────┴──────────┐
//!   │ empty → Miss@Primary│
//!   │ key   → Hit@Primary │
//!   │ other → collision ──┼──▶ quadratic ──▶ double ──▶ chain(home)
//!   └─────────────────────┘       │              │           │
//!                          empty/key stops  empty/key stops  always stops
//! ```
//!
//! Because keys are never removed within a table generation, an empty slot on
//! the probe path proves the key is absent further along it. That lets the
//! same walk serve both lookups ([`locate`]) and inserts ([`resolve`]).
//!
//! Exhausting a probe budget is not an error; it is the normal hand-off to the
//! next strategy.

use crate::grid::Slot;
use crate::hash::Coord;
use crate::table::Table;
use crate::Key;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where a resolution ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Location {
    /// The key's home slot.
    Primary,
    /// A slot reached by quadratic probing.
    ProbeQuadratic,
    /// A slot reached by double hashing.
    ProbeDouble,
    /// The chain hanging from the home slot.
    Chain,
}

impl Location {
    /// True for both probing phases.
    #[inline]
    pub fn is_probe(&self) -> bool {
        matches!(self, Location::ProbeQuadratic | Location::ProbeDouble)
    }

    /// Short lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Primary => "primary",
            Location::ProbeQuadratic => "probe_quadratic",
            Location::ProbeDouble => "probe_double",
            Location::Chain => "chain",
        }
    }
}

/// Hit or miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AccessKind {
    /// The key was already resident.
    Hit,
    /// The key was newly stored.
    Miss,
}

impl AccessKind {
    /// `"hit"` or `"miss"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessKind::Hit => "hit",
            AccessKind::Miss => "miss",
        }
    }
}

/// Result of resolving one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Outcome {
    /// Hit or miss.
    pub kind: AccessKind,
    /// Where it was found or stored.
    pub location: Location,
}

impl Outcome {
    /// Shorthand for a hit at `location`.
    pub const fn hit(location: Location) -> Self {
        Self {
            kind: AccessKind::Hit,
            location,
        }
    }

    /// Shorthand for a miss at `location`.
    pub const fn miss(location: Location) -> Self {
        Self {
            kind: AccessKind::Miss,
            location,
        }
    }

    /// True for hits.
    #[inline]
    pub fn is_hit(&self) -> bool {
        self.kind == AccessKind::Hit
    }

    /// True for misses.
    #[inline]
    pub fn is_miss(&self) -> bool {
        self.kind == AccessKind::Miss
    }
}

/// An [`Outcome`] plus whether it counts as a collision.
///
/// `collided` is set when the home slot held a different key and the key was
/// newly stored somewhere else. Hits that walk past the home slot are not
/// collisions; the collision was already counted when that key was stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Hit/miss and location.
    pub outcome: Outcome,
    /// Counts towards the collision counter.
    pub collided: bool,
}

/// Probe limits for the two open-addressing phases. Zero skips a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeBudget {
    /// Quadratic probes tried before switching to double hashing.
    pub quadratic: usize,
    /// Double-hashing probes tried before falling back to chaining.
    pub double: usize,
}

impl Default for ProbeBudget {
    fn default() -> Self {
        Self {
            quadratic: 5,
            double: 5,
        }
    }
}

/// Result of walking a key's probe path without modifying the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// The key is stored at `at` (for [`Location::Chain`], the home cell).
    Found {
        /// Phase that found it.
        location: Location,
        /// Slot, or home cell for chained keys.
        at: Coord,
    },
    /// The key is absent; `at` is the first empty slot on its path.
    Vacant {
        /// Phase that found the empty slot.
        location: Location,
        /// The empty slot.
        at: Coord,
    },
    /// The key is absent and every probed slot is taken; it belongs in the
    /// chain at its home cell.
    Overflow {
        /// Home cell.
        home: Coord,
    },
}

enum Step {
    Found,
    Vacant,
    Taken,
}

#[inline]
fn inspect(table: &Table, at: Coord, key: Key) -> Step {
    match table.slot(at) {
        Slot::Empty => Step::Vacant,
        Slot::Occupied(k) if k == key => Step::Found,
        Slot::Occupied(_) => Step::Taken,
    }
}

/// Walks `key`'s probe path and reports where it is or where it would go.
pub fn locate(table: &Table, key: Key, budget: &ProbeBudget) -> Probe {
    let dim = table.dimension();
    let home = table.home(key);

    match inspect(table, home, key) {
        Step::Found => {
            return Probe::Found {
                location: Location::Primary,
                at: home,
            }
        }
        Step::Vacant => {
            return Probe::Vacant {
                location: Location::Primary,
                at: home,
            }
        }
        Step::Taken => {}
    }

    for p in 1..=budget.quadratic {
        let at = home.quadratic(p, dim);
        match inspect(table, at, key) {
            Step::Found => {
                return Probe::Found {
                    location: Location::ProbeQuadratic,
                    at,
                }
            }
            Step::Vacant => {
                return Probe::Vacant {
                    location: Location::ProbeQuadratic,
                    at,
                }
            }
            Step::Taken => {}
        }
    }

    if budget.double > 0 {
        let step = table.step(key);
        for p in 1..=budget.double {
            let at = home.stepped(p, step, dim);
            match inspect(table, at, key) {
                Step::Found => {
                    return Probe::Found {
                        location: Location::ProbeDouble,
                        at,
                    }
                }
                Step::Vacant => {
                    return Probe::Vacant {
                        location: Location::ProbeDouble,
                        at,
                    }
                }
                Step::Taken => {}
            }
        }
    }

    if table.chains().contains(home, key) {
        Probe::Found {
            location: Location::Chain,
            at: home,
        }
    } else {
        Probe::Overflow { home }
    }
}

/// Looks `key` up and stores it if absent.
///
/// Never fails: chaining absorbs anything the probe budgets cannot place.
pub fn resolve(table: &mut Table, key: Key, budget: &ProbeBudget) -> Resolution {
    match locate(table, key, budget) {
        Probe::Found { location, .. } => Resolution {
            outcome: Outcome::hit(location),
            collided: false,
        },
        Probe::Vacant { location, at } => {
            table.place(at, key);
            Resolution {
                outcome: Outcome::miss(location),
                collided: location != Location::Primary,
            }
        }
        Probe::Overflow { home } => {
            table.chain(home, key);
            Resolution {
                outcome: Outcome::miss(Location::Chain),
                collided: true,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::HashScheme;

    fn budget(quadratic: usize, double: usize) -> ProbeBudget {
        ProbeBudget { quadratic, double }
    }

    #[test]
    fn test_primary_miss_then_hit() {
        let mut table = Table::new(4, HashScheme::Modulo);
        let b = budget(2, 2);
        let first = resolve(&mut table, 1, &b);
        assert_eq!(first.outcome, Outcome::miss(Location::Primary));
        assert!(!first.collided);
        let second = resolve(&mut table, 1, &b);
        assert_eq!(second.outcome, Outcome::hit(Location::Primary));
        assert!(!second.collided);
    }

    #[test]
    fn test_quadratic_then_double() {
        let mut table = Table::new(4, HashScheme::Modulo);
        let b = budget(2, 2);
        resolve(&mut table, 1, &b);

        // 5 shares (1,1) with 1; first quadratic probe (2,2) is free
        let r = resolve(&mut table, 5, &b);
        assert_eq!(r.outcome, Outcome::miss(Location::ProbeQuadratic));
        assert!(r.collided);
        assert_eq!(table.grid().get(Coord { i: 2, j: 2 }), Slot::Occupied(5));

        // 9: (2,2) holds 5, (1,1) holds 1, step 1 -> (2,2) taken, (3,3) free
        let r = resolve(&mut table, 9, &b);
        assert_eq!(r.outcome, Outcome::miss(Location::ProbeDouble));
        assert!(r.collided);
        assert_eq!(table.grid().get(Coord { i: 3, j: 3 }), Slot::Occupied(9));

        // hits along the probe path are not collisions
        let r = resolve(&mut table, 9, &b);
        assert_eq!(r.outcome, Outcome::hit(Location::ProbeDouble));
        assert!(!r.collided);
        let r = resolve(&mut table, 5, &b);
        assert_eq!(r.outcome, Outcome::hit(Location::ProbeQuadratic));
    }

    #[test]
    fn test_chain_fallback() {
        // single cell: everything after the first key must chain
        let mut table = Table::new(1, HashScheme::Mix);
        let b = budget(3, 3);
        assert_eq!(
            resolve(&mut table, 10, &b).outcome,
            Outcome::miss(Location::Primary)
        );
        let r = resolve(&mut table, 20, &b);
        assert_eq!(r.outcome, Outcome::miss(Location::Chain));
        assert!(r.collided);
        let r = resolve(&mut table, 20, &b);
        assert_eq!(r.outcome, Outcome::hit(Location::Chain));
        assert!(!r.collided);
        assert_eq!(table.len(), 2);
        assert!(table.check_invariants().is_ok());
    }

    #[test]
    fn test_zero_budgets_go_straight_to_chain() {
        let mut table = Table::new(4, HashScheme::Modulo);
        let b = budget(0, 0);
        resolve(&mut table, 2, &b);
        let r = resolve(&mut table, 6, &b);
        assert_eq!(r.outcome, Outcome::miss(Location::Chain));
        assert_eq!(table.chains().len(), 1);
    }

    #[test]
    fn test_locate_does_not_mutate() {
        let mut table = Table::new(4, HashScheme::Modulo);
        let b = budget(2, 2);
        assert_eq!(
            locate(&table, 3, &b),
            Probe::Vacant {
                location: Location::Primary,
                at: Coord { i: 3, j: 3 }
            }
        );
        assert!(table.is_empty());
        resolve(&mut table, 3, &b);
        assert_eq!(
            locate(&table, 3, &b),
            Probe::Found {
                location: Location::Primary,
                at: Coord { i: 3, j: 3 }
            }
        );
    }
}
