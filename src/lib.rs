#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## Resolution Order
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                        access(key)                                   │
//! ├──────────────────────────────────────────────────────────────────────┤
//! │                                                                      │
//! │   home = primary(key)                                                │
//! │      │                                                               │
//! │      ├── empty ───────────────────────────▶ Miss @ Primary          │
//! │      ├── holds key ───────────────────────▶ Hit  @ Primary          │
//! │      └── holds other key                                             │
//! │             │                                                        │
//! │             ▼                                                        │
//! │      quadratic  (i + p², j + p²)   p = 1..=Q ──▶ Hit/Miss @ Probe   │
//! │             │ budget spent                                           │
//! │             ▼                                                        │
//! │      double     (i + p·s, j + p·s) p = 1..=R ──▶ Hit/Miss @ Probe   │
//! │             │ budget spent                                           │
//! │             ▼                                                        │
//! │      chain at home ───────────────────────▶ Hit/Miss @ Chain        │
//! │                                                                      │
//! │   after a Miss: load > threshold ?  ──yes──▶ rebuild at 2·D, 4·D..   │
//! │                                                                      │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Reference
//!
//! | Type | Role |
//! |------|------|
//! | [`TraceRunner`] | Runs a whole trace and returns a [`Report`] |
//! | [`HybridCache`] | One run's table, counters and growth policy |
//! | [`EngineConfig`] | Dimension, threshold, probe budgets, hash scheme |
//! | [`HashScheme`] | `Mix` (bit mixing) or `Modulo` (`(k mod D, k mod D)`) |
//! | [`Report`] / [`Step`] | Final counters and per-access snapshots |
//!
//! ## Running a Trace
//!
//! ```rust
//! use hybrid_cache::{EngineConfig, HashScheme, Location, TraceRunner};
//! use core::num::NonZeroUsize;
//!
//! let config = EngineConfig {
//!     initial_dimension: NonZeroUsize::new(4).unwrap(),
//!     max_quadratic_probes: 2,
//!     max_double_probes: 2,
//!     hash_scheme: HashScheme::Modulo,
//!     ..EngineConfig::default()
//! };
//! let report = TraceRunner::new(config).run(&[1, 5, 1, 9, 4]).unwrap();
//!
//! assert_eq!((report.hits, report.misses, report.collisions), (1, 4, 2));
//! assert_eq!(report.steps[1].location, Location::ProbeQuadratic);
//! assert_eq!(report.steps[3].location, Location::ProbeDouble);
//! ```
//!
//! ## Driving the Cache Directly
//!
//! ```rust
//! use hybrid_cache::{EngineConfig, HybridCache};
//!
//! let mut cache = HybridCache::init(EngineConfig::default()).unwrap();
//! for key in 0..100 {
//!     cache.access(key);
//! }
//! assert_eq!(cache.len(), 100);
//! assert!(cache.load_factor() <= 0.75);
//! assert!(cache.metrics().rehashes > 0);
//! ```
//!
//! ## Modules
//!
//! - [`hash`]: primary and secondary hash functions
//! - [`grid`]: the `D × D` slot array
//! - [`chain`]: overflow chains hanging from grid cells
//! - [`table`]: grid plus chains, with invariant checks
//! - [`resolver`]: the collision resolution walk
//! - [`resize`]: load-factor driven rebuilds
//! - [`metrics`]: hit/miss/collision counters
//! - [`cache`]: the per-run facade
//! - [`runner`]: trace runner and report
//! - [`trace`]: key validation helpers
//! - [`config`]: engine configuration
//! - [`error`]: error types

#![no_std]

extern crate alloc;

#[cfg(any(feature = "std", not(feature = "hashbrown")))]
extern crate std;

/// Cache block identifier.
pub type Key = u64;

/// Hash functions.
///
/// A primary hash placing a key on the grid and a secondary hash giving the
/// double-hashing step. Both are pure functions of the key and the dimension.
pub mod hash;

/// Fixed `D × D` slot storage.
pub mod grid;

/// Per-cell overflow chains.
pub mod chain;

/// Grid and chains as one table generation.
pub mod table;

/// Collision resolution: primary slot, quadratic probing, double hashing,
/// then chaining.
pub mod resolver;

/// Load-factor driven table rebuilds.
pub mod resize;

/// Counters collected over a run.
pub mod metrics;

/// Per-run cache facade.
pub mod cache;

/// Trace runner and report.
pub mod runner;

/// Key validation helpers.
pub mod trace;

/// Engine configuration.
pub mod config;

/// Error types.
pub mod error;

pub use cache::HybridCache;
pub use config::EngineConfig;
pub use error::SimError;
pub use hash::{HashScheme, KeyHasher, MixHasher, ModuloHasher};
pub use metrics::{CacheMetrics, HybridCacheMetrics};
pub use resize::MAX_DIMENSION;
pub use resolver::{AccessKind, Location, Outcome, ProbeBudget};
pub use runner::{Report, Step, TraceRunner};
