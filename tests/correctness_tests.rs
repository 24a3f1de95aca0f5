//! Correctness Tests for the Hybrid Table
//!
//! Validates resolution outcomes and counters on small, hand-checkable traces.
//! Most tests use the diagonal `modulo` hash so every collision can be traced
//! on paper.
//!
//! ## Test Strategy
//! - 4x4 grids with probe budgets of 2 for predictable probe paths
//! - Each step checks both hit/miss and where the key was resolved
//! - Growth tests check counters across a rebuild

use hybrid_cache::{
    AccessKind, EngineConfig, HashScheme, HybridCache, Location, Outcome, SimError, TraceRunner,
};
use std::num::NonZeroUsize;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Diagonal-hash config with the given dimension and probe budgets
fn modulo_config(dim: usize, quadratic: usize, double: usize) -> EngineConfig {
    EngineConfig {
        initial_dimension: NonZeroUsize::new(dim).unwrap(),
        max_quadratic_probes: quadratic,
        max_double_probes: double,
        hash_scheme: HashScheme::Modulo,
        ..EngineConfig::default()
    }
}

fn outcomes(report: &hybrid_cache::Report) -> Vec<(AccessKind, Location)> {
    report.steps().map(|s| (s.result, s.location)).collect()
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_scenario_probe_then_double() {
    let report = TraceRunner::new(modulo_config(4, 2, 2))
        .run(&[1, 5, 1, 9, 4])
        .unwrap();

    assert_eq!(
        outcomes(&report),
        vec![
            (AccessKind::Miss, Location::Primary),
            (AccessKind::Miss, Location::ProbeQuadratic),
            (AccessKind::Hit, Location::Primary),
            (AccessKind::Miss, Location::ProbeDouble),
            (AccessKind::Miss, Location::Primary),
        ]
    );
    assert_eq!(report.hits, 1);
    assert_eq!(report.misses, 4);
    assert_eq!(report.collisions, 2);
    assert_eq!(report.probe_misses, 2);
    assert_eq!(report.rehashes, 0);
    assert_eq!(report.load_factor, 4.0 / 16.0);
}

#[test]
fn test_scenario_key_two_lands_behind_five() {
    // 5 took (2,2) on its first quadratic probe, so 2 starts from a taken
    // home slot: (3,3) holds 9, (2,2) again, then double hashing with step 3
    // passes (1,1) and stops at (0,0)
    let report = TraceRunner::new(modulo_config(4, 2, 2))
        .run(&[1, 5, 1, 9, 2])
        .unwrap();

    assert_eq!(report.hits, 1);
    assert_eq!(report.misses, 4);
    assert_eq!(report.collisions, 3);
    let last = report.steps().last().unwrap();
    assert_eq!(last.address, 2);
    assert_eq!(last.location, Location::ProbeDouble);
    assert_eq!(last.cache[0], Some(2));
}

#[test]
fn test_single_key_repeated() {
    let trace = vec![42; 50];
    let report = TraceRunner::new(EngineConfig::default()).run(&trace).unwrap();
    assert_eq!(report.hits, 49);
    assert_eq!(report.misses, 1);
    assert_eq!(report.collisions, 0);
    assert!(report
        .steps()
        .skip(1)
        .all(|s| s.result == AccessKind::Hit && s.location == Location::Primary));
}

#[test]
fn test_miss_then_hit_at_same_location() {
    let mut cache = HybridCache::init(modulo_config(4, 2, 2)).unwrap();
    for key in [0u64, 4, 8, 12, 16, 20] {
        let first = cache.access(key);
        let second = cache.access(key);
        assert_eq!(first.kind, AccessKind::Miss, "key {key}");
        assert_eq!(second.kind, AccessKind::Hit, "key {key}");
        assert_eq!(first.location, second.location, "key {key}");
    }
}

#[test]
fn test_chain_absorbs_overflow() {
    // no probing at all: everything colliding goes to the home chain
    let mut cache = HybridCache::init(modulo_config(4, 0, 0)).unwrap();
    assert_eq!(cache.access(3), Outcome::miss(Location::Primary));
    assert_eq!(cache.access(7), Outcome::miss(Location::Chain));
    assert_eq!(cache.access(11), Outcome::miss(Location::Chain));
    assert_eq!(cache.access(7), Outcome::hit(Location::Chain));

    let m = cache.metrics();
    assert_eq!(m.chain_misses, 2);
    assert_eq!(m.chain_hits, 1);
    assert_eq!(m.collisions, 2);
    assert_eq!(cache.table().chained_keys(), vec![7, 11]);
    // chained keys count as occupied
    assert_eq!(cache.load_factor(), 3.0 / 16.0);
}

// ============================================================================
// GROWTH
// ============================================================================

#[test]
fn test_growth_keeps_keys_and_counters() {
    let config = EngineConfig {
        initial_dimension: NonZeroUsize::new(2).unwrap(),
        ..EngineConfig::default()
    };
    let mut cache = HybridCache::init(config).unwrap();
    let keys: Vec<u64> = (1000..1200).collect();
    for &k in &keys {
        cache.access(k);
    }
    assert!(cache.metrics().rehashes >= 1);
    assert!(cache.load_factor() <= 0.75);
    assert_eq!(cache.len(), keys.len());
    assert_eq!(cache.metrics().misses, keys.len() as u64);

    let mut resident: Vec<u64> = cache.keys().collect();
    resident.sort_unstable();
    assert_eq!(resident, keys);

    for &k in &keys {
        assert!(cache.contains(k));
        assert!(cache.access(k).is_hit());
    }
    assert_eq!(cache.metrics().hits, keys.len() as u64);
    cache.table().check_invariants().unwrap();
}

#[test]
fn test_load_drops_after_each_rehash() {
    let config = EngineConfig {
        initial_dimension: NonZeroUsize::new(1).unwrap(),
        load_factor_threshold: 0.5,
        ..EngineConfig::default()
    };
    let mut cache = HybridCache::init(config).unwrap();
    for key in 0..500u64 {
        cache.access(key);
        if let Some(growth) = cache.last_growth() {
            assert!(growth.load_after < growth.load_before);
            assert!(growth.load_after <= 0.5);
            assert!(growth.new_dimension > growth.old_dimension);
        }
    }
    assert!(cache.dimension() >= 32);
}

#[test]
fn test_threshold_one_allows_full_load() {
    let config = EngineConfig {
        load_factor_threshold: 1.0,
        ..modulo_config(4, 5, 5)
    };
    let report = TraceRunner::new(config).run(&(0..16).collect::<Vec<_>>()).unwrap();
    assert_eq!(report.rehashes, 0);
    assert_eq!(report.load_factor, 1.0);
    // diagonal homes and diagonal probe offsets never leave the diagonal
    let last = report.steps().last().unwrap();
    assert_eq!(last.cache.iter().flatten().count(), 4);
    assert_eq!(last.chained.len(), 12);
    assert_eq!(report.chain_misses, 12);
}

// ============================================================================
// ERRORS
// ============================================================================

#[test]
fn test_empty_trace() {
    let err = TraceRunner::new(EngineConfig::default()).run(&[]).unwrap_err();
    assert_eq!(err, SimError::EmptyTrace);
    assert_eq!(err.to_string(), "trace is empty");
}

#[test]
fn test_invalid_config_is_fatal() {
    let config = EngineConfig {
        load_factor_threshold: 0.0,
        ..EngineConfig::default()
    };
    assert!(matches!(
        TraceRunner::new(config).run(&[1, 2, 3]),
        Err(SimError::InvalidConfig(_))
    ));
}

#[test]
fn test_negative_keys_rejected() {
    let err = hybrid_cache::trace::keys_from_signed(&[4, 8, -15]).unwrap_err();
    assert_eq!(
        err,
        SimError::InvalidKey {
            index: 2,
            value: "-15".to_string()
        }
    );
}
