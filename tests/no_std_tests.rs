#![no_std]
extern crate alloc;
extern crate hybrid_cache;

use alloc::format;
use alloc::vec::Vec;
use core::num::NonZeroUsize;
use hybrid_cache::{CacheMetrics, EngineConfig, HashScheme, HybridCache, Location, TraceRunner};

fn make_cache(dim: usize, hash_scheme: HashScheme) -> HybridCache {
    let config = EngineConfig {
        initial_dimension: NonZeroUsize::new(dim).unwrap(),
        hash_scheme,
        ..EngineConfig::default()
    };
    HybridCache::init(config).unwrap()
}

#[test]
fn test_cache_in_no_std() {
    let mut cache = make_cache(8, HashScheme::Mix);

    for key in 0..40u64 {
        assert!(cache.access(key).is_miss());
    }
    for key in 0..40u64 {
        assert!(cache.access(key).is_hit());
    }

    assert_eq!(cache.len(), 40);
    assert_eq!(cache.metrics().requests(), 80);
    assert!(cache.load_factor() <= 0.75);
}

#[test]
fn test_runner_in_no_std() {
    let trace: Vec<u64> = (0..32).map(|i| i % 8).collect();
    let report = TraceRunner::new(EngineConfig::default()).run(&trace).unwrap();

    assert_eq!(report.misses, 8);
    assert_eq!(report.hits, 24);
    assert_eq!(report.steps().count(), 32);
    assert!(report.collisions <= report.misses);
}

#[test]
fn test_chaining_in_no_std() {
    // a single cell with no probing room
    let config = EngineConfig {
        initial_dimension: NonZeroUsize::new(1).unwrap(),
        load_factor_threshold: 1.0,
        ..EngineConfig::default()
    };
    let mut cache = HybridCache::init(config).unwrap();
    assert_eq!(cache.access(5).location, Location::Primary);
    // 1.0 is not over the threshold; the second key is over it and grows
    assert_eq!(cache.dimension(), 1);
    assert_eq!(cache.access(6).location, Location::Chain);
    assert_eq!(cache.dimension(), 2);
    assert!(cache.contains(5) && cache.contains(6));
}

#[test]
fn test_metrics_map_in_no_std() {
    let mut cache = make_cache(4, HashScheme::Modulo);
    cache.access(1);
    cache.access(5);
    cache.access(1);

    let map = CacheMetrics::metrics(&cache);
    assert_eq!(map.get("hits"), Some(&1.0));
    assert_eq!(map.get("misses"), Some(&2.0));
    assert_eq!(map.get("collisions"), Some(&1.0));

    let label = format!(
        "{}:{}",
        cache.algorithm_name(),
        cache.config().hash_scheme.as_str()
    );
    assert_eq!(label, "Hybrid:modulo");
}
