//! # Randomized Invariant Tests
//!
//! Replays random traces against small geometries and checks the counter
//! and occupancy invariants after every access.

use csim_core::cache::CacheSim;
use csim_core::config::CacheConfig;
use csim_core::trace::{AccessKind, MemoryOperation};
use proptest::prelude::*;

fn operation() -> impl Strategy<Value = MemoryOperation> {
    (any::<bool>(), 0u64..512).prop_map(|(is_store, address)| MemoryOperation {
        kind: if is_store {
            AccessKind::Store
        } else {
            AccessKind::Load
        },
        address,
        size: 1,
    })
}

fn geometry() -> impl Strategy<Value = CacheConfig> {
    (0u32..=3, 1usize..=4, 0u32..=3).prop_map(|(s, e, b)| CacheConfig::new(s, e, b))
}

fn valid_in_set(cache: &CacheSim, set: usize) -> usize {
    cache.set(set).unwrap().iter().filter(|l| l.valid).count()
}

fn dirty_lines(cache: &CacheSim) -> u64 {
    let sets = cache.config().num_sets() as usize;
    (0..sets)
        .flat_map(|s| cache.set(s).unwrap().iter())
        .filter(|l| l.dirty)
        .count() as u64
}

proptest! {
    #[test]
    fn counters_stay_consistent(
        config in geometry(),
        ops in prop::collection::vec(operation(), 0..300),
    ) {
        let mut cache = CacheSim::new(&config).unwrap();
        let ways = config.lines_per_set;
        let total_lines = config.total_lines().unwrap() as u64;

        for (n, op) in ops.iter().enumerate() {
            let set = cache.decoder().decode(op.address).set_index as usize;
            let full_before = valid_in_set(&cache, set) == ways;

            let outcome = cache.process(*op);
            let stats = *cache.stats();

            prop_assert_eq!(stats.hits + stats.misses, n as u64 + 1);
            prop_assert!(stats.evictions <= stats.misses);
            prop_assert!(!outcome.evicted_dirty || outcome.evicted);
            if outcome.evicted {
                prop_assert!(full_before, "eviction from a set with free lines");
            }
            if !outcome.hit && full_before {
                prop_assert!(outcome.evicted, "miss in a full set must evict");
            }
            prop_assert!(stats.dirty_active <= total_lines);
            prop_assert_eq!(stats.dirty_active, dirty_lines(&cache));
            prop_assert!(cache.occupancy() as u64 <= total_lines);
        }

        let final_stats = cache.finalize();
        let block = u128::from(config.block_bytes());
        prop_assert_eq!(final_stats.dirty_bytes_active % block, 0);
        prop_assert_eq!(final_stats.dirty_bytes_evicted % block, 0);
        prop_assert!(final_stats.dirty_bytes_active <= u128::from(total_lines) * block);
    }

    #[test]
    fn immediate_repeat_always_hits(
        config in geometry(),
        prefix in prop::collection::vec(operation(), 0..50),
        address in 0u64..512,
    ) {
        let mut cache = CacheSim::new(&config).unwrap();
        for op in prefix {
            let _ = cache.process(op);
        }
        let _ = cache.load(address);
        prop_assert!(cache.load(address).hit);
    }

    #[test]
    fn store_leaves_line_dirty(
        config in geometry(),
        prefix in prop::collection::vec(operation(), 0..50),
        address in 0u64..512,
    ) {
        let mut cache = CacheSim::new(&config).unwrap();
        for op in prefix {
            let _ = cache.process(op);
        }
        let _ = cache.store(address);

        let decoded = cache.decoder().decode(address);
        let set = cache.set(decoded.set_index as usize).unwrap();
        let line = set.iter().find(|l| l.valid && l.tag == decoded.tag).unwrap();
        prop_assert!(line.dirty);
        prop_assert_eq!(line.recency, 0);
    }
}
