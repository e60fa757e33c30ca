//! # Dirty Accounting Tests
//!
//! Write-back state: stores dirty lines, evictions move dirty lines from the
//! resident count to the evicted count, and final figures are in bytes.

use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::{HIT, MISS, MISS_EVICT, MISS_EVICT_DIRTY, TestContext, load, store};

#[test]
fn dirty_line_moves_from_active_to_evicted() {
    let mut ctx = TestContext::new(0, 1, 0);

    assert_eq!(ctx.run(&[store(0x0)]), vec![MISS]);
    assert_eq!(ctx.sim.cache.stats().dirty_active, 1);
    assert_eq!(ctx.finalize().dirty_bytes_active, 1);

    assert_eq!(ctx.run(&[load(0x1)]), vec![MISS_EVICT_DIRTY]);
    let stats = ctx.finalize();
    assert_eq!(stats.dirty_bytes_active, 0);
    assert_eq!(stats.dirty_bytes_evicted, 1);
    assert!(!ctx.sim.cache.line(0, 0).unwrap().dirty);
}

#[rstest]
#[case(0, 1)]
#[case(4, 16)]
#[case(6, 64)]
fn dirty_counts_scale_by_block_size(#[case] b: u32, #[case] block_bytes: u128) {
    let mut ctx = TestContext::new(0, 1, b);
    let block = 1u64 << b;
    let _ = ctx.run(&[store(0x0), load(block)]);

    let stats = ctx.finalize();
    assert_eq!(stats.dirty_bytes_evicted, block_bytes);
    assert_eq!(stats.dirty_bytes_active, 0);
}

#[test]
fn dirty_bytes_beyond_u64_at_widest_block() {
    // b = 63: each block is 2^63 bytes, two dirty lines hold 2^64.
    let mut ctx = TestContext::new(0, 2, 63);
    let outcomes = ctx.run(&[store(0x0), store(0x8000_0000_0000_0000)]);

    assert_eq!(outcomes, vec![MISS, MISS]);
    assert_eq!(ctx.sim.cache.stats().dirty_active, 2);
    assert_eq!(ctx.finalize().dirty_bytes_active, 1u128 << 64);

    let _ = ctx.run(&[load(0x0), load(0x8000_0000_0000_0001)]);
    assert_eq!(ctx.finalize().dirty_bytes_active, 1u128 << 64);

    let mut ctx = TestContext::new(0, 1, 63);
    let _ = ctx.run(&[store(0x0), store(0x8000_0000_0000_0000), load(0x0)]);
    let stats = ctx.finalize();
    assert_eq!(stats.dirty_bytes_evicted, 1u128 << 64);
    assert_eq!(stats.dirty_bytes_active, 0);
}

#[test]
fn repeated_stores_count_line_once() {
    let mut ctx = TestContext::new(0, 1, 3);
    let outcomes = ctx.run(&[store(0x0), store(0x0), store(0x7)]);

    assert_eq!(outcomes, vec![MISS, HIT, HIT]);
    assert_eq!(ctx.sim.cache.stats().dirty_active, 1);
    assert_eq!(ctx.finalize().dirty_bytes_active, 8);
}

#[test]
fn load_hit_keeps_line_dirty() {
    let mut ctx = TestContext::new(0, 1, 0);
    let _ = ctx.run(&[store(0x5), load(0x5)]);

    assert!(ctx.sim.cache.line(0, 0).unwrap().dirty);
    assert_eq!(ctx.sim.cache.stats().dirty_active, 1);
}

#[test]
fn store_on_eviction_dirties_the_new_block() {
    let mut ctx = TestContext::new(0, 1, 0);
    let outcomes = ctx.run(&[store(0x0), store(0x1)]);

    assert_eq!(outcomes, vec![MISS, MISS_EVICT_DIRTY]);
    let stats = ctx.sim.cache.stats();
    assert_eq!(stats.dirty_evictions, 1);
    assert_eq!(stats.dirty_active, 1);
    assert!(ctx.sim.cache.line(0, 0).unwrap().dirty);
}

#[test]
fn clean_eviction_does_not_touch_dirty_counts() {
    let mut ctx = TestContext::new(0, 1, 0);
    let outcomes = ctx.run(&[load(0x0), store(0x1)]);

    assert_eq!(outcomes, vec![MISS, MISS_EVICT]);
    let stats = ctx.sim.cache.stats();
    assert_eq!(stats.dirty_evictions, 0);
    assert_eq!(stats.dirty_active, 1);
}

#[test]
fn dirty_lines_tracked_per_set() {
    // s = 1, b = 2: 0x0 -> set 0, 0x4 -> set 1, 0x8 -> set 0 (tag 1).
    let mut ctx = TestContext::new(1, 1, 2);
    let _ = ctx.run(&[store(0x0), store(0x4), load(0x8)]);

    let stats = ctx.finalize();
    assert_eq!(stats.dirty_bytes_evicted, 4);
    assert_eq!(stats.dirty_bytes_active, 4);
    assert!(!ctx.sim.cache.line(0, 0).unwrap().dirty);
    assert!(ctx.sim.cache.line(1, 0).unwrap().dirty);
}

#[test]
fn active_dirty_matches_dirty_lines_in_cache() {
    let mut ctx = TestContext::new(1, 2, 1);
    let _ = ctx.run(&[
        store(0x0),
        store(0x2),
        store(0x4),
        load(0x6),
        store(0x8),
        load(0xA),
        store(0x0),
    ]);

    let dirty_lines = (0..2)
        .flat_map(|set| ctx.sim.cache.set(set).unwrap().iter())
        .filter(|line| line.dirty)
        .count() as u64;
    assert_eq!(ctx.sim.cache.stats().dirty_active, dirty_lines);
}
