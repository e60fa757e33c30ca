//! Set-Associative Cache Simulator.
//!
//! This module implements a single-level set-associative cache with `2^s`
//! sets of `E` lines, each holding one `2^b`-byte block. It models hits,
//! misses, LRU evictions and write-back (dirty) state, and keeps the running
//! [`Stats`] for the run.

/// LRU set scan and victim selection.
pub mod lru;

use std::fmt;

use tracing::{debug, info};

use crate::common::addr::{AddressDecoder, DecodedAddress};
use crate::common::error::ConfigError;
use crate::config::CacheConfig;
use crate::stats::{FinalStats, Stats};
use crate::trace::{AccessKind, MemoryOperation};

/// Cache line entry containing tag, validity, dirty bit and LRU counter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheLine {
    /// Tag of the block held by this line.
    pub tag: u64,
    /// Whether the line holds a block.
    pub valid: bool,
    /// Whether the block has been written since it was filled.
    pub dirty: bool,
    /// Scans since this line was last hit or filled.
    pub recency: u64,
}

/// Result of scanning one set for a tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetScan {
    /// A valid line holds the tag.
    Hit(usize),
    /// Miss; this way is the first invalid line in the set.
    EmptySlot(usize),
    /// Miss in a full set; this way is the LRU victim.
    ReplaceCandidate(usize),
}

/// What a single access did to the cache.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    /// The block was resident.
    pub hit: bool,
    /// A valid line was displaced.
    pub evicted: bool,
    /// The displaced line was dirty and had to be written back.
    pub evicted_dirty: bool,
}

impl fmt::Display for Outcome {
    /// Formats the outcome as `hit`, `miss`, `miss eviction` or `miss eviction dirty`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hit {
            return write!(f, "hit");
        }
        write!(f, "miss")?;
        if self.evicted {
            write!(f, " eviction")?;
        }
        if self.evicted_dirty {
            write!(f, " dirty")?;
        }
        Ok(())
    }
}

/// Cache simulator for one set-associative, write-back, LRU cache.
///
/// Lines are stored in one flat vector indexed by `set * E + way`.
#[derive(Debug, Clone)]
pub struct CacheSim {
    config: CacheConfig,
    decoder: AddressDecoder,
    lines: Vec<CacheLine>,
    ways: usize,
    stats: Stats,
}

impl CacheSim {
    /// Creates an empty cache for the given geometry.
    ///
    /// Every line starts invalid and clean, and all counters start at zero.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] from [`CacheConfig::validate`]; no cache is
    /// built for an invalid geometry. A geometry whose lines cannot be
    /// allocated is reported as [`ConfigError::TooLarge`].
    pub fn new(config: &CacheConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let total = config.total_lines().ok_or_else(|| config.too_large())?;
        let mut lines = Vec::new();
        lines
            .try_reserve_exact(total)
            .map_err(|_| config.too_large())?;
        lines.resize(total, CacheLine::default());

        info!(
            sets = config.num_sets(),
            ways = config.lines_per_set,
            block_bytes = config.block_bytes(),
            "cache configured"
        );

        Ok(Self {
            config: *config,
            decoder: AddressDecoder::new(config.set_index_bits, config.block_bits),
            lines,
            ways: config.lines_per_set,
            stats: Stats::default(),
        })
    }

    /// The geometry this cache was built with.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// The address decoder for this geometry.
    pub fn decoder(&self) -> &AddressDecoder {
        &self.decoder
    }

    /// Running counters at line granularity.
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// The lines of one set, or `None` if `set` is out of range.
    pub fn set(&self, set: usize) -> Option<&[CacheLine]> {
        let base = set.checked_mul(self.ways)?;
        let end = base.checked_add(self.ways)?;
        self.lines.get(base..end)
    }

    /// One line, or `None` if `set` or `way` is out of range.
    pub fn line(&self, set: usize, way: usize) -> Option<&CacheLine> {
        if way >= self.ways {
            return None;
        }
        self.set(set).and_then(|lines| lines.get(way))
    }

    /// Number of valid lines in the whole cache.
    pub fn occupancy(&self) -> usize {
        self.lines.iter().filter(|line| line.valid).count()
    }

    /// Simulates one access and returns what it did.
    ///
    /// The set is scanned once (see [`lru::scan`]); the result is then resolved
    /// as a hit, a fill into an empty slot or an eviction of the LRU line. A
    /// store finally marks the touched line dirty.
    pub fn process(&mut self, op: MemoryOperation) -> Outcome {
        let DecodedAddress { tag, set_index, .. } = self.decoder.decode(op.address);
        // set_index < 2^s, and 2^s * E fits in usize.
        let base = set_index as usize * self.ways;
        let set = &mut self.lines[base..base + self.ways];

        let mut outcome = Outcome::default();
        let way = match lru::scan(set, tag) {
            SetScan::Hit(way) => {
                self.stats.hits += 1;
                set[way].recency = 0;
                outcome.hit = true;
                way
            }
            SetScan::EmptySlot(way) => {
                self.stats.misses += 1;
                set[way] = CacheLine {
                    tag,
                    valid: true,
                    dirty: false,
                    recency: 0,
                };
                way
            }
            SetScan::ReplaceCandidate(way) => {
                self.stats.misses += 1;
                self.stats.evictions += 1;
                outcome.evicted = true;

                let victim = &mut set[way];
                if victim.dirty {
                    self.stats.dirty_evictions += 1;
                    self.stats.dirty_active -= 1;
                    victim.dirty = false;
                    outcome.evicted_dirty = true;
                }
                debug!(set = set_index, way, old_tag = victim.tag, new_tag = tag, "evict");
                victim.tag = tag;
                victim.recency = 0;
                way
            }
        };

        if op.kind == AccessKind::Store && !set[way].dirty {
            self.stats.dirty_active += 1;
            set[way].dirty = true;
        }

        debug!("{op} -> set {set_index} tag {tag:#x} way {way}: {outcome}");
        outcome
    }

    /// Simulates a load of `address`.
    pub fn load(&mut self, address: u64) -> Outcome {
        self.process(MemoryOperation::load(address, 0))
    }

    /// Simulates a store to `address`.
    pub fn store(&mut self, address: u64) -> Outcome {
        self.process(MemoryOperation::store(address, 0))
    }

    /// Final statistics with dirty counts scaled to bytes.
    pub fn finalize(&self) -> FinalStats {
        self.stats.finalize(self.config.block_bits)
    }
}
