//! Simulation statistics collection and reporting.
//!
//! This module tracks what the cache did over a trace. It provides:
//! 1. **Running counters:** Hits, misses and evictions per access, plus dirty lines
//!    evicted and dirty lines still resident, all at line granularity.
//! 2. **Final report:** The same counters with the dirty line counts scaled to bytes.
//!
//! Dirty data is tracked per line while simulating and converted to bytes
//! (`lines * 2^b`) only when the run is finalized. Byte counts are `u128`:
//! with `b` up to 63 a handful of dirty lines already exceeds `u64`.

use std::fmt;

use serde::Serialize;

/// Running counters, updated by the cache on every access.
///
/// Every counter is non-negative at all times and `hits + misses` equals the
/// number of accesses processed so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Accesses that found their block resident.
    pub hits: u64,
    /// Accesses that did not.
    pub misses: u64,
    /// Misses that had to displace a valid line.
    pub evictions: u64,
    /// Dirty lines written back by eviction.
    pub dirty_evictions: u64,
    /// Lines currently resident and dirty.
    pub dirty_active: u64,
}

impl Stats {
    /// Total number of accesses processed.
    pub fn accesses(&self) -> u64 {
        self.hits + self.misses
    }

    /// Scales the dirty line counts by the block size and freezes the counters.
    ///
    /// `block_bits` is at most 63 for a validated geometry, so a `u64` line
    /// count shifted by it always fits in `u128`.
    pub fn finalize(&self, block_bits: u32) -> FinalStats {
        FinalStats {
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            dirty_bytes_evicted: u128::from(self.dirty_evictions) << block_bits,
            dirty_bytes_active: u128::from(self.dirty_active) << block_bits,
        }
    }
}

/// Statistics reported once a trace has been fully replayed.
///
/// `hits`, `misses` and `evictions` are access counts; the dirty fields are
/// byte counts and always multiples of the block size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FinalStats {
    /// Number of hits.
    pub hits: u64,
    /// Number of misses.
    pub misses: u64,
    /// Number of evictions.
    pub evictions: u64,
    /// Bytes of dirty data written back by evictions.
    pub dirty_bytes_evicted: u128,
    /// Bytes of dirty data still resident at the end of the trace.
    pub dirty_bytes_active: u128,
}

impl FinalStats {
    /// Fraction of accesses that hit, or `0.0` for an empty trace.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Prints the one-line summary to stdout.
    pub fn print(&self) {
        println!("{self}");
    }

    /// Serializes the statistics as a JSON object.
    ///
    /// # Errors
    ///
    /// Returns the [`serde_json::Error`] if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for FinalStats {
    /// Formats the summary as `hits:H misses:M evictions:V dirty_bytes_in_cache:A dirty_bytes_evicted:D`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hits:{} misses:{} evictions:{} dirty_bytes_in_cache:{} dirty_bytes_evicted:{}",
            self.hits, self.misses, self.evictions, self.dirty_bytes_active, self.dirty_bytes_evicted
        )
    }
}
