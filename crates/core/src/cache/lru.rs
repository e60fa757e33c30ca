//! Least Recently Used (LRU) set scan.
//!
//! Every valid line carries a `recency` counter: the number of set scans that have
//! passed over it since it was last touched. A hit or fill resets
//! the counter to zero; every valid line scanned before a hit is found (or all
//! valid lines, on a miss) is bumped by one. The victim on a full-set miss is the
//! line with the largest counter, which is the least recently used one.
//!
//! # Scan rules
//!
//! - A valid line with the requested tag is a hit. Scanning stops there, so
//!   lines after it keep their counters for this access.
//! - A valid non-matching line is bumped. It becomes the victim candidate when
//!   its counter *before* the bump is strictly greater than the best seen so far,
//!   so the lowest way wins ties.
//! - The first invalid line is taken as an empty slot and always wins over any
//!   valid candidate.
//!
//! # Performance
//!
//! - **Time Complexity:** O(E) per access, a single pass over the set.
//! - **Space Complexity:** one `u64` counter per line.

use super::{CacheLine, SetScan};

/// Scans one set for `tag`, updating recency counters as it goes.
///
/// `lines` must be non-empty.
pub fn scan(lines: &mut [CacheLine], tag: u64) -> SetScan {
    let mut empty = None;
    let mut victim = 0;
    let mut victim_recency: Option<u64> = None;

    for (way, line) in lines.iter_mut().enumerate() {
        if line.valid && line.tag == tag {
            return SetScan::Hit(way);
        }

        if line.valid {
            let prior = line.recency;
            line.recency = prior.saturating_add(1);
            if victim_recency.is_none_or(|best| prior > best) {
                victim = way;
                victim_recency = Some(prior);
            }
        } else if empty.is_none() {
            empty = Some(way);
        }
    }

    match empty {
        Some(way) => SetScan::EmptySlot(way),
        None => SetScan::ReplaceCandidate(victim),
    }
}
