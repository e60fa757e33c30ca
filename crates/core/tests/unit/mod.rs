//! # Unit Components
//!
//! Tests for each part of the simulator: address decoding and errors, the
//! cache itself, configuration, trace parsing, the driver and statistics.


/// Unit tests for the set-associative cache.
///
/// Covers hit/miss resolution, LRU victim selection, dirty-line accounting
/// and randomized invariant checks.
pub mod cache;
