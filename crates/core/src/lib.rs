//! Trace-driven cache simulator library.
//!
//! This crate replays a trace of loads and stores against a single
//! set-associative cache and reports what happened. It provides:
//! 1. **Common:** Address decoding into tag/set/offset fields and the error types.
//! 2. **Cache:** The set-associative lookup, LRU replacement and dirty-line accounting.
//! 3. **Configuration:** Cache geometry (`s`, `E`, `b`), validation and JSON loading.
//! 4. **Trace:** A lazy parser for `L addr,size` / `S addr,size` trace files.
//! 5. **Simulation:** A driver that feeds a trace through the cache, plus statistics.

/// Common types (address decoding, errors).
pub mod common;
/// Cache geometry configuration (defaults, validation, JSON loading).
pub mod config;
/// Set-associative cache with LRU replacement and write-back accounting.
pub mod cache;
/// Trace driver and trace-file loader.
pub mod sim;
/// Hit/miss/eviction counters and final byte-scaled statistics.
pub mod stats;
/// Memory operations and the line-oriented trace parser.
pub mod trace;

/// The cache simulator; build with `CacheSim::new(&config)`.
pub use crate::cache::CacheSim;
/// Cache geometry; use `CacheConfig::new(s, e, b)` or deserialize from JSON.
pub use crate::config::CacheConfig;
/// Trace driver owning a `CacheSim`.
pub use crate::sim::Simulator;
/// Final statistics reported once a trace has been replayed.
pub use crate::stats::FinalStats;
