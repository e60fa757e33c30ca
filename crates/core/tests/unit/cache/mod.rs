//! Cache tests.



/// Write-back (dirty line) accounting.
pub mod dirty_accounting;

/// Randomized trace invariants.
pub mod invariants;
