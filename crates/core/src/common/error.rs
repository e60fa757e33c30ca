//! Error definitions for the cache simulator.
//!
//! This module defines the failure modes that can stop a simulation run. It provides:
//! 1. **Configuration Errors:** Rejected cache geometries, raised before any access is simulated.
//! 2. **Trace Errors:** Malformed trace lines, each tagged with its 1-based line number.
//! 3. **Simulation Errors:** The union of the two, returned by the simulation driver.
//!
//! The per-access cache algorithm itself has no error paths.

use std::io;

use thiserror::Error;

/// A cache geometry that cannot be simulated.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Associativity `E` was zero.
    #[error("lines per set (E) must be greater than 0")]
    ZeroLinesPerSet,

    /// `s + b` leaves no room for a tag in a 64-bit address.
    #[error("set index bits ({set_index_bits}) + block bits ({block_bits}) exceed 63")]
    AddressBitsOverflow {
        /// Requested `s`.
        set_index_bits: u32,
        /// Requested `b`.
        block_bits: u32,
    },

    /// `2^s * E` lines cannot be addressed or allocated on this host.
    #[error("cache with 2^{set_index_bits} sets of {lines_per_set} lines is too large")]
    TooLarge {
        /// Requested `s`.
        set_index_bits: u32,
        /// Requested `E`.
        lines_per_set: usize,
    },

    /// A JSON configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A configuration file could not be read.
    #[error("could not read configuration: {0}")]
    Io(#[from] io::Error),
}

/// A trace line that could not be turned into a memory operation.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The operation code was neither `L` nor `S`.
    #[error("line {line}: unknown operation '{op}'")]
    UnknownOperation {
        /// 1-based line number.
        line: usize,
        /// The offending token.
        op: String,
    },

    /// The line held an operation but no address.
    #[error("line {line}: missing address")]
    MissingAddress {
        /// 1-based line number.
        line: usize,
    },

    /// The address was not a hexadecimal 64-bit value.
    #[error("line {line}: invalid address '{token}'")]
    InvalidAddress {
        /// 1-based line number.
        line: usize,
        /// The offending token.
        token: String,
    },

    /// The size was not a decimal integer.
    #[error("line {line}: invalid size '{token}'")]
    InvalidSize {
        /// 1-based line number.
        line: usize,
        /// The offending token.
        token: String,
    },

    /// The underlying reader failed.
    #[error("line {line}: read failed: {source}")]
    Io {
        /// 1-based line number of the failed read.
        line: usize,
        /// The I/O error.
        #[source]
        source: io::Error,
    },
}

/// Any error that stops a simulation run.
#[derive(Debug, Error)]
pub enum SimError {
    /// The cache geometry was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The trace could not be parsed.
    #[error(transparent)]
    Trace(#[from] TraceError),

    /// The trace file could not be opened.
    #[error("could not open trace '{path}': {source}")]
    Open {
        /// Path that was requested.
        path: String,
        /// The I/O error.
        #[source]
        source: io::Error,
    },
}
