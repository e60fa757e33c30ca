//! Common utilities and types used throughout the cache simulator.
//!
//! This module provides the building blocks shared by the cache, the trace
//! parser and the simulation driver. It includes:
//! 1. **Address Decoding:** Splitting a 64-bit address into tag, set index and block offset.
//! 2. **Error Handling:** Configuration, trace and simulation error types.

/// Address decoding (tag / set index / block offset).
pub mod addr;

/// Error types for configuration, trace parsing and simulation.
pub mod error;

pub use addr::{AddressDecoder, DecodedAddress, decode};
pub use error::{ConfigError, SimError, TraceError};
