//! Configuration for the cache simulator.
//!
//! This module defines the cache geometry used to build a [`CacheSim`](crate::CacheSim). It provides:
//! 1. **Defaults:** Baseline geometry used when a JSON document omits a field.
//! 2. **Structure:** The `s` / `E` / `b` triple and the quantities derived from it.
//! 3. **Validation:** Rejection of geometries that cannot be simulated, before any access runs.
//!
//! Configuration comes either from command-line flags or from a JSON document.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cache::CacheLine;
use crate::common::addr::MAX_ADDRESS_BITS;
use crate::common::error::ConfigError;

/// Default geometry constants.
mod defaults {
    /// Default number of set-index bits (16 sets).
    pub const SET_INDEX_BITS: u32 = 4;

    /// Default associativity (direct-mapped).
    pub const LINES_PER_SET: usize = 1;

    /// Default number of block bits (16-byte blocks).
    pub const BLOCK_BITS: u32 = 4;
}

/// Geometry of a single set-associative cache.
///
/// # Examples
///
/// ```
/// use csim_core::config::CacheConfig;
///
/// let config = CacheConfig::new(4, 2, 4);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.num_sets(), 16);
/// assert_eq!(config.block_bytes(), 16);
/// ```
///
/// Deserializing from JSON, with omitted fields taking their defaults:
///
/// ```
/// use csim_core::config::CacheConfig;
///
/// let config = CacheConfig::from_json(r#"{ "set_index_bits": 5, "lines_per_set": 8 }"#).unwrap();
/// assert_eq!(config.lines_per_set, 8);
/// assert_eq!(config.block_bits, 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Number of set-index bits `s`; the cache has `2^s` sets.
    #[serde(alias = "s")]
    pub set_index_bits: u32,
    /// Associativity `E`; the number of lines in each set.
    #[serde(alias = "E")]
    pub lines_per_set: usize,
    /// Number of block bits `b`; each block holds `2^b` bytes.
    #[serde(alias = "b")]
    pub block_bits: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            set_index_bits: defaults::SET_INDEX_BITS,
            lines_per_set: defaults::LINES_PER_SET,
            block_bits: defaults::BLOCK_BITS,
        }
    }
}

impl CacheConfig {
    /// Creates a configuration from the classic `-s`, `-E`, `-b` triple.
    pub fn new(set_index_bits: u32, lines_per_set: usize, block_bits: u32) -> Self {
        Self {
            set_index_bits,
            lines_per_set,
            block_bits,
        }
    }

    /// Parses a configuration from a JSON document.
    ///
    /// The result is not validated; call [`validate`](Self::validate) or
    /// let [`CacheSim::new`](crate::CacheSim::new) do it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or mistyped fields.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if its contents are not a valid configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Checks that the geometry can be simulated.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ZeroLinesPerSet`] when `E == 0`.
    /// - [`ConfigError::AddressBitsOverflow`] when `s + b > 63`.
    /// - [`ConfigError::TooLarge`] when the `2^s * E` lines cannot be addressed
    ///   as one array on this host.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lines_per_set == 0 {
            return Err(ConfigError::ZeroLinesPerSet);
        }
        if u64::from(self.set_index_bits) + u64::from(self.block_bits) > u64::from(MAX_ADDRESS_BITS)
        {
            return Err(ConfigError::AddressBitsOverflow {
                set_index_bits: self.set_index_bits,
                block_bits: self.block_bits,
            });
        }
        if self.total_lines().is_none() {
            return Err(self.too_large());
        }
        Ok(())
    }

    pub(crate) const fn too_large(&self) -> ConfigError {
        ConfigError::TooLarge {
            set_index_bits: self.set_index_bits,
            lines_per_set: self.lines_per_set,
        }
    }

    /// Number of sets, `2^s`.
    ///
    /// Only meaningful for a validated configuration.
    pub fn num_sets(&self) -> u64 {
        1u64 << self.set_index_bits
    }

    /// Block size in bytes, `2^b`.
    ///
    /// Only meaningful for a validated configuration.
    pub fn block_bytes(&self) -> u64 {
        1u64 << self.block_bits
    }

    /// Total number of lines, `2^s * E`.
    ///
    /// `None` if the count does not fit in `usize` or the line array would
    /// exceed `isize::MAX` bytes, the largest allocation Rust permits.
    pub fn total_lines(&self) -> Option<usize> {
        if self.set_index_bits >= usize::BITS {
            return None;
        }
        let lines = (1usize << self.set_index_bits).checked_mul(self.lines_per_set)?;
        let bytes = lines.checked_mul(size_of::<CacheLine>())?;
        (bytes <= isize::MAX.unsigned_abs()).then_some(lines)
    }
}
