//! Memory traces.
//!
//! This module turns a line-oriented trace into [`MemoryOperation`]s. Each
//! non-empty line has the form
//!
//! ```text
//! L 7ff000398,8
//! S 0x10, 4
//! ```
//!
//! that is, an operation code (`L` for load, `S` for store), a hexadecimal
//! address (the `0x` prefix is optional) and an optional decimal size.
//! Tokens are separated by spaces, tabs or commas. Blank lines are skipped.
//!
//! [`TraceReader`] parses lazily, so a trace is never materialized in memory.

use std::fmt;
use std::io::{self, BufRead};

use crate::common::error::TraceError;

/// Direction of a memory access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessKind {
    /// A read (`L`).
    Load,
    /// A write (`S`); marks the touched line dirty.
    Store,
}

impl AccessKind {
    /// The single-letter trace code for this access.
    pub fn code(self) -> char {
        match self {
            Self::Load => 'L',
            Self::Store => 'S',
        }
    }
}

impl fmt::Display for AccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One access from a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryOperation {
    /// Load or store.
    pub kind: AccessKind,
    /// Byte address of the access.
    pub address: u64,
    /// Access width in bytes. Recorded but not used by the cache.
    pub size: u64,
}

impl MemoryOperation {
    /// A load of `size` bytes at `address`.
    pub fn load(address: u64, size: u64) -> Self {
        Self {
            kind: AccessKind::Load,
            address,
            size,
        }
    }

    /// A store of `size` bytes at `address`.
    pub fn store(address: u64, size: u64) -> Self {
        Self {
            kind: AccessKind::Store,
            address,
            size,
        }
    }
}

impl fmt::Display for MemoryOperation {
    /// Formats the operation the way it appears in a trace: `L 1f,8`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:x},{}", self.kind, self.address, self.size)
    }
}

fn is_separator(c: char) -> bool {
    c == ',' || c.is_whitespace()
}

fn parse_address(line: usize, token: &str) -> Result<u64, TraceError> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    u64::from_str_radix(digits, 16).map_err(|_| TraceError::InvalidAddress {
        line,
        token: token.to_owned(),
    })
}

/// Parses a single trace line.
///
/// Returns `Ok(None)` for a blank line. `line` is the 1-based line number
/// used in error reports. Tokens after the size are ignored.
///
/// # Errors
///
/// - [`TraceError::UnknownOperation`] when the operation code is not `L` or `S`.
/// - [`TraceError::MissingAddress`] when the line holds only an operation code.
/// - [`TraceError::InvalidAddress`] / [`TraceError::InvalidSize`] for malformed numbers.
pub fn parse_line(line: usize, text: &str) -> Result<Option<MemoryOperation>, TraceError> {
    let mut tokens = text.split(is_separator).filter(|t| !t.is_empty());

    let Some(op) = tokens.next() else {
        return Ok(None);
    };
    let kind = match op {
        "L" => AccessKind::Load,
        "S" => AccessKind::Store,
        other => {
            return Err(TraceError::UnknownOperation {
                line,
                op: other.to_owned(),
            });
        }
    };

    let address = match tokens.next() {
        Some(token) => parse_address(line, token)?,
        None => return Err(TraceError::MissingAddress { line }),
    };

    let size = match tokens.next() {
        Some(token) => token.parse().map_err(|_| TraceError::InvalidSize {
            line,
            token: token.to_owned(),
        })?,
        None => 0,
    };

    Ok(Some(MemoryOperation {
        kind,
        address,
        size,
    }))
}

/// Lazy iterator over the operations of a trace.
///
/// Yields one `Result` per non-blank line, in file order. After an error the
/// caller is expected to stop; the reader itself keeps going.
#[derive(Debug)]
pub struct TraceReader<R> {
    lines: io::Lines<R>,
    line: usize,
}

impl<R: BufRead> TraceReader<R> {
    /// Wraps a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
        }
    }

    /// Number of lines consumed so far, including blank ones.
    pub fn line(&self) -> usize {
        self.line
    }
}

impl<'a> TraceReader<&'a [u8]> {
    /// Reads a trace held in memory.
    pub fn from_text(text: &'a str) -> Self {
        Self::new(text.as_bytes())
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<MemoryOperation, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let text = self.lines.next()?;
            self.line += 1;
            let text = match text {
                Ok(text) => text,
                Err(source) => {
                    return Some(Err(TraceError::Io {
                        line: self.line,
                        source,
                    }));
                }
            };
            match parse_line(self.line, &text) {
                Ok(Some(op)) => return Some(Ok(op)),
                Ok(None) => {}
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
