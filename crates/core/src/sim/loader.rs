//! Trace file loading.
//!
//! Opens a trace file for lazy, line-by-line parsing. Nothing is read until
//! the returned [`TraceReader`] is iterated.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::common::error::SimError;
use crate::trace::TraceReader;

/// Opens a trace file for reading.
///
/// # Errors
///
/// Returns [`SimError::Open`] if the file cannot be opened.
pub fn open_trace(path: impl AsRef<Path>) -> Result<TraceReader<BufReader<File>>, SimError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| SimError::Open {
        path: path.display().to_string(),
        source,
    })?;
    Ok(TraceReader::new(BufReader::new(file)))
}
