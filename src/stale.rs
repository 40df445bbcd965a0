//! Staleness detection for incremental builds.
//!
//! Running both pipeline stages over an unchanged file is wasted work, so
//! the orchestrator asks this module first. A source file is stale when its
//! modification time is strictly newer than its output counterpart's, or
//! when the output does not exist yet. A missing output is treated as
//! maximally stale — the first build always processes everything.
//!
//! The comparison is timestamp-only, single-level: no content hashing, no
//! dependency tracking. `git checkout` resets mtimes and will trigger a
//! rebuild; `--force` skips the comparison entirely for a full rebuild.
//!
//! The force flag is threaded through [`BuildOptions`](crate::pipeline::BuildOptions)
//! rather than held in process-global state, so concurrent pipelines only
//! ever read it.

use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StaleError {
    #[error("cannot stat source: {0}")]
    Source(io::Error),
    #[error("cannot stat output: {0}")]
    Output(io::Error),
}

/// Decide whether `source` needs reprocessing relative to `output`.
///
/// Returns true when `force` is set, when `output` does not exist, or when
/// the source mtime is strictly greater than the output mtime. The source
/// must exist — the scanner just listed it — so a stat failure here is
/// surfaced as an error for the caller to contain per-file.
pub fn is_stale(source: &Path, output: &Path, force: bool) -> Result<bool, StaleError> {
    if force {
        return Ok(true);
    }

    let source_mtime = fs::metadata(source)
        .and_then(|m| m.modified())
        .map_err(StaleError::Source)?;

    let output_mtime = match fs::metadata(output) {
        Ok(m) => m.modified().map_err(StaleError::Output)?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(true),
        Err(e) => return Err(StaleError::Output(e)),
    };

    Ok(source_mtime > output_mtime)
}
