//! Candidate discovery: walk the raw tree and collect source files.
//!
//! The scanner is the front of the pipeline. It walks the raw root
//! depth-first in pre-order — each directory's entries in file-name order,
//! subdirectory contents interleaved where the subdirectory sits in that
//! order — and collects every file carrying the build-relevant extension.
//! Everything else (assets, editor droppings, leftover `.tmp-<id>`
//! intermediates from a crashed run) is silently skipped.
//!
//! Symbolic links are not followed, so a link cycle under the raw root
//! cannot hang the walk.
//!
//! A directory that cannot be listed aborts the whole scan. The candidate
//! list is collected up front rather than streamed: the orchestrator
//! processes it as one explicit task set and joins on all of it, so the run
//! has a defined completion point.

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("source root is not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("cannot read directory entry: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Collect all files under `root` whose extension matches `extension`
/// (case-insensitive, without the leading dot), in deterministic walk order.
pub fn scan(root: &Path, extension: &str) -> Result<Vec<PathBuf>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let mut candidates = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && has_extension(entry.path(), extension) {
            candidates.push(entry.into_path());
        }
    }
    Ok(candidates)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}
