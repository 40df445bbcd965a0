//! Path derivation for the mirrored output tree and intermediate artifacts.
//!
//! Every source file under the raw root maps to exactly one output path:
//! the raw-root segment is replaced by the output root and everything below
//! it is preserved. The mapping depends only on path structure, never on
//! file contents.
//!
//! ```text
//! raw/vendor/util/format.js  →  dist/vendor/util/format.js
//! ```
//!
//! The transpile stage writes to an intermediate file alongside the source.
//! Its name embeds a process-wide run counter, so two pipeline runs over the
//! same source file can never alias each other's intermediate:
//!
//! ```text
//! raw/app.js  →  raw/app.js.tmp-17
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static RUN_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Next run identifier for an intermediate artifact name. Monotonic for the
/// lifetime of the process.
pub fn next_run_id() -> u64 {
    RUN_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Map a source path to its output-tree counterpart.
///
/// Replaces the `source_root` prefix with `output_root`, preserving all path
/// segments below it. Callers only pass paths produced by the scanner, which
/// are always under the source root.
pub fn map_to_output(source: &Path, source_root: &Path, output_root: &Path) -> PathBuf {
    let rel = source.strip_prefix(source_root).unwrap();
    output_root.join(rel)
}

/// Intermediate artifact path for one pipeline run over `source`.
///
/// Stays in the source file's directory; the `.tmp-<run_id>` suffix keeps it
/// out of the scanner's extension filter and unique per run.
pub fn intermediate_path(source: &Path, run_id: u64) -> PathBuf {
    let name = source.file_name().unwrap().to_string_lossy();
    source.with_file_name(format!("{name}.tmp-{run_id}"))
}
