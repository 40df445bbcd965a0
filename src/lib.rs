//! # shrinkray
//!
//! An incremental build step that shrinks a JavaScript source tree: every
//! source file under a raw root is transpiled to broadly-compatible compact
//! syntax, then obfuscated, and written to a mirrored output tree. Files
//! whose output is already up to date are skipped, so repeat builds only
//! pay for what changed.
//!
//! # Architecture: Scan, Decide, Convert
//!
//! One build run has three moving parts:
//!
//! ```text
//! 1. Scan      raw/  →  candidate list        (filesystem → work items)
//! 2. Decide    per file: stale or unchanged?  (mtime comparison)
//! 3. Convert   source → .tmp-<id> → output    (transpile, then obfuscate)
//! ```
//!
//! The scan is sequential and deterministic; conversion fans the candidate
//! list out over a rayon pool, one independent pipeline per file, and joins
//! on all of them before the run reports. A file's failure is contained to
//! its own report — the build never dies because one file wouldn't parse.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Walks the raw tree and collects candidate source files |
//! | [`stale`] | Mtime-based staleness decision with force override |
//! | [`paths`] | Output-tree mapping and per-run intermediate artifact names |
//! | [`transform`] | The `Transformer` seam and the external filter-command implementation |
//! | [`pipeline`] | Per-file two-stage orchestration, cleanup guarantee, run stats |
//! | [`config`] | `shrinkray.toml` loading, validation, stock config |
//! | [`output`] | CLI output formatting — per-file outcome tags |
//!
//! # Design Decisions
//!
//! ## External Filter Commands
//!
//! The two transforms are not reimplemented here. Each stage is a
//! configured external command with the classic filter shape — text on
//! stdin, text on stdout — behind the [`transform::Transformer`] trait.
//! Stock config uses `esbuild` for lowering and `terser` for mangling, but
//! any tool with that shape drops in per tree. The trait keeps the
//! orchestration testable without either tool installed.
//!
//! ## Timestamp-Only Incrementality
//!
//! Staleness is a single mtime comparison per file: source newer than
//! output (or output missing) means rebuild. No content hashing, no
//! dependency graph — each file stands alone, which is exactly the shape of
//! a minify/obfuscate step. `--force` rebuilds everything.
//!
//! ## Scoped Intermediates
//!
//! The transpile stage writes next to its source as `<name>.tmp-<run-id>`.
//! The run id comes from a process-wide counter, so two runs over the same
//! file can never clobber each other's intermediate, and the orchestrator
//! removes the file on every exit path — a failed build leaves the raw tree
//! exactly as it found it.
//!
//! ## Structured Outcomes
//!
//! Stage results travel as [`pipeline::FileReport`] values, not log
//! strings. The console rendering in [`output`] is one consumer; the run
//! summary and the process exit code are others.

pub mod config;
pub mod output;
pub mod paths;
pub mod pipeline;
pub mod scan;
pub mod stale;
pub mod transform;

#[cfg(test)]
pub(crate) mod test_helpers;
