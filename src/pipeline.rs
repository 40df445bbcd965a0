//! Per-file pipeline orchestration.
//!
//! For every candidate the scanner found, the orchestrator runs the state
//! machine:
//!
//! ```text
//! Pending → staleness check → Unchanged
//!                           → transpile → failed → cleanup → report
//!                                       → obfuscate → failed  → cleanup → report
//!                                                   → written → cleanup → report
//! ```
//!
//! Failure is contained at file granularity: one file's stage failure,
//! missing mtime, or IO error becomes a [`FileOutcome::Failed`] in that
//! file's report, and every other file proceeds. The intermediate artifact
//! (transpile output) is removed on every path that could have created it;
//! removing an artifact that was never written is a no-op, not an error.
//!
//! [`process_tree`] runs all candidate pipelines on the rayon pool and
//! returns only after every one has reached a terminal state — the
//! candidate list is an explicit task set with a join, not fire-and-forget.
//! Stages within one file are strictly sequential; across files, completion
//! order is unspecified.

use crate::paths;
use crate::stale;
use crate::transform::{Stage, TransformError, Transformer};
use rayon::prelude::*;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

/// Per-run settings, threaded explicitly from the CLI. Read-only once the
/// run starts, so concurrent pipelines share it freely.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// The raw tree being processed.
    pub source_root: PathBuf,
    /// The mirrored tree receiving final outputs.
    pub output_root: PathBuf,
    /// Reprocess everything regardless of timestamps.
    pub force: bool,
}

/// Terminal outcome of one file's pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    /// Output is up to date; no stage ran, no intermediate was created.
    Unchanged,
    /// Both stages completed and the output file was written.
    Converted,
    /// The named stage failed; later stages did not run and the output
    /// file was left in its prior state.
    Failed { stage: Stage, detail: String },
}

/// Structured result for one candidate, consumed programmatically and only
/// rendered to text at the reporting boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    pub source: PathBuf,
    pub output: PathBuf,
    pub outcome: FileOutcome,
}

/// Aggregate counters for a run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    pub converted: u32,
    pub unchanged: u32,
    pub failed: u32,
}

impl RunStats {
    pub fn total(&self) -> u32 {
        self.converted + self.unchanged + self.failed
    }

    fn record(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Unchanged => self.unchanged += 1,
            FileOutcome::Converted => self.converted += 1,
            FileOutcome::Failed { .. } => self.failed += 1,
        }
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.failed > 0 {
            write!(
                f,
                "{} converted, {} unchanged, {} failed ({} total)",
                self.converted,
                self.unchanged,
                self.failed,
                self.total()
            )
        } else {
            write!(
                f,
                "{} converted, {} unchanged ({} total)",
                self.converted,
                self.unchanged,
                self.total()
            )
        }
    }
}

/// Run the full pipeline for one source file. Never panics on per-file
/// trouble; every exit path yields a report.
pub fn process_file(
    transformer: &impl Transformer,
    source: &Path,
    opts: &BuildOptions,
) -> FileReport {
    let output = paths::map_to_output(source, &opts.source_root, &opts.output_root);

    let report = |outcome| FileReport {
        source: source.to_path_buf(),
        output: output.clone(),
        outcome,
    };

    let is_stale = match stale::is_stale(source, &output, opts.force) {
        Ok(s) => s,
        // The first thing a stale file would do is read the source, so a
        // stat failure is reported under the transpile stage.
        Err(e) => {
            return report(FileOutcome::Failed {
                stage: Stage::Transpile,
                detail: e.to_string(),
            });
        }
    };
    if !is_stale {
        return report(FileOutcome::Unchanged);
    }

    let intermediate = paths::intermediate_path(source, paths::next_run_id());
    let outcome = run_stages(transformer, source, &intermediate, &output);

    // Scoped-resource guarantee: the intermediate never survives the run,
    // whatever the stages did.
    let outcome = match (outcome, remove_intermediate(&intermediate)) {
        (FileOutcome::Converted, Err(e)) => FileOutcome::Failed {
            stage: Stage::Obfuscate,
            detail: format!("intermediate left behind: {e}"),
        },
        (outcome, _) => outcome,
    };

    report(outcome)
}

/// Sequence the two stages for one file. The obfuscate stage only runs
/// after a successful transpile.
fn run_stages(
    transformer: &impl Transformer,
    source: &Path,
    intermediate: &Path,
    output: &Path,
) -> FileOutcome {
    if let Err(e) = transpile_file(transformer, source, intermediate) {
        return FileOutcome::Failed {
            stage: Stage::Transpile,
            detail: e.to_string(),
        };
    }

    if let Err(e) = obfuscate_file(transformer, intermediate, output) {
        return FileOutcome::Failed {
            stage: Stage::Obfuscate,
            detail: e.to_string(),
        };
    }

    FileOutcome::Converted
}

/// Stage 1: source → intermediate. The intermediate lands alongside the
/// source, so no directories need creating. Nothing is written on failure.
fn transpile_file(
    transformer: &impl Transformer,
    input: &Path,
    output: &Path,
) -> Result<(), TransformError> {
    let code = fs::read_to_string(input)?;
    let lowered = transformer.transpile(&code)?;
    fs::write(output, lowered)?;
    Ok(())
}

/// Stage 2: intermediate → final output. The output may land in a
/// not-yet-created subdirectory of the output tree, so parent directories
/// are created first. Nothing is written on failure.
fn obfuscate_file(
    transformer: &impl Transformer,
    input: &Path,
    output: &Path,
) -> Result<(), TransformError> {
    let code = fs::read_to_string(input)?;
    let rewritten = transformer.obfuscate(&code)?;
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, rewritten)?;
    Ok(())
}

/// Remove the intermediate artifact. `NotFound` is success — the transpile
/// stage may have failed before ever writing it.
fn remove_intermediate(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Process every candidate on the rayon pool and join on all of them.
///
/// Each finished report is streamed through `events` (when given) for live
/// printing, and folded into the returned [`RunStats`]. Returning implies
/// every pipeline reached a terminal state.
pub fn process_tree(
    transformer: &impl Transformer,
    candidates: &[PathBuf],
    opts: &BuildOptions,
    events: Option<Sender<FileReport>>,
) -> RunStats {
    let reports: Vec<FileReport> = candidates
        .par_iter()
        .map(|source| {
            let report = process_file(transformer, source, opts);
            if let Some(tx) = &events {
                // A dropped receiver only loses live output, never the run
                tx.send(report.clone()).ok();
            }
            report
        })
        .collect();

    let mut stats = RunStats::default();
    for report in &reports {
        stats.record(&report.outcome);
    }
    stats
}
