//! CLI output formatting for scan, check, and build runs.
//!
//! Reporting is per file, keyed by the mapped output path — the thing the
//! user ships — with a bracketed outcome tag per stage:
//!
//! ```text
//! dist/lib/util.js:    [transpile success]
//! dist/lib/util.js:    [obfuscate success]
//! dist/broken.js:    [transpile failed] - esbuild exited with 1: unexpected token
//! dist/app.js:    [no changes]
//! ```
//!
//! The tags are advisory, not a machine-readable protocol; scripts wanting
//! structure should consume [`FileReport`](crate::pipeline::FileReport)
//! through the library API instead.
//!
//! Each surface has a `format_*` function (returns lines) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure
//! — no I/O, no side effects.

use crate::pipeline::{FileOutcome, FileReport};
use crate::transform::Stage;
use std::path::{Path, PathBuf};

/// Separator between the output path and its outcome tag.
const SEP: &str = ":    ";

/// Format one file's report: one line per stage outcome.
///
/// A converted file shows both stage successes; an obfuscate failure still
/// shows the transpile success that preceded it.
pub fn format_file_report(report: &FileReport) -> Vec<String> {
    let path = report.output.display();
    match &report.outcome {
        FileOutcome::Unchanged => vec![format!("{path}{SEP}[no changes]")],
        FileOutcome::Converted => vec![
            format!("{path}{SEP}[transpile success]"),
            format!("{path}{SEP}[obfuscate success]"),
        ],
        FileOutcome::Failed { stage, detail } => {
            let mut lines = Vec::new();
            if *stage == Stage::Obfuscate {
                lines.push(format!("{path}{SEP}[transpile success]"));
            }
            lines.push(format!("{path}{SEP}[{stage} failed] - {detail}"));
            lines
        }
    }
}

/// Format the candidate listing for `shrinkray scan`.
pub fn format_scan_output(candidates: &[PathBuf], root: &Path) -> Vec<String> {
    let mut lines = vec!["Sources".to_string()];
    for candidate in candidates {
        let shown = candidate.strip_prefix(root).unwrap_or(candidate);
        lines.push(format!("    {}", shown.display()));
    }
    let n = candidates.len();
    lines.push(format!(
        "{n} candidate {}",
        if n == 1 { "file" } else { "files" }
    ));
    lines
}

/// Format one staleness line for `shrinkray check`.
pub fn format_check_line(output: &Path, stale: bool) -> String {
    let tag = if stale { "[stale]" } else { "[up to date]" };
    format!("{}{SEP}{tag}", output.display())
}

pub fn print_file_report(report: &FileReport) {
    for line in format_file_report(report) {
        println!("{line}");
    }
}

pub fn print_scan_output(candidates: &[PathBuf], root: &Path) {
    for line in format_scan_output(candidates, root) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Stage;
    use std::path::PathBuf;

    fn report(outcome: FileOutcome) -> FileReport {
        FileReport {
            source: PathBuf::from("raw/lib/util.js"),
            output: PathBuf::from("dist/lib/util.js"),
            outcome,
        }
    }

    #[test]
    fn unchanged_is_one_line() {
        let lines = format_file_report(&report(FileOutcome::Unchanged));
        assert_eq!(lines, vec!["dist/lib/util.js:    [no changes]"]);
    }

    #[test]
    fn converted_shows_both_stage_successes() {
        let lines = format_file_report(&report(FileOutcome::Converted));
        assert_eq!(
            lines,
            vec![
                "dist/lib/util.js:    [transpile success]",
                "dist/lib/util.js:    [obfuscate success]",
            ]
        );
    }

    #[test]
    fn transpile_failure_is_one_tagged_line() {
        let lines = format_file_report(&report(FileOutcome::Failed {
            stage: Stage::Transpile,
            detail: "unexpected token".to_string(),
        }));
        assert_eq!(
            lines,
            vec!["dist/lib/util.js:    [transpile failed] - unexpected token"]
        );
    }

    #[test]
    fn obfuscate_failure_keeps_the_preceding_success() {
        let lines = format_file_report(&report(FileOutcome::Failed {
            stage: Stage::Obfuscate,
            detail: "mangler choked".to_string(),
        }));
        assert_eq!(
            lines,
            vec![
                "dist/lib/util.js:    [transpile success]",
                "dist/lib/util.js:    [obfuscate failed] - mangler choked",
            ]
        );
    }

    #[test]
    fn scan_output_lists_relative_paths_and_count() {
        let candidates = vec![
            PathBuf::from("raw/a.js"),
            PathBuf::from("raw/lib/b.js"),
        ];
        let lines = format_scan_output(&candidates, Path::new("raw"));
        assert_eq!(
            lines,
            vec!["Sources", "    a.js", "    lib/b.js", "2 candidate files"]
        );
    }

    #[test]
    fn scan_output_singular_count() {
        let candidates = vec![PathBuf::from("raw/a.js")];
        let lines = format_scan_output(&candidates, Path::new("raw"));
        assert_eq!(lines.last().unwrap(), "1 candidate file");
    }

    #[test]
    fn scan_output_empty_tree() {
        let lines = format_scan_output(&[], Path::new("raw"));
        assert_eq!(lines, vec!["Sources", "0 candidate files"]);
    }

    #[test]
    fn check_lines() {
        assert_eq!(
            format_check_line(Path::new("dist/a.js"), true),
            "dist/a.js:    [stale]"
        );
        assert_eq!(
            format_check_line(Path::new("dist/a.js"), false),
            "dist/a.js:    [up to date]"
        );
    }
}
