//! Build configuration loading and validation.
//!
//! Configuration lives in a single `shrinkray.toml` at the raw root. All
//! options are optional — a missing file means stock defaults, and a sparse
//! file overrides just the values it names. Unknown keys are rejected to
//! catch typos early.
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! source_ext = "js"            # The one build-relevant extension
//!
//! [transpile]
//! program = "esbuild"          # Stage 1: lower syntax, strip comments, compact
//! args = ["--loader=js", "--target=es2017", "--minify", "--legal-comments=none"]
//!
//! [obfuscate]
//! program = "terser"           # Stage 2: rename/compress for size and obscurity
//! args = ["--compress", "--mangle"]
//!
//! [processing]
//! max_processes = 4            # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Stage programs are plain filter commands: source text on stdin,
//! transformed text on stdout, non-zero exit on failure. Any tool with that
//! shape can be swapped in per tree.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file within the raw root.
pub const CONFIG_FILENAME: &str = "shrinkray.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Build configuration loaded from `shrinkray.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Extension of build-relevant source files, without the leading dot.
    pub source_ext: String,
    /// Stage 1 — syntax lowering to broadly-compatible, compact output.
    pub transpile: StageCommand,
    /// Stage 2 — rename/compress rewriting.
    pub obfuscate: StageCommand,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

/// One stage's external filter command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StageCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Max parallel file pipelines. Omit for auto (all CPU cores).
    pub max_processes: Option<usize>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            source_ext: "js".to_string(),
            transpile: default_transpile(),
            obfuscate: default_obfuscate(),
            processing: ProcessingConfig::default(),
        }
    }
}

fn default_transpile() -> StageCommand {
    StageCommand {
        program: "esbuild".to_string(),
        args: vec![
            "--loader=js".to_string(),
            "--target=es2017".to_string(),
            "--minify".to_string(),
            "--legal-comments=none".to_string(),
        ],
    }
}

fn default_obfuscate() -> StageCommand {
    StageCommand {
        program: "terser".to_string(),
        args: vec!["--compress".to_string(), "--mangle".to_string()],
    }
}

impl BuildConfig {
    /// Validate semantic constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source_ext.is_empty() {
            return Err(ConfigError::Validation(
                "source_ext must not be empty".to_string(),
            ));
        }
        if self.source_ext.starts_with('.') {
            return Err(ConfigError::Validation(format!(
                "source_ext must not include the leading dot: {:?}",
                self.source_ext
            )));
        }
        for (name, stage) in [("transpile", &self.transpile), ("obfuscate", &self.obfuscate)] {
            if stage.program.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "{name}.program must not be empty"
                )));
            }
        }
        Ok(())
    }
}

/// Load configuration from the raw root. Uses stock defaults if
/// `shrinkray.toml` doesn't exist.
pub fn load_config(root: &Path) -> Result<BuildConfig, ConfigError> {
    let path = root.join(CONFIG_FILENAME);
    if !path.exists() {
        return Ok(BuildConfig::default());
    }
    let content = fs::read_to_string(&path)?;
    let config: BuildConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Effective worker count: configured cap clamped to available cores.
/// Users can constrain down, not up.
pub fn effective_threads(processing: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    processing.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// The stock config file printed by `shrinkray gen-config`, with every
/// option documented.
pub fn stock_config_toml() -> String {
    let defaults = BuildConfig::default();
    format!(
        r#"# shrinkray configuration
#
# Place this file at the root of your raw source tree. All options are
# optional; the values below are the stock defaults. Stage programs are
# filter commands: source text on stdin, transformed text on stdout,
# non-zero exit on failure.

# Extension of build-relevant source files (no leading dot).
source_ext = "{ext}"

# Stage 1: lower modern syntax for broad compatibility, drop comments,
# emit compact output.
[transpile]
program = "{t_prog}"
args = [{t_args}]

# Stage 2: rename/compress the lowered code for size and obscurity.
[obfuscate]
program = "{o_prog}"
args = [{o_args}]

[processing]
# Max parallel file pipelines. Omit for auto (all CPU cores).
# max_processes = 4
"#,
        ext = defaults.source_ext,
        t_prog = defaults.transpile.program,
        t_args = quote_args(&defaults.transpile.args),
        o_prog = defaults.obfuscate.program,
        o_args = quote_args(&defaults.obfuscate.args),
    )
}

fn quote_args(args: &[String]) -> String {
    args.iter()
        .map(|a| format!("{a:?}"))
        .collect::<Vec<_>>()
        .join(", ")
}
