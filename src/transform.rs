//! Transform capability trait and the external-command implementation.
//!
//! The [`Transformer`] trait defines the two text-to-text operations the
//! pipeline needs: transpile (syntax lowering) and obfuscate
//! (rename/compress rewriting). The rest of the codebase is
//! implementation-agnostic — the orchestrator sequences stages without
//! knowing what runs them.
//!
//! The production implementation is [`CommandTransformer`]: each stage is a
//! configured external filter command that receives the source text on
//! stdin and answers with the transformed text on stdout. Non-zero exit
//! signals failure, with stderr as the detail. Tests substitute a recording
//! mock instead of spawning anything.

use crate::config::{BuildConfig, StageCommand};
use std::fmt;
use std::io::Write;
use std::process::{Command, Stdio};
use thiserror::Error;

/// The two pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Transpile,
    Obfuscate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Transpile => write!(f, "transpile"),
            Stage::Obfuscate => write!(f, "obfuscate"),
        }
    }
}

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Failed(String),
    #[error("transform output is not valid UTF-8")]
    NonUtf8Output,
}

/// Trait for transform capabilities.
///
/// Both operations share one contract: UTF-8 text in, UTF-8 text out,
/// failure as a value. `Sync` because file pipelines run on rayon workers
/// sharing one transformer.
pub trait Transformer: Sync {
    /// Lower modern syntax to a broadly-compatible, compact form.
    fn transpile(&self, source: &str) -> Result<String, TransformError>;

    /// Rewrite the lowered code for size and obscurity.
    fn obfuscate(&self, source: &str) -> Result<String, TransformError>;
}

/// Production transformer: one external filter command per stage.
pub struct CommandTransformer {
    transpile: StageCommand,
    obfuscate: StageCommand,
}

impl CommandTransformer {
    pub fn new(transpile: StageCommand, obfuscate: StageCommand) -> Self {
        Self {
            transpile,
            obfuscate,
        }
    }

    pub fn from_config(config: &BuildConfig) -> Self {
        Self::new(config.transpile.clone(), config.obfuscate.clone())
    }

    /// Pipe `input` through one stage command.
    ///
    /// All input is written before output is collected; the stage tools
    /// consume stdin fully before emitting.
    fn run(command: &StageCommand, input: &str) -> Result<String, TransformError> {
        let mut child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                TransformError::Failed(format!("cannot spawn {}: {e}", command.program))
            })?;

        {
            let mut stdin = child.stdin.take().expect("stdin was piped");
            stdin.write_all(input.as_bytes())?;
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TransformError::Failed(format!(
                "{} exited with {}: {}",
                command.program,
                output.status,
                stderr.trim()
            )));
        }

        String::from_utf8(output.stdout).map_err(|_| TransformError::NonUtf8Output)
    }
}

impl Transformer for CommandTransformer {
    fn transpile(&self, source: &str) -> Result<String, TransformError> {
        Self::run(&self.transpile, source)
    }

    fn obfuscate(&self, source: &str) -> Result<String, TransformError> {
        Self::run(&self.obfuscate, source)
    }
}
