//! GitHub Actions workflow command helpers.
//!
//! Covers the two command surfaces the pipeline helpers need: annotation
//! lines on stderr (`::error::` / `::warning::`) and appends to the command
//! files GitHub exposes through environment variables such as `GITHUB_ENV`,
//! `GITHUB_OUTPUT` and `GITHUB_PATH`.
//!
//! Reference: <https://docs.github.com/en/actions/reference/workflow-commands-for-github-actions>

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{
    Context,
    Result,
};

/// Print an error annotation.
///
/// GitHub surfaces the message in the run summary and marks the step red;
/// outside of Actions it is a plain stderr line.
pub fn error(message: &str) {
    eprintln!("::error::{}", message);
}

/// Print a warning annotation.
pub fn warning(message: &str) {
    eprintln!("::warning::{}", message);
}

/// Append-only view of a GitHub Actions command file.
///
/// GitHub creates these files for every step and hands their paths to the
/// process via `GITHUB_ENV`, `GITHUB_OUTPUT` and `GITHUB_PATH`. Every line
/// appended becomes visible to subsequent workflow steps, so the file is
/// never truncated or rewritten.
#[derive(Debug, Clone)]
pub struct CommandFile {
    path: PathBuf,
}

impl CommandFile {
    /// Wrap a command file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CommandFile { path: path.into() }
    }

    /// Append one raw line (used as-is for `GITHUB_PATH` entries).
    ///
    /// The file must already exist (GitHub creates it for every step); a
    /// missing file means the path did not come from the platform.
    pub fn append(&self, line: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open command file {}", self.path.display()))?;
        writeln!(file, "{}", line)
            .with_context(|| format!("Failed to write to command file {}", self.path.display()))?;
        Ok(())
    }

    /// Append a `name=value` entry (environment variables and step outputs).
    pub fn set(&self, name: &str, value: &str) -> Result<()> {
        self.append(&format!("{}={}", name, value))
    }
}
