//! Benchmark result reporting
//!
//! Progress marks are written while the run is in flight; the report is
//! produced once it has finished.
//!
//! # Output Formats
//!
//! - **Console**: the single `avg:<mean>ns dev:<stddev>ns` line
//! - **JSON**: every sample plus the summary, for scripts and CI
//!
//! # Example
//!
//! ```no_run
//! use msock_bench::reporter::{Reporter, OutputFormat};
//! use msock_bench::runner::BenchmarkResults;
//!
//! # fn example(results: BenchmarkResults) -> anyhow::Result<()> {
//! Reporter::new(OutputFormat::Console).report(&results)?;
//!
//! // Or write to a file
//! Reporter::new(OutputFormat::JsonPretty)
//!     .write_to_file(&results, "example05.json")?;
//! # Ok(())
//! # }
//! ```

mod console;
mod json;
mod progress;

use anyhow::{Context, Result};
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;

use crate::runner::BenchmarkResults;

pub use console::ConsoleReporter;
pub use json::JsonReporter;
pub use progress::{Progress, FAILURE_MARK, SAMPLE_MARK};

/// Output format for benchmark results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One summary line
    #[default]
    Console,
    /// JSON format for machine parsing
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

impl OutputFormat {
    /// Whether this format is meant for programs rather than people
    pub fn is_machine_readable(&self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::JsonPretty)
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "console" => Ok(OutputFormat::Console),
            "json" => Ok(OutputFormat::Json),
            "json-pretty" | "json_pretty" => Ok(OutputFormat::JsonPretty),
            other => Err(format!(
                "unknown output format '{}', expected console, json or json-pretty",
                other
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Console => "console",
            OutputFormat::Json => "json",
            OutputFormat::JsonPretty => "json-pretty",
        };
        f.write_str(name)
    }
}

/// Reporter for benchmark results
pub struct Reporter {
    format: OutputFormat,
}

impl Reporter {
    /// Create a new reporter with the specified output format
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Report results to stdout
    pub fn report(&self, results: &BenchmarkResults) -> Result<()> {
        let output = self.format_results(results)?;
        let mut stdout = io::stdout().lock();
        stdout.write_all(output.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }

    /// Write results to a file
    pub fn write_to_file<P: AsRef<Path>>(&self, results: &BenchmarkResults, path: P) -> Result<()> {
        let path = path.as_ref();
        let output = self.format_results(results)?;
        fs::write(path, output)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        Ok(())
    }

    /// Format results as a string
    pub fn format_results(&self, results: &BenchmarkResults) -> Result<String> {
        match self.format {
            OutputFormat::Console => ConsoleReporter::format(results),
            OutputFormat::Json => JsonReporter::format(results, false),
            OutputFormat::JsonPretty => JsonReporter::format(results, true),
        }
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(OutputFormat::default())
    }
}
