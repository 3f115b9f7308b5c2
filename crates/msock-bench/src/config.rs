//! Configuration parsing for benchmark runs
//!
//! This module provides TOML-based configuration for the command under test,
//! the number of iterations and how failed iterations are handled. Every
//! field has a default, so an empty file (or no file at all) benchmarks
//! `./example05` ten times.

use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Main configuration structure loaded from TOML files
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Run parameters
    #[serde(default)]
    pub benchmark: BenchmarkConfig,
    /// Executable to sample
    #[serde(default)]
    pub command: CommandConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML is malformed
    /// - A field has the wrong type
    ///
    /// # Example
    ///
    /// ```no_run
    /// use msock_bench::config::Config;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = Config::from_file("msock-bench.toml")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Parse configuration from a TOML string
    ///
    /// # Example
    ///
    /// ```
    /// use msock_bench::config::Config;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let toml = r#"
    ///     [benchmark]
    ///     iterations = 20
    ///
    ///     [command]
    ///     program = "./example03"
    /// "#;
    /// let config = Config::from_str(toml)?;
    /// assert_eq!(config.benchmark.iterations, 20);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("Failed to parse TOML configuration")
    }

    /// Check values that deserialize fine but cannot be run
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.benchmark.iterations > 0,
            "benchmark.iterations must be at least 1"
        );
        ensure!(
            !self.command.program.trim().is_empty(),
            "command.program must not be empty"
        );
        if let Some(timeout) = self.command.timeout {
            ensure!(!timeout.is_zero(), "command.timeout_ms must be positive");
        }
        Ok(())
    }
}

/// Core run parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// Name shown in reports (default: "example05")
    #[serde(default = "default_name")]
    pub name: String,
    /// Number of samples to take (default: 10)
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// What to do when an iteration fails (default: abort)
    #[serde(default)]
    pub on_failure: FailurePolicy,
    /// Extra attempts per iteration under [`FailurePolicy::Retry`] (default: 2)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            iterations: default_iterations(),
            on_failure: FailurePolicy::default(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_name() -> String {
    "example05".to_string()
}

fn default_iterations() -> u32 {
    10
}

fn default_max_retries() -> u32 {
    2
}

/// Command line of the executable under test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandConfig {
    /// Program to run, resolved relative to `working_dir` if set
    #[serde(default = "default_program")]
    pub program: String,
    /// Arguments passed to the program
    #[serde(default)]
    pub args: Vec<String>,
    /// Directory to run the program in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,
    /// Per-sample timeout; unset waits forever
    #[serde(
        default,
        rename = "timeout_ms",
        with = "duration_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout: Option<Duration>,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: Vec::new(),
            working_dir: None,
            timeout: None,
        }
    }
}

impl CommandConfig {
    /// Program and arguments joined for display
    pub fn command_line(&self) -> String {
        render_command_line(&self.program, &self.args)
    }
}

pub(crate) fn render_command_line(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

fn default_program() -> String {
    "./example05".to_string()
}

/// Handling of an iteration whose sample could not be taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop the run at the first failure
    #[default]
    Abort,
    /// Record the failure and continue with the next iteration
    Skip,
    /// Re-run the iteration up to `max_retries` times, then abort
    Retry,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "abort" => Ok(FailurePolicy::Abort),
            "skip" => Ok(FailurePolicy::Skip),
            "retry" => Ok(FailurePolicy::Retry),
            other => Err(format!(
                "unknown failure policy '{}', expected abort, skip or retry",
                other
            )),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailurePolicy::Abort => "abort",
            FailurePolicy::Skip => "skip",
            FailurePolicy::Retry => "retry",
        };
        f.write_str(name)
    }
}

/// Serde module for an optional Duration stored as milliseconds
mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&(d.as_millis() as u64)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ms = Option::<u64>::deserialize(deserializer)?;
        Ok(ms.map(Duration::from_millis))
    }
}
