//! msock-bench binary
//!
//! Usage:
//!
//! ```text
//! msock-bench                                  # ./example05, 10 iterations
//! msock-bench -c bench.toml --format json
//! msock-bench -n 20 --timeout-ms 60000 -- ./example03 1000
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use msock_bench::{BenchmarkRunner, Config, FailurePolicy, OutputFormat, Progress, Reporter};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "msock-bench")]
#[command(
    version,
    about = "Run an msock benchmark repeatedly and report the mean and deviation of its ns-per-message figure"
)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Suite name used in reports
    #[arg(long)]
    name: Option<String>,

    /// Number of samples to take
    #[arg(short = 'n', long)]
    iterations: Option<u32>,

    /// Kill a sample's process after this many milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// What to do when an iteration fails: abort, skip or retry
    #[arg(long)]
    on_failure: Option<FailurePolicy>,

    /// Extra attempts per iteration with --on-failure retry
    #[arg(long)]
    max_retries: Option<u32>,

    /// Directory to run the benchmark in
    #[arg(short = 'C', long)]
    working_dir: Option<PathBuf>,

    /// Report format: console, json or json-pretty
    #[arg(short, long, default_value = "console")]
    format: OutputFormat,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Do not print progress marks
    #[arg(short, long)]
    quiet: bool,

    /// Log each sample to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Benchmark program and its arguments
    #[arg(last = true)]
    command: Vec<String>,
}

impl Args {
    /// Load the config file, if any, and apply command-line overrides
    fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        if let Some(name) = &self.name {
            config.benchmark.name = name.clone();
        }
        if let Some(iterations) = self.iterations {
            config.benchmark.iterations = iterations;
        }
        if let Some(policy) = self.on_failure {
            config.benchmark.on_failure = policy;
        }
        if let Some(retries) = self.max_retries {
            config.benchmark.max_retries = retries;
        }
        if let Some(ms) = self.timeout_ms {
            config.command.timeout = Some(Duration::from_millis(ms));
        }
        if let Some(dir) = &self.working_dir {
            config.command.working_dir = Some(dir.clone());
        }
        if let Some((program, args)) = self.command.split_first() {
            config.command.program = program.clone();
            config.command.args = args.to_vec();
        }

        config.validate().context("Invalid benchmark configuration")?;
        Ok(config)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // stdout carries progress and the report, so logs go to stderr
    let default_filter = if args.verbose {
        "msock_bench=debug"
    } else {
        "msock_bench=warn"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = args.resolve_config()?;
    tracing::debug!(?config, "Resolved configuration");

    let marks: Box<dyn Write> = if args.quiet {
        Box::new(io::sink())
    } else if args.format.is_machine_readable() {
        Box::new(io::stderr())
    } else {
        Box::new(io::stdout())
    };

    let mut runner = BenchmarkRunner::from_config(&config);
    let results = runner.run(&config, &mut Progress::new(marks)).await?;

    let reporter = Reporter::new(args.format);
    match &args.output {
        Some(path) => reporter.write_to_file(&results, path)?,
        None => reporter.report(&results)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_command_overrides_program() {
        let args = Args::parse_from([
            "msock-bench",
            "-n",
            "3",
            "--on-failure",
            "skip",
            "--",
            "./example03",
            "1000",
        ]);
        let config = args.resolve_config().unwrap();
        assert_eq!(config.benchmark.iterations, 3);
        assert_eq!(config.benchmark.on_failure, FailurePolicy::Skip);
        assert_eq!(config.command.program, "./example03");
        assert_eq!(config.command.args, vec!["1000"]);
    }

    #[test]
    fn test_defaults_match_example05() {
        let args = Args::parse_from(["msock-bench"]);
        let config = args.resolve_config().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(args.format, OutputFormat::Console);
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let args = Args::parse_from(["msock-bench", "-n", "0"]);
        assert!(args.resolve_config().is_err());
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bench.toml");
        std::fs::write(
            &path,
            "[benchmark]\niterations = 50\n\n[command]\nprogram = \"./example04\"\ntimeout_ms = 1000\n",
        )
        .unwrap();

        let args = Args::parse_from([
            "msock-bench",
            "--config",
            path.to_str().unwrap(),
            "--timeout-ms",
            "250",
            "--format",
            "json",
        ]);
        let config = args.resolve_config().unwrap();
        assert_eq!(config.benchmark.iterations, 50);
        assert_eq!(config.command.program, "./example04");
        assert_eq!(config.command.timeout, Some(Duration::from_millis(250)));
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn test_unknown_policy_is_a_usage_error() {
        let parsed = Args::try_parse_from(["msock-bench", "--on-failure", "ignore"]);
        assert!(parsed.is_err());
    }
}
