//! Benchmark execution orchestration
//!
//! The runner takes one sample per iteration, strictly in sequence: each
//! sample's process has exited and been released before the next one
//! starts. A failed iteration is handled according to the configured
//! [`FailurePolicy`].
//!
//! # Example
//!
//! ```no_run
//! use msock_bench::{Config, runner::BenchmarkRunner, reporter::Progress};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::from_file("msock-bench.toml")?;
//! let mut runner = BenchmarkRunner::from_config(&config);
//! let mut progress = Progress::new(std::io::stdout());
//! let results = runner.run(&config, &mut progress).await?;
//!
//! println!("avg:{:.3}ns dev:{:.3}ns", results.summary.mean, results.summary.std_dev);
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::time::Instant;
use tracing::{info, instrument, warn};

use crate::config::{Config, FailurePolicy};
use crate::error::{BenchError, SampleError};
use crate::reporter::Progress;
use crate::sampler::{CommandSampler, SampleSource};
use crate::stats::Summary;

/// Results from a complete benchmark run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResults {
    /// Name of the benchmark suite
    pub suite_name: String,
    /// Command line that was sampled
    pub command: String,
    /// Samples in nanoseconds, in collection order
    pub samples: Vec<f64>,
    /// Mean and deviation of `samples`
    pub summary: Summary,
    /// Number of iterations that produced a sample
    pub successful_iterations: u32,
    /// Number of iterations skipped after failing
    pub failed_iterations: u32,
    /// Failure messages for skipped iterations
    pub failures: Vec<String>,
    /// Total duration of the run in milliseconds
    pub total_duration_ms: u64,
    /// Timestamp when the run started
    pub started_at: String,
}

/// Outcome of one iteration after the failure policy has been applied
enum Iteration {
    Sampled(f64),
    Skipped(SampleError),
}

/// The benchmark runner
pub struct BenchmarkRunner<S> {
    source: S,
}

impl BenchmarkRunner<CommandSampler> {
    /// Create a runner that samples the configured command
    pub fn from_config(config: &Config) -> Self {
        Self::new(CommandSampler::from_config(&config.command))
    }
}

impl<S: SampleSource> BenchmarkRunner<S> {
    /// Create a runner over any sample source
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Run `config.benchmark.iterations` iterations and summarize them
    ///
    /// A progress mark is written for every iteration as soon as it ends.
    ///
    /// # Errors
    ///
    /// - [`BenchError::Sample`] when an iteration fails under the abort or
    ///   retry policy
    /// - [`BenchError::NoSamples`] when every iteration was skipped
    /// - [`BenchError::Io`] when progress cannot be written
    #[instrument(skip(self, config, progress), fields(suite = %config.benchmark.name))]
    pub async fn run<W: Write>(
        &mut self,
        config: &Config,
        progress: &mut Progress<W>,
    ) -> Result<BenchmarkResults, BenchError> {
        let start_time = Instant::now();
        let started_at = chrono::Utc::now().to_rfc3339();
        let iterations = config.benchmark.iterations;

        info!(
            "Starting benchmark '{}': {} iterations of {}",
            config.benchmark.name,
            iterations,
            self.source.describe()
        );

        let mut samples = Vec::with_capacity(iterations as usize);
        let mut failures = Vec::new();

        for iteration in 0..iterations {
            match self.run_iteration(config, iteration).await? {
                Iteration::Sampled(nanos) => {
                    samples.push(nanos);
                    progress.sample()?;
                }
                Iteration::Skipped(e) => {
                    failures.push(format!("iteration {}: {}", iteration, e));
                    progress.failure()?;
                }
            }
        }
        progress.finish()?;

        let summary =
            Summary::from_samples(&samples).ok_or(BenchError::NoSamples { iterations })?;

        let results = BenchmarkResults {
            suite_name: config.benchmark.name.clone(),
            command: self.source.describe(),
            successful_iterations: samples.len() as u32,
            failed_iterations: failures.len() as u32,
            samples,
            summary,
            failures,
            total_duration_ms: start_time.elapsed().as_millis() as u64,
            started_at,
        };

        if results.failures.is_empty() {
            info!(
                "Benchmark '{}' completed in {}ms",
                results.suite_name, results.total_duration_ms
            );
        } else {
            warn!(
                "Benchmark '{}' completed with {} skipped iterations",
                results.suite_name, results.failed_iterations
            );
        }

        Ok(results)
    }

    /// Take one sample, applying the failure policy
    async fn run_iteration(
        &mut self,
        config: &Config,
        iteration: u32,
    ) -> Result<Iteration, BenchError> {
        let policy = config.benchmark.on_failure;
        let mut attempt = 0;

        loop {
            let error = match self.source.sample().await {
                Ok(nanos) => return Ok(Iteration::Sampled(nanos)),
                Err(e) => e,
            };

            match policy {
                FailurePolicy::Skip => {
                    warn!(iteration, error = %error, "Skipping failed iteration");
                    return Ok(Iteration::Skipped(error));
                }
                FailurePolicy::Retry if attempt < config.benchmark.max_retries => {
                    attempt += 1;
                    warn!(iteration, attempt, error = %error, "Retrying failed iteration");
                }
                FailurePolicy::Abort | FailurePolicy::Retry => {
                    return Err(BenchError::Sample {
                        iteration,
                        source: error,
                    });
                }
            }
        }
    }
}
