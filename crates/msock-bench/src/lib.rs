//! Timing harness for the msock example benchmarks
//!
//! Runs a benchmark executable (by default `./example05`) a fixed number of
//! times, reads the per-message nanosecond figure from the one-line record
//! it prints, and reports the mean and population standard deviation.
//!
//! # Features
//!
//! - **Sequential sampling**: one child process at a time, always released
//!   before the next starts, with an optional per-sample timeout
//! - **Failure policies**: abort, skip or retry a failed iteration
//! - **Output formats**: the classic `avg:…ns dev:…ns` line, or JSON
//!
//! # Example
//!
//! ```no_run
//! use msock_bench::{Config, BenchmarkRunner, Progress, Reporter, OutputFormat};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::from_file("msock-bench.toml")?;
//! config.validate()?;
//!
//! let mut runner = BenchmarkRunner::from_config(&config);
//! let results = runner.run(&config, &mut Progress::new(std::io::stdout())).await?;
//!
//! Reporter::new(OutputFormat::Console).report(&results)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [benchmark]
//! name = "example05"
//! iterations = 10
//! on_failure = "retry"
//! max_retries = 2
//!
//! [command]
//! program = "./example05"
//! args = []
//! working_dir = "build"
//! timeout_ms = 60000
//! ```

pub mod config;
pub mod error;
pub mod reporter;
pub mod runner;
pub mod sample;
pub mod sampler;
pub mod stats;

// Re-export main types for convenience
pub use config::{Config, FailurePolicy};
pub use error::{BenchError, ParseError, SampleError};
pub use reporter::{OutputFormat, Progress, Reporter};
pub use runner::{BenchmarkResults, BenchmarkRunner};
pub use sampler::{CommandSampler, SampleSource};
pub use stats::Summary;
