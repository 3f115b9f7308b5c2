//! Error types for sampling and benchmark runs

use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

/// Failure to extract a timing value from one line of benchmark output
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("expected 3 comma-separated fields, found {found}")]
    FieldCount { found: usize },

    #[error("message field has no 'ns' unit: {field:?}")]
    MissingUnit { field: String },

    #[error("invalid number before 'ns': {text:?}")]
    InvalidNumber { text: String },

    #[error("timing value is not finite: {value}")]
    NonFinite { value: f64 },
}

/// Failure to obtain one sample from the benchmark executable
#[derive(Error, Debug)]
pub enum SampleError {
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error while waiting for benchmark: {0}")]
    Io(#[from] std::io::Error),

    #[error("benchmark did not finish within {0:?}")]
    Timeout(Duration),

    #[error("benchmark exited with {status}")]
    ExitStatus { status: ExitStatus },

    #[error("malformed benchmark output: {0}")]
    Parse(#[from] ParseError),
}

/// Failure of a whole benchmark run
#[derive(Error, Debug)]
pub enum BenchError {
    #[error("iteration {iteration} failed: {source}")]
    Sample {
        iteration: u32,
        #[source]
        source: SampleError,
    },

    #[error("no samples collected in {iterations} iterations")]
    NoSamples { iterations: u32 },

    #[error("failed to write progress: {0}")]
    Io(#[from] std::io::Error),
}
