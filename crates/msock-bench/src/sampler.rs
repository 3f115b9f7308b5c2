//! Taking one timing sample from the benchmark executable
//!
//! [`SampleSource`] is the seam between the run loop and the thing being
//! measured. [`CommandSampler`] is the real implementation: it runs the
//! configured command, waits for it to exit and parses its standard output.
//!
//! The child is spawned with `kill_on_drop`, and the only handle to it is
//! owned by the wait future. Whatever ends the wait (exit, timeout, an I/O
//! error, or the caller dropping the future) the process is killed and
//! reaped before the handle goes away. Parsing happens after release.

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, instrument};

use crate::config::{render_command_line, CommandConfig};
use crate::error::SampleError;
use crate::sample::parse_sample;

/// Something that can produce nanosecond timing samples
#[async_trait]
pub trait SampleSource: Send {
    /// Take one sample
    async fn sample(&mut self) -> Result<f64, SampleError>;

    /// Human-readable description, used in reports and logs
    fn describe(&self) -> String;
}

/// Samples by running an external executable
#[derive(Debug, Clone)]
pub struct CommandSampler {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
    timeout: Option<Duration>,
}

impl CommandSampler {
    /// Create a sampler for `program` with no arguments and no timeout
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            timeout: None,
        }
    }

    /// Create a sampler from the `[command]` section of a config
    pub fn from_config(config: &CommandConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            working_dir: config.working_dir.clone(),
            timeout: config.timeout,
        }
    }

    /// Append arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run the program in `dir`
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Kill the program if it runs longer than `timeout`
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Run the program once and return its captured standard output
    async fn capture(&self) -> Result<String, SampleError> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        let child = command.spawn().map_err(|source| SampleError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        let wait = child.wait_with_output();
        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, wait)
                .await
                .map_err(|_| SampleError::Timeout(limit))??,
            None => wait.await?,
        };

        if !output.status.success() {
            return Err(SampleError::ExitStatus {
                status: output.status,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl SampleSource for CommandSampler {
    #[instrument(skip(self), fields(program = %self.program))]
    async fn sample(&mut self) -> Result<f64, SampleError> {
        let output = self.capture().await?;
        let nanos = parse_sample(&output)?;
        debug!(nanos, "sample taken");
        Ok(nanos)
    }

    fn describe(&self) -> String {
        render_command_line(&self.program, &self.args)
    }
}
