//! JSON reporter for benchmark results

use crate::runner::BenchmarkResults;
use anyhow::Result;

/// JSON format reporter
pub struct JsonReporter;

impl JsonReporter {
    /// Format benchmark results as JSON
    ///
    /// # Arguments
    ///
    /// * `results` - The benchmark results to format
    /// * `pretty` - Whether to pretty-print the JSON
    pub fn format(results: &BenchmarkResults, pretty: bool) -> Result<String> {
        let mut output = if pretty {
            serde_json::to_string_pretty(results)?
        } else {
            serde_json::to_string(results)?
        };
        output.push('\n');
        Ok(output)
    }
}
