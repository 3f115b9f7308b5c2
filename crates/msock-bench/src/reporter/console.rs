//! Console reporter: the one-line summary

use anyhow::Result;
use std::fmt::Write;

use crate::runner::BenchmarkResults;

/// Console format reporter
pub struct ConsoleReporter;

impl ConsoleReporter {
    /// Format results as `avg:<mean>ns dev:<stddev>ns`, preceded by a note
    /// when iterations were skipped
    pub fn format(results: &BenchmarkResults) -> Result<String> {
        let mut output = String::new();

        if results.failed_iterations > 0 {
            writeln!(
                output,
                "skipped {} of {} iterations",
                results.failed_iterations,
                results.failed_iterations + results.successful_iterations
            )?;
        }

        writeln!(
            output,
            "avg:{:.3}ns dev:{:.3}ns",
            results.summary.mean, results.summary.std_dev
        )?;

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::tests::create_test_results;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_console_summary_line() {
        let results = create_test_results();
        let output = ConsoleReporter::format(&results).unwrap();
        assert_eq!(output, "avg:151.000ns dev:1.000ns\n");
    }

    #[test]
    fn test_console_rounds_to_three_places() {
        let mut results = create_test_results();
        results.summary.mean = 150.31249;
        results.summary.std_dev = 0.0004;
        let output = ConsoleReporter::format(&results).unwrap();
        assert_eq!(output, "avg:150.312ns dev:0.000ns\n");
    }

    #[test]
    fn test_console_reports_skipped_iterations() {
        let mut results = create_test_results();
        results.failed_iterations = 1;
        results.failures = vec!["iteration 2: benchmark exited with exit status: 1".to_string()];

        let output = ConsoleReporter::format(&results).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines, vec!["skipped 1 of 4 iterations", "avg:151.000ns dev:1.000ns"]);
    }
}
