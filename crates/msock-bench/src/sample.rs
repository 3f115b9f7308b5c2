//! Parsing of the benchmark's one-line timing record
//!
//! The msock benchmarks print a single line of the form
//!
//! ```text
//! 1503.117ms total, 150.312ns per message, 1503117.000ns per process
//! ```
//!
//! Only the second field is sampled.

use crate::error::ParseError;

/// The three comma-separated fields of a timing record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    pub total: &'a str,
    pub message: &'a str,
    pub process: &'a str,
}

impl<'a> Record<'a> {
    /// Split captured output into its three fields.
    ///
    /// Any other field count (including empty output) is an error.
    pub fn parse(output: &'a str) -> Result<Self, ParseError> {
        let fields: Vec<&str> = output.split(',').collect();
        match *fields.as_slice() {
            [total, message, process] => Ok(Record {
                total,
                message,
                process,
            }),
            _ => Err(ParseError::FieldCount {
                found: fields.len(),
            }),
        }
    }

    /// Nanosecond value in front of the first `ns` in the message field.
    pub fn message_nanos(&self) -> Result<f64, ParseError> {
        let (number, _) =
            self.message
                .split_once("ns")
                .ok_or_else(|| ParseError::MissingUnit {
                    field: self.message.trim().to_string(),
                })?;

        let text = number.trim();
        let value: f64 = text.parse().map_err(|_| ParseError::InvalidNumber {
            text: text.to_string(),
        })?;

        if !value.is_finite() {
            return Err(ParseError::NonFinite { value });
        }
        Ok(value)
    }
}

/// Extract the per-message nanosecond sample from raw benchmark output.
///
/// # Examples
///
/// ```
/// use msock_bench::sample::parse_sample;
///
/// let ns = parse_sample("12.5ms total, 125.250ns per message, 12.5ns per process\n").unwrap();
/// assert_eq!(ns, 125.25);
/// assert!(parse_sample("a,b,c").is_err());
/// ```
pub fn parse_sample(output: &str) -> Result<f64, ParseError> {
    Record::parse(output)?.message_nanos()
}
