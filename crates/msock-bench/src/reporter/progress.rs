//! Per-iteration progress marks
//!
//! Marks are flushed one at a time so they appear while the run is still
//! going, even when the writer is line-buffered.

use std::io::{self, Write};

/// Mark written for an iteration that produced a sample
pub const SAMPLE_MARK: u8 = b'.';
/// Mark written for an iteration that failed and was skipped
pub const FAILURE_MARK: u8 = b'x';

/// Writes one mark per finished iteration
pub struct Progress<W: Write> {
    out: W,
    marks: usize,
}

impl<W: Write> Progress<W> {
    pub fn new(out: W) -> Self {
        Self { out, marks: 0 }
    }

    /// Record a successful sample
    pub fn sample(&mut self) -> io::Result<()> {
        self.mark(SAMPLE_MARK)
    }

    /// Record a skipped iteration
    pub fn failure(&mut self) -> io::Result<()> {
        self.mark(FAILURE_MARK)
    }

    /// Terminate the line of marks
    pub fn finish(&mut self) -> io::Result<()> {
        if self.marks > 0 {
            self.out.write_all(b"\n")?;
            self.out.flush()?;
        }
        Ok(())
    }

    /// Number of marks written so far
    pub fn marks(&self) -> usize {
        self.marks
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn mark(&mut self, mark: u8) -> io::Result<()> {
        self.out.write_all(&[mark])?;
        self.out.flush()?;
        self.marks += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records how many bytes were visible at each flush
    #[derive(Default)]
    struct FlushLog {
        written: Vec<u8>,
        flushed_at: Vec<usize>,
    }

    impl Write for FlushLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.flushed_at.push(self.written.len());
            Ok(())
        }
    }

    #[test]
    fn test_every_mark_is_flushed() {
        let mut progress = Progress::new(FlushLog::default());
        for _ in 0..3 {
            progress.sample().unwrap();
        }
        assert_eq!(progress.marks(), 3);

        let log = progress.into_inner();
        assert_eq!(log.written, b"...".to_vec());
        assert_eq!(log.flushed_at, vec![1, 2, 3]);
    }

    #[test]
    fn test_finish_without_marks_writes_nothing() {
        let mut progress = Progress::new(Vec::new());
        progress.finish().unwrap();
        assert!(progress.into_inner().is_empty());
    }

    #[test]
    fn test_mixed_marks() {
        let mut progress = Progress::new(Vec::new());
        progress.sample().unwrap();
        progress.failure().unwrap();
        progress.sample().unwrap();
        progress.finish().unwrap();
        assert_eq!(progress.into_inner(), b".x.\n".to_vec());
    }
}
