//! Newline-delimited record input
//!
//! [`LineReader`] splits any [`BufRead`] into records. A record ends at `\n`;
//! a trailing `\r` is removed, empty lines are records, and a final line
//! without a newline is still a record. A record longer than the configured
//! limit is an error rather than being truncated.

use std::fmt;
use std::io::{self, BufRead};

/// Failure while reading records
#[derive(Debug)]
pub enum ReadError {
    /// The underlying reader failed
    Io(io::Error),
    /// A record exceeded the size limit
    RecordTooLong {
        /// Limit in bytes
        limit: usize,
        /// 1-based line number of the offending record
        line: u64,
    },
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::Io(err) => write!(f, "error reading input: {}", err),
            ReadError::RecordTooLong { limit, line } => {
                write!(f, "record on line {} exceeds {} bytes", line, limit)
            }
        }
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReadError::Io(err) => Some(err),
            ReadError::RecordTooLong { .. } => None,
        }
    }
}

impl From<io::Error> for ReadError {
    fn from(err: io::Error) -> Self {
        ReadError::Io(err)
    }
}

/// Record iterator over a buffered reader with a per-record size limit
///
/// The record buffer is reused between calls to [`next_record`](Self::next_record).
///
/// # Example
///
/// ```
/// use topflow::input::LineReader;
///
/// let mut reader = LineReader::new(&b"a\r\nb\n\nc"[..], 16);
/// let mut records = Vec::new();
/// while let Some(record) = reader.next_record().unwrap() {
///     records.push(record.to_vec());
/// }
/// assert_eq!(records, vec![b"a".to_vec(), b"b".to_vec(), b"".to_vec(), b"c".to_vec()]);
/// ```
pub struct LineReader<R> {
    reader: R,
    limit: usize,
    buffer: Vec<u8>,
    line: u64,
}

impl<R: BufRead> LineReader<R> {
    /// Wrap `reader`, rejecting records longer than `limit` bytes
    pub fn new(reader: R, limit: usize) -> Self {
        Self {
            reader,
            limit,
            buffer: Vec::new(),
            line: 0,
        }
    }

    /// Records returned so far
    pub fn records_read(&self) -> u64 {
        self.line
    }

    /// Read the next record, `Ok(None)` at end of input
    pub fn next_record(&mut self) -> Result<Option<&Vec<u8>>, ReadError> {
        self.buffer.clear();
        let mut saw_bytes = false;

        loop {
            let available = match self.reader.fill_buf() {
                Ok(available) => available,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            };
            if available.is_empty() {
                break;
            }
            saw_bytes = true;

            let (chunk, consumed, done) = match available.iter().position(|&b| b == b'\n') {
                Some(end) => (&available[..end], end + 1, true),
                None => (available, available.len(), false),
            };

            // one byte of slack for a `\r` that is stripped below
            if self.buffer.len() + chunk.len() > self.limit.saturating_add(1) {
                return Err(ReadError::RecordTooLong {
                    limit: self.limit,
                    line: self.line + 1,
                });
            }
            self.buffer.extend_from_slice(chunk);
            self.reader.consume(consumed);

            if done {
                break;
            }
        }

        if !saw_bytes {
            return Ok(None);
        }

        if self.buffer.last() == Some(&b'\r') {
            self.buffer.pop();
        }
        if self.buffer.len() > self.limit {
            return Err(ReadError::RecordTooLong {
                limit: self.limit,
                line: self.line + 1,
            });
        }

        self.line += 1;
        Ok(Some(&self.buffer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(input: &[u8], limit: usize) -> Result<Vec<Vec<u8>>, ReadError> {
        let mut reader = LineReader::new(input, limit);
        let mut records = Vec::new();
        while let Some(record) = reader.next_record()? {
            records.push(record.clone());
        }
        Ok(records)
    }

    #[test]
    fn test_splits_lines() {
        let records = collect(b"a\nb\na\n", 8).unwrap();
        assert_eq!(records, vec![b"a".to_vec(), b"b".to_vec(), b"a".to_vec()]);
    }

    #[test]
    fn test_empty_input() {
        assert!(collect(b"", 8).unwrap().is_empty());
    }

    #[test]
    fn test_blank_lines_and_missing_newline() {
        let records = collect(b"\n\nlast", 8).unwrap();
        assert_eq!(records, vec![b"".to_vec(), b"".to_vec(), b"last".to_vec()]);
    }

    #[test]
    fn test_records_read_counts_returned_records() {
        let mut reader = LineReader::new(&b"a\n\nb"[..], 8);
        assert_eq!(reader.records_read(), 0);
        while reader.next_record().unwrap().is_some() {}
        assert_eq!(reader.records_read(), 3);
    }

    #[test]
    fn test_strips_carriage_return() {
        let records = collect(b"one\r\ntwo\r\n", 8).unwrap();
        assert_eq!(records, vec![b"one".to_vec(), b"two".to_vec()]);
    }

    #[test]
    fn test_record_at_limit_is_accepted() {
        let records = collect(b"abcd\nabcd\r\n", 4).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_record_over_limit_fails() {
        let err = collect(b"ok\ntoolong\n", 4).unwrap_err();
        match err {
            ReadError::RecordTooLong { limit, line } => {
                assert_eq!(limit, 4);
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_limit_enforced_across_buffer_refills() {
        let data = vec![b'x'; 64];
        let reader = io::BufReader::with_capacity(8, &data[..]);
        let mut lines = LineReader::new(reader, 16);
        assert!(matches!(
            lines.next_record(),
            Err(ReadError::RecordTooLong { line: 1, .. })
        ));
    }

    #[test]
    fn test_io_error_is_reported() {
        struct Broken;
        impl io::Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "disk on fire"))
            }
        }

        let mut lines = LineReader::new(io::BufReader::new(Broken), 16);
        let err = lines.next_record().unwrap_err();
        assert!(matches!(err, ReadError::Io(_)));
        assert!(err.to_string().contains("disk on fire"));
    }
}
