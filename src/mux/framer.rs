use std::io::{BufRead, BufReader, Read};

use crate::error::{FeedResult, ProtocolError, TransportError};

/// Splits a byte source into newline-terminated records.
pub(crate) struct LineFramer<R> {
    reader: BufReader<R>,
    max_record_bytes: usize,
}

impl<R: Read> LineFramer<R> {
    pub(crate) fn new(source: R, max_record_bytes: usize) -> Self {
        Self {
            reader: BufReader::new(source),
            max_record_bytes,
        }
    }

    /// Blocks for the next line, terminator included.
    ///
    /// Returns `Ok(None)` at end of input. A trailing fragment without a
    /// terminator is returned with `\n` appended.
    pub(crate) fn next_line(&mut self) -> FeedResult<Option<Vec<u8>>> {
        // One byte of headroom for the terminator.
        let limit = u64::try_from(self.max_record_bytes)
            .unwrap_or(u64::MAX)
            .saturating_add(1);

        let mut line = Vec::new();
        let n = (&mut self.reader)
            .take(limit)
            .read_until(b'\n', &mut line)
            .map_err(|e| TransportError::read(&e))?;

        if n == 0 {
            return Ok(None);
        }

        if line.last() != Some(&b'\n') {
            if u64::try_from(n).unwrap_or(u64::MAX) >= limit {
                return Err(ProtocolError::RecordTooLong {
                    limit: self.max_record_bytes,
                }
                .into());
            }
            line.push(b'\n');
        }

        Ok(Some(line))
    }
}
