//! Read side of a demultiplexed category stream.

use std::io::{self, Read};
use std::sync::Arc;

use crossbeam_channel::{select, Receiver};
use serde::de::DeserializeOwned;

use crate::error::{FeedResult, ProtocolError};
use crate::event::Category;

use super::shutdown::{Shutdown, Termination};

/// One event line, as delivered to a category reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    category: Category,
    bytes: Vec<u8>,
}

impl Record {
    pub(crate) fn new(category: Category, bytes: Vec<u8>) -> Self {
        Self { category, bytes }
    }

    /// Category the record was routed by.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// The full line, terminator included.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The line without its `\n` or `\r\n` terminator.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        let line = self.bytes.strip_suffix(b"\n").unwrap_or(&self.bytes);
        line.strip_suffix(b"\r").unwrap_or(line)
    }

    /// Consumes the record, returning the full line.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Decodes the payload into a typed event.
    pub fn decode<T: DeserializeOwned>(&self) -> FeedResult<T> {
        serde_json::from_slice(&self.bytes).map_err(|e| {
            ProtocolError::Decode {
                category: self.category,
                reason: e.to_string(),
            }
            .into()
        })
    }
}

/// Blocking stream of one category's records.
///
/// Each receive rendezvouses with the router: nothing is buffered between the
/// feed and this reader. A reader that stops receiving therefore stalls
/// delivery for every category of the same demultiplexer.
///
/// When the demultiplexer closes, the next receive reports the cause once
/// (an error, or clean end of stream) and every later receive reports end of
/// stream. Mixing [`recv`](Self::recv) with `std::io::Read` on the same handle
/// discards the unread remainder of a partially read record.
#[derive(Debug)]
pub struct EventStream {
    category: Category,
    rx: Receiver<Record>,
    shutdown: Arc<Shutdown>,
    pending: Option<Record>,
    offset: usize,
    finished: bool,
}

impl EventStream {
    pub(crate) fn new(category: Category, rx: Receiver<Record>, shutdown: Arc<Shutdown>) -> Self {
        Self {
            category,
            rx,
            shutdown,
            pending: None,
            offset: 0,
            finished: false,
        }
    }

    /// Category this stream carries.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// True once this handle has reported the end of its stream.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Receive the next record (blocking).
    ///
    /// Returns `Ok(None)` at end of stream, or the demultiplexer's failure
    /// exactly once.
    pub fn recv(&mut self) -> FeedResult<Option<Record>> {
        self.pending = None;
        self.offset = 0;

        if self.finished {
            return Ok(None);
        }

        if !self.shutdown.is_closed() {
            select! {
                recv(self.rx) -> msg => {
                    if let Ok(record) = msg {
                        return Ok(Some(record));
                    }
                }
                recv(self.shutdown.done()) -> _ => {}
            }
        }

        self.finished = true;
        match self.shutdown.termination() {
            Some(Termination::Failed(err)) => Err(err.clone()),
            _ => Ok(None),
        }
    }

    /// Receive and decode the next record.
    ///
    /// A decode failure only affects this call; the stream stays usable.
    pub fn decode<T: DeserializeOwned>(&mut self) -> FeedResult<Option<T>> {
        self.recv()?.map(|record| record.decode()).transpose()
    }
}

impl Iterator for EventStream {
    type Item = FeedResult<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.recv().transpose()
    }
}

impl Read for EventStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        loop {
            if let Some(record) = &self.pending {
                let rest = &record.as_bytes()[self.offset..];
                if !rest.is_empty() {
                    let n = rest.len().min(buf.len());
                    buf[..n].copy_from_slice(&rest[..n]);
                    self.offset += n;
                    return Ok(n);
                }
            }

            match self.recv()? {
                Some(record) => self.pending = Some(record),
                None => return Ok(0),
            }
        }
    }
}
