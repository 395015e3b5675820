use std::sync::{Mutex, OnceLock, PoisonError};

use crossbeam_channel::{bounded, Receiver, Sender};

use crate::error::FeedError;

/// Why a demultiplexer stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// The caller closed the demultiplexer.
    Closed,
    /// The byte source reached end of input.
    EndOfFeed,
    /// Reading, framing or routing failed.
    Failed(FeedError),
}

impl Termination {
    /// The error delivered to readers, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&FeedError> {
        match self {
            Self::Failed(err) => Some(err),
            Self::Closed | Self::EndOfFeed => None,
        }
    }
}

/// Single close path shared by the router, the demux handle and every reader.
///
/// The first `close` records the cause and then drops the signal sender, which
/// disconnects `done` for everyone at once. Later calls do nothing.
#[derive(Debug)]
pub(crate) struct Shutdown {
    cause: OnceLock<Termination>,
    signal: Mutex<Option<Sender<()>>>,
    done: Receiver<()>,
}

impl Shutdown {
    pub(crate) fn new() -> Self {
        let (signal, done) = bounded::<()>(0);
        Self {
            cause: OnceLock::new(),
            signal: Mutex::new(Some(signal)),
            done,
        }
    }

    /// Returns true if this call performed the close.
    pub(crate) fn close(&self, cause: Termination) -> bool {
        if self.cause.set(cause).is_err() {
            return false;
        }

        // Cause is published before the signal drops, so anyone woken by
        // `done` can read it.
        let signal = self
            .signal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        drop(signal);
        true
    }

    /// Disconnects once the demultiplexer has closed.
    pub(crate) fn done(&self) -> &Receiver<()> {
        &self.done
    }

    pub(crate) fn termination(&self) -> Option<&Termination> {
        self.cause.get()
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.cause.get().is_some()
    }
}
