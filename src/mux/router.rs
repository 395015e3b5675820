//! Router worker.
//!
//! One thread per demultiplexer: frame a line, sniff its category, hand it to
//! that category's endpoint, repeat. Any failure ends the loop and closes
//! every endpoint with the same cause.

use std::io::Read;
use std::sync::Arc;

use crossbeam_channel::select;
use log::{debug, trace, warn};

use crate::error::{FeedError, ProtocolError, TransportError};
use crate::event::envelope;

use super::endpoint::Record;
use super::framer::LineFramer;
use super::registry::Registry;
use super::shutdown::{Shutdown, Termination};

pub(crate) struct Router<R> {
    framer: LineFramer<R>,
    registry: Arc<Registry>,
    shutdown: Arc<Shutdown>,
}

impl<R: Read> Router<R> {
    pub(crate) fn new(
        framer: LineFramer<R>,
        registry: Arc<Registry>,
        shutdown: Arc<Shutdown>,
    ) -> Self {
        Self {
            framer,
            registry,
            shutdown,
        }
    }

    pub(crate) fn run(mut self) {
        debug!(
            "event router started for {:?}",
            self.registry.categories()
        );

        let termination = self.pump();

        match &termination {
            Termination::Failed(err) => warn!("event router stopped: {err}"),
            Termination::EndOfFeed => debug!("event router reached end of feed"),
            Termination::Closed => debug!("event router observed close"),
        }

        if !self.shutdown.close(termination) {
            trace!("event router: demultiplexer was already closed");
        }
    }

    fn pump(&mut self) -> Termination {
        loop {
            let line = match self.framer.next_line() {
                Ok(Some(line)) => line,
                Ok(None) => return Termination::EndOfFeed,
                Err(err) => return Termination::Failed(err),
            };

            // The source read has no deadline; a close issued while it was
            // blocked is only seen here.
            if self.shutdown.is_closed() {
                return Termination::Closed;
            }

            let category = match envelope::sniff(&line) {
                Ok(category) => category,
                Err(err) => return Termination::Failed(err.into()),
            };

            let Some(route) = self.registry.route(category) else {
                return Termination::Failed(FeedError::from(ProtocolError::UnregisteredCategory {
                    name: category.as_str().to_string(),
                }));
            };

            trace!("routing {} bytes to {category}", line.len());

            select! {
                send(route.tx, Record::new(category, line)) -> res => {
                    if res.is_err() {
                        return Termination::Failed(
                            TransportError::EndpointClosed { category }.into(),
                        );
                    }
                }
                recv(self.shutdown.done()) -> _ => return Termination::Closed,
            }
        }
    }
}
