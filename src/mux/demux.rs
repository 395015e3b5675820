//! Demultiplexer handle.

use std::io::Read;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use log::debug;

use crate::error::{ConfigError, FeedError, FeedResult, UsageError};
use crate::event::Category;

use super::endpoint::EventStream;
use super::framer::LineFramer;
use super::registry::Registry;
use super::router::Router;
use super::shutdown::{Shutdown, Termination};

/// Demultiplexer configuration.
#[derive(Debug, Clone)]
pub struct DemuxConfig {
    /// Longest accepted record, excluding its terminator.
    pub max_record_bytes: usize,
    /// Name of the router thread.
    pub thread_name: String,
}

impl Default for DemuxConfig {
    fn default() -> Self {
        Self {
            max_record_bytes: 16 * 1024 * 1024,
            thread_name: "icinga-events-router".to_string(),
        }
    }
}

/// Splits one event feed into a blocking stream per category.
///
/// A single router thread reads the feed and hands each record to the stream
/// of its category. Delivery is unbuffered, so every requested category must
/// be read: one idle reader stalls all of them.
///
/// The demultiplexer ends when the feed ends, when the feed yields a record it
/// cannot route (malformed, or of a category that was not requested), or when
/// [`close`](Self::close) is called or the handle dropped. Every stream then
/// observes the same outcome. A closed demultiplexer cannot be restarted.
#[derive(Debug)]
pub struct Demux {
    registry: Arc<Registry>,
    shutdown: Arc<Shutdown>,
    router: Mutex<Option<JoinHandle<()>>>,
}

impl Demux {
    /// Starts demultiplexing `source` into the given categories.
    pub fn new<R>(source: R, categories: impl IntoIterator<Item = Category>) -> FeedResult<Self>
    where
        R: Read + Send + 'static,
    {
        Self::with_config(source, categories, DemuxConfig::default())
    }

    /// Like [`new`](Self::new), with explicit configuration.
    ///
    /// Returns without reading from `source`.
    pub fn with_config<R>(
        source: R,
        categories: impl IntoIterator<Item = Category>,
        config: DemuxConfig,
    ) -> FeedResult<Self>
    where
        R: Read + Send + 'static,
    {
        if config.max_record_bytes == 0 {
            return Err(ConfigError::ZeroRecordLimit.into());
        }

        let registry = Arc::new(Registry::new(categories)?);
        let shutdown = Arc::new(Shutdown::new());

        let router = Router::new(
            LineFramer::new(source, config.max_record_bytes),
            Arc::clone(&registry),
            Arc::clone(&shutdown),
        );

        let handle = thread::Builder::new()
            .name(config.thread_name)
            .spawn(move || router.run())
            .map_err(|e| FeedError::internal(format!("failed to spawn event router: {e}")))?;

        Ok(Self {
            registry,
            shutdown,
            router: Mutex::new(Some(handle)),
        })
    }

    /// Returns a reader for a requested category.
    ///
    /// Still succeeds after close; the stream then reports the outcome on its
    /// first receive. Each category should have one active reader at a time.
    pub fn reader(&self, category: Category) -> FeedResult<EventStream> {
        let route = self
            .registry
            .route(category)
            .ok_or(UsageError::UnregisteredCategory { category })?;

        Ok(EventStream::new(
            category,
            route.rx.clone(),
            Arc::clone(&self.shutdown),
        ))
    }

    /// Closes every stream with a clean end of stream.
    ///
    /// Returns true if this call closed the demultiplexer, false if it had
    /// already been closed or had terminated on its own.
    pub fn close(&self) -> bool {
        let closed = self.shutdown.close(Termination::Closed);
        if closed {
            debug!("event demultiplexer closed by caller");
        }
        closed
    }

    /// True once the demultiplexer has terminated for any reason.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.shutdown.is_closed()
    }

    /// How the demultiplexer terminated, if it has.
    #[must_use]
    pub fn termination(&self) -> Option<Termination> {
        self.shutdown.termination().cloned()
    }

    /// The requested categories.
    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        self.registry.categories()
    }

    /// Waits for the router thread to exit.
    ///
    /// The router only notices a close between source reads, so after
    /// [`close`](Self::close) this blocks until the source yields data, ends,
    /// or fails.
    pub fn join(&self) -> FeedResult<()> {
        let handle = self
            .router
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        match handle {
            Some(handle) => handle
                .join()
                .map_err(|_| FeedError::internal("event router panicked")),
            None => Ok(()),
        }
    }
}

impl Drop for Demux {
    fn drop(&mut self) {
        // Do not join: the router may be blocked on a source read that never
        // returns. It exits on its own once it observes the close.
        self.shutdown.close(Termination::Closed);
    }
}
