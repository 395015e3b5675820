//! Blocking HTTPS client for the event stream API.
//!
//! Opens `POST {base}/v1/events` and exposes the response body as a byte
//! source, either raw ([`Client::event_stream`]) or already demultiplexed
//! ([`Client::subscribe`]).

use std::io::{self, Read};
use std::time::Duration;

use log::{debug, info};
use reqwest::blocking::Response;
use reqwest::header::ACCEPT;
use reqwest::Url;

use crate::error::{ConfigError, FeedResult, TransportError};
use crate::event::Category;
use crate::mux::{Demux, DemuxConfig};

/// API version path segment.
const API_VERSION: &str = "v1";

/// Connection settings.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// URL up to the API version, e.g. `https://icinga.example.org:5665/`.
    pub base_url: String,
    /// API user.
    pub user: String,
    /// API password.
    pub password: String,
    /// Accept invalid certificate chains.
    pub insecure_skip_verify: bool,
}

/// Parameters of one event stream subscription.
#[derive(Debug, Clone)]
pub struct EventStreamRequest {
    /// Queue name. Clients sharing a name must use the same filter and types.
    pub queue: String,
    /// API filter expression; empty means no filter.
    pub filter: Option<String>,
    /// Requested event types.
    pub categories: Vec<Category>,
}

impl EventStreamRequest {
    /// Creates an unfiltered request.
    pub fn new(queue: impl Into<String>, categories: impl IntoIterator<Item = Category>) -> Self {
        Self {
            queue: queue.into(),
            filter: None,
            categories: categories.into_iter().collect(),
        }
    }

    /// Sets the API filter expression.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Checks the request without touching the network.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue.is_empty() {
            return Err(ConfigError::EmptyQueue);
        }
        if self.categories.is_empty() {
            return Err(ConfigError::NoCategories);
        }
        Ok(())
    }
}

/// Event stream API client.
#[derive(Debug, Clone)]
pub struct Client {
    base: Url,
    user: String,
    password: String,
    http: reqwest::blocking::Client,
}

impl Client {
    /// Validates the configuration and prepares an HTTP client.
    ///
    /// The HTTP client has no request timeout: the stream stays open for as
    /// long as the server keeps it.
    pub fn new(config: ClientConfig) -> FeedResult<Self> {
        let base = parse_base_url(&config.base_url)?;

        let http = reqwest::blocking::Client::builder()
            .danger_accept_invalid_certs(config.insecure_skip_verify)
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| ConfigError::ClientBuild {
                message: e.to_string(),
            })?;

        Ok(Self {
            base,
            user: config.user,
            password: config.password,
            http,
        })
    }

    /// Builds the stream URL for a request.
    ///
    /// The scheme is always `https`. Query keys are `filter` (when set),
    /// `queue`, and one `types` per category.
    pub fn event_stream_url(&self, request: &EventStreamRequest) -> FeedResult<Url> {
        request.validate()?;

        let mut url = self.base.clone();
        url.set_scheme("https").map_err(|()| ConfigError::InvalidUrl {
            url: self.base.to_string(),
            reason: "cannot switch scheme to https".to_string(),
        })?;
        // Infallible for URLs with a host.
        let _ = url.set_username("");
        let _ = url.set_password(None);
        url.set_fragment(None);

        let path = format!("{}/{API_VERSION}/events", url.path().trim_end_matches('/'));
        url.set_path(&path);

        url.set_query(None);
        {
            let mut query = url.query_pairs_mut();
            if let Some(filter) = request.filter.as_deref().filter(|f| !f.is_empty()) {
                query.append_pair("filter", filter);
            }
            query.append_pair("queue", &request.queue);
            for category in &request.categories {
                query.append_pair("types", category.as_str());
            }
        }

        Ok(url)
    }

    /// Opens the raw event stream.
    ///
    /// Fails with a transport error if the connection fails or the server
    /// answers with a non-success status.
    pub fn event_stream(&self, request: &EventStreamRequest) -> FeedResult<EventFeed> {
        let url = self.event_stream_url(request)?;
        info!(
            "opening event stream queue={} types={:?}",
            request.queue, request.categories
        );

        let response = self
            .http
            .post(url)
            .basic_auth(&self.user, Some(&self.password))
            .header(ACCEPT, "application/json")
            .send()
            .map_err(|e| TransportError::Connect {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown").to_string(),
            }
            .into());
        }

        debug!("event stream open (status {status})");
        Ok(EventFeed { response })
    }

    /// Opens the event stream and demultiplexes it by the requested types.
    pub fn subscribe(&self, request: &EventStreamRequest) -> FeedResult<Demux> {
        self.subscribe_with_config(request, DemuxConfig::default())
    }

    /// Like [`subscribe`](Self::subscribe), with explicit demultiplexer settings.
    pub fn subscribe_with_config(
        &self,
        request: &EventStreamRequest,
        config: DemuxConfig,
    ) -> FeedResult<Demux> {
        let feed = self.event_stream(request)?;
        Demux::with_config(feed, request.categories.iter().copied(), config)
    }
}

/// Body of an open event stream response.
#[derive(Debug)]
pub struct EventFeed {
    response: Response,
}

impl Read for EventFeed {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.response.read(buf)
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };

    let url = Url::parse(raw).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host"));
    }
    Ok(url)
}
