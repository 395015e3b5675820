//! # icinga-events - Icinga2 event stream client
//!
//! The Icinga2 API pushes monitoring events over one long-lived HTTP response
//! as newline-delimited JSON. This crate opens that stream and splits it into
//! one blocking stream per event type, so independent consumers can each
//! follow the types they care about.
//!
//! ## Core Concepts
//!
//! - **Category**: the event type named by a record's `type` field
//! - **Demux**: a router thread that hands each record to its category's stream
//! - **EventStream**: a per-category reader; unbuffered, so every stream must be read
//! - **Termination**: the single outcome (close, end of feed, or error) every stream observes
//!
//! ## Usage
//!
//! ```rust,ignore
//! use icinga_events::{Category, Client, ClientConfig, EventStreamRequest, StateChange};
//!
//! let client = Client::new(ClientConfig {
//!     base_url: "https://localhost:5665/".to_string(),
//!     user: "root".to_string(),
//!     password: "icinga".to_string(),
//!     insecure_skip_verify: true,
//! })?;
//!
//! let request = EventStreamRequest::new("testing", [Category::StateChange]);
//! let demux = client.subscribe(&request)?;
//! let mut states = demux.reader(Category::StateChange)?;
//! while let Some(change) = states.decode::<StateChange>()? {
//!     println!("{}!{} is {}", change.host, change.service, change.state.name());
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod event;
pub mod mux;

#[cfg(feature = "client")]
pub mod client;

pub use error::{
    ConfigError, FeedError, FeedResult, ProtocolError, TransportError, UsageError,
};
pub use event::{
    AcknowledgementCleared, AcknowledgementSet, AcknowledgementType, Category, CheckResult,
    CheckResultData, CheckResultVars, CommentAdded, CommentRemoved, DowntimeAdded,
    DowntimeRemoved, DowntimeTriggered, Event, Notification, NotificationType, State, StateChange,
    StateType,
};
pub use mux::{Demux, DemuxConfig, EventStream, Record, Termination};

#[cfg(feature = "client")]
pub use client::{Client, ClientConfig, EventFeed, EventStreamRequest};
