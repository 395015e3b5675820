//! Error types for icinga-events.
//!
//! All errors are strongly typed using thiserror and are `Clone`, so the
//! single cause that terminates a demultiplexer can be handed to every
//! subscriber unchanged.

use std::io;

use thiserror::Error;

use crate::event::Category;

/// Invalid requests rejected before any I/O happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Queue name cannot be empty")]
    EmptyQueue,

    #[error("At least one event category must be requested")]
    NoCategories,

    #[error("Invalid base URL '{url}': {reason}")]
    InvalidUrl {
        url: String,
        reason: String,
    },

    #[error("Maximum record size must be greater than zero")]
    ZeroRecordLimit,

    #[error("Failed to build HTTP client: {message}")]
    ClientBuild {
        message: String,
    },
}

/// Failures establishing or reading the event feed connection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Connection failed: {message}")]
    Connect {
        message: String,
    },

    #[error("Server rejected event stream (status {code}): {reason}")]
    Status {
        code: u16,
        reason: String,
    },

    #[error("Read failed ({kind:?}): {message}")]
    Read {
        kind: io::ErrorKind,
        message: String,
    },

    #[error("Endpoint for {category} was closed during delivery")]
    EndpointClosed {
        category: Category,
    },
}

impl TransportError {
    /// Captures an I/O error from the byte source.
    #[must_use]
    pub fn read(err: &io::Error) -> Self {
        Self::Read {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Malformed or unexpected content in the event feed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("Malformed record: {reason}")]
    MalformedRecord {
        reason: String,
    },

    #[error("Unregistered stream type '{name}'")]
    UnregisteredCategory {
        name: String,
    },

    #[error("Record exceeds maximum length of {limit} bytes")]
    RecordTooLong {
        limit: usize,
    },

    #[error("Failed to decode {category} record: {reason}")]
    Decode {
        category: Category,
        reason: String,
    },
}

/// Misuse of a demultiplexer by its caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error("Unregistered stream type '{category}'")]
    UnregisteredCategory {
        category: Category,
    },
}

/// Top-level error type for icinga-events.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Usage error: {0}")]
    Usage(#[from] UsageError),

    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl FeedError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Returns true if this is a transport error.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns true if this is a protocol error.
    #[must_use]
    pub const fn is_protocol(&self) -> bool {
        matches!(self, Self::Protocol(_))
    }

    /// Returns true if this is a usage error.
    #[must_use]
    pub const fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }

    /// Returns true if opening a fresh feed may succeed where this one failed.
    ///
    /// Nothing is retried internally; this only advises the caller.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Config(_) | Self::Usage(_) | Self::Protocol(_) | Self::Internal { .. } => false,
            Self::Transport(e) => match e {
                TransportError::Connect { .. } | TransportError::Read { .. } => true,
                TransportError::Status { code, .. } => *code >= 500,
                TransportError::EndpointClosed { .. } => false,
            },
        }
    }

    /// Maps the error onto an `io::ErrorKind` for `std::io::Read` consumers.
    #[must_use]
    pub fn io_kind(&self) -> io::ErrorKind {
        match self {
            Self::Transport(TransportError::Read { kind, .. }) => *kind,
            Self::Transport(_) => io::ErrorKind::ConnectionAborted,
            Self::Protocol(_) => io::ErrorKind::InvalidData,
            Self::Config(_) | Self::Usage(_) => io::ErrorKind::InvalidInput,
            Self::Internal { .. } => io::ErrorKind::Other,
        }
    }
}

impl From<FeedError> for io::Error {
    fn from(err: FeedError) -> Self {
        Self::new(err.io_kind(), err)
    }
}

/// Result type alias for icinga-events operations.
pub type FeedResult<T> = Result<T, FeedError>;
