//! Stream demultiplexer.
//!
//! The event API delivers every requested type over one connection as
//! newline-delimited JSON. [`Demux`] splits that connection into one blocking
//! [`EventStream`] per type, preserving feed order within each type.
//!
//! ```rust,ignore
//! use icinga_events::{Category, Demux, StateChange};
//!
//! let demux = Demux::new(feed, [Category::StateChange, Category::CheckResult])?;
//! let mut states = demux.reader(Category::StateChange)?;
//! let mut checks = demux.reader(Category::CheckResult)?;
//!
//! std::thread::spawn(move || while let Ok(Some(_)) = checks.recv() {});
//! while let Some(change) = states.decode::<StateChange>()? {
//!     println!("{} -> {}", change.host, change.state.name());
//! }
//! ```

/// Demultiplexer handle and configuration.
pub mod demux;
/// Per-category read side.
pub mod endpoint;
mod framer;
mod registry;
mod router;
/// Termination causes.
pub mod shutdown;

pub use demux::{Demux, DemuxConfig};
pub use endpoint::{EventStream, Record};
pub use shutdown::Termination;
