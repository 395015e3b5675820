//! Event feed vocabulary and payload types.
//!
//! The demultiplexer only needs [`Category`] and [`envelope::sniff`]; the
//! typed records in [`records`] are for consumers decoding what they receive.

/// Closed set of event stream types.
pub mod category;
/// Minimal routing envelope parsing.
pub mod envelope;
/// Typed payloads for each event stream type.
pub mod records;

pub use category::Category;
pub use envelope::sniff;
pub use records::{
    AcknowledgementCleared, AcknowledgementSet, AcknowledgementType, CheckResult, CheckResultData,
    CheckResultVars, CommentAdded, CommentRemoved, DowntimeAdded, DowntimeRemoved,
    DowntimeTriggered, Event, Notification, NotificationType, State, StateChange, StateType,
};
