//! Typed event payloads.
//!
//! Field names follow the event stream API. All structs accept records with
//! missing fields, since the server omits fields that do not apply (a host
//! check carries no `service`, for example).

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::Category;

/// State of a host or service.
///
/// `Nil` is not an API value. It stands in where no state applies, since
/// zero is already taken by `Ok`.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub enum State {
    #[default]
    Nil,
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl State {
    /// Display name used by the monitoring server (`""` for `Nil`).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Nil => "",
            Self::Ok => "OK",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Parses a display name; anything unrecognized is `Nil`.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "OK" => Self::Ok,
            "WARNING" => Self::Warning,
            "CRITICAL" => Self::Critical,
            "UNKNOWN" => Self::Unknown,
            _ => Self::Nil,
        }
    }
}

impl From<f64> for State {
    #[allow(clippy::float_cmp)]
    fn from(v: f64) -> Self {
        if v == 0.0 {
            Self::Ok
        } else if v == 1.0 {
            Self::Warning
        } else if v == 2.0 {
            Self::Critical
        } else if v == 3.0 {
            Self::Unknown
        } else {
            Self::Nil
        }
    }
}

impl From<State> for f64 {
    fn from(s: State) -> Self {
        match s {
            State::Nil => -1.0,
            State::Ok => 0.0,
            State::Warning => 1.0,
            State::Critical => 2.0,
            State::Unknown => 3.0,
        }
    }
}

/// Whether a state is soft (re-checks pending) or hard (confirmed).
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub enum StateType {
    #[default]
    Nil,
    Soft,
    Hard,
}

impl StateType {
    /// Display name used by the monitoring server (`""` for `Nil`).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Nil => "",
            Self::Soft => "SOFT",
            Self::Hard => "HARD",
        }
    }

    /// Parses a display name; anything unrecognized is `Nil`.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "SOFT" => Self::Soft,
            "HARD" => Self::Hard,
            _ => Self::Nil,
        }
    }
}

impl From<f64> for StateType {
    #[allow(clippy::float_cmp)]
    fn from(v: f64) -> Self {
        if v == 0.0 {
            Self::Soft
        } else if v == 1.0 {
            Self::Hard
        } else {
            Self::Nil
        }
    }
}

impl From<StateType> for f64 {
    fn from(s: StateType) -> Self {
        match s {
            StateType::Nil => -1.0,
            StateType::Soft => 0.0,
            StateType::Hard => 1.0,
        }
    }
}

/// Reason a notification was sent.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NotificationType {
    DowntimeStart,
    DowntimeEnd,
    DowntimeRemoved,
    Custom,
    Acknowledgement,
    Problem,
    Recovery,
    FlappingStart,
    FlappingEnd,
    #[default]
    Unknown,
}

impl NotificationType {
    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DowntimeStart => "DOWNTIMESTART",
            Self::DowntimeEnd => "DOWNTIMEEND",
            Self::DowntimeRemoved => "DOWNTIMECANCELLED",
            Self::Custom => "CUSTOM",
            Self::Acknowledgement => "ACKNOWLEDGEMENT",
            Self::Problem => "PROBLEM",
            Self::Recovery => "RECOVERY",
            Self::FlappingStart => "FLAPPINGSTART",
            Self::FlappingEnd => "FLAPPINGEND",
            Self::Unknown => "UNKNOWN_NOTIFICATION",
        }
    }
}

impl From<String> for NotificationType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "DOWNTIMESTART" => Self::DowntimeStart,
            "DOWNTIMEEND" => Self::DowntimeEnd,
            "DOWNTIMECANCELLED" => Self::DowntimeRemoved,
            "CUSTOM" => Self::Custom,
            "ACKNOWLEDGEMENT" => Self::Acknowledgement,
            "PROBLEM" => Self::Problem,
            "RECOVERY" => Self::Recovery,
            "FLAPPINGSTART" => Self::FlappingStart,
            "FLAPPINGEND" => Self::FlappingEnd,
            _ => Self::Unknown,
        }
    }
}

impl From<NotificationType> for String {
    fn from(t: NotificationType) -> Self {
        t.as_str().to_string()
    }
}

/// Kind of acknowledgement.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub enum AcknowledgementType {
    #[default]
    None,
    Normal,
    Sticky,
}

impl From<f64> for AcknowledgementType {
    #[allow(clippy::float_cmp)]
    fn from(v: f64) -> Self {
        if v == 1.0 {
            Self::Normal
        } else if v == 2.0 {
            Self::Sticky
        } else {
            Self::None
        }
    }
}

impl From<AcknowledgementType> for f64 {
    fn from(t: AcknowledgementType) -> Self {
        match t {
            AcknowledgementType::None => 0.0,
            AcknowledgementType::Normal => 1.0,
            AcknowledgementType::Sticky => 2.0,
        }
    }
}

/// Check attempt bookkeeping before and after a check.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckResultVars {
    pub attempt: f64,
    pub reachable: bool,
    pub state: State,
    pub state_type: StateType,
}

/// Details of the check that produced an event.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckResultData {
    pub active: bool,
    pub check_source: String,
    /// Command line; strings mixed with numbers.
    pub command: serde_json::Value,
    pub execution_end: f64,
    pub execution_start: f64,
    pub exit_status: f64,
    pub output: String,
    pub performance_data: serde_json::Value,
    pub schedule_end: f64,
    pub schedule_start: f64,
    pub state: State,
    pub vars_after: CheckResultVars,
    pub vars_before: CheckResultVars,
}

/// Result of a check of a host or service.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckResult {
    pub timestamp: f64,
    pub host: String,
    pub service: String,
    pub check_result: CheckResultData,
}

/// State change after a check failed or recovered.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StateChange {
    pub timestamp: f64,
    pub host: String,
    pub service: String,
    pub check_result: CheckResultData,
    pub state: State,
    pub state_type: StateType,
}

/// A notification was sent to users.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Notification {
    pub timestamp: f64,
    pub host: String,
    pub service: String,
    pub check_result: CheckResultData,
    pub users: Vec<String>,
    pub author: String,
    pub text: String,
    pub notification_type: NotificationType,
}

/// A problem was acknowledged.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AcknowledgementSet {
    pub timestamp: f64,
    pub host: String,
    pub service: String,
    pub state: State,
    pub state_type: StateType,
    pub author: String,
    pub comment: String,
    pub acknowledgement_type: AcknowledgementType,
    pub notify: bool,
    pub expiry: f64,
}

/// An acknowledgement was cleared.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AcknowledgementCleared {
    pub timestamp: f64,
    pub host: String,
    pub service: String,
    pub state: State,
    pub state_type: StateType,
}

/// A comment was added.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentAdded {
    pub timestamp: f64,
    pub comment: serde_json::Value,
}

/// A comment was removed.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentRemoved {
    pub timestamp: f64,
    pub comment: serde_json::Value,
}

/// A downtime was scheduled.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DowntimeAdded {
    pub timestamp: f64,
    pub downtime: serde_json::Value,
}

/// A downtime was removed.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DowntimeRemoved {
    pub timestamp: f64,
    pub downtime: serde_json::Value,
}

/// A downtime started.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DowntimeTriggered {
    pub timestamp: f64,
    pub downtime: serde_json::Value,
}

/// Any event, tagged by its `type` field.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    CheckResult(CheckResult),
    StateChange(StateChange),
    Notification(Notification),
    AcknowledgementSet(AcknowledgementSet),
    AcknowledgementCleared(AcknowledgementCleared),
    CommentAdded(CommentAdded),
    CommentRemoved(CommentRemoved),
    DowntimeAdded(DowntimeAdded),
    DowntimeRemoved(DowntimeRemoved),
    DowntimeTriggered(DowntimeTriggered),
}

impl Event {
    /// Category of this event.
    #[must_use]
    pub const fn category(&self) -> Category {
        match self {
            Self::CheckResult(_) => Category::CheckResult,
            Self::StateChange(_) => Category::StateChange,
            Self::Notification(_) => Category::Notification,
            Self::AcknowledgementSet(_) => Category::AcknowledgementSet,
            Self::AcknowledgementCleared(_) => Category::AcknowledgementCleared,
            Self::CommentAdded(_) => Category::CommentAdded,
            Self::CommentRemoved(_) => Category::CommentRemoved,
            Self::DowntimeAdded(_) => Category::DowntimeAdded,
            Self::DowntimeRemoved(_) => Category::DowntimeRemoved,
            Self::DowntimeTriggered(_) => Category::DowntimeTriggered,
        }
    }

    /// Raw timestamp in fractional seconds since the Unix epoch.
    #[must_use]
    pub const fn raw_timestamp(&self) -> f64 {
        match self {
            Self::CheckResult(e) => e.timestamp,
            Self::StateChange(e) => e.timestamp,
            Self::Notification(e) => e.timestamp,
            Self::AcknowledgementSet(e) => e.timestamp,
            Self::AcknowledgementCleared(e) => e.timestamp,
            Self::CommentAdded(e) => e.timestamp,
            Self::CommentRemoved(e) => e.timestamp,
            Self::DowntimeAdded(e) => e.timestamp,
            Self::DowntimeRemoved(e) => e.timestamp,
            Self::DowntimeTriggered(e) => e.timestamp,
        }
    }

    /// Event time, or `None` if the timestamp is not representable.
    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        timestamp_to_datetime(self.raw_timestamp())
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn timestamp_to_datetime(ts: f64) -> Option<DateTime<Utc>> {
    if !ts.is_finite() {
        return None;
    }
    let secs = ts.floor();
    let nanos = ((ts - secs) * 1e9).round().min(999_999_999.0) as u32;
    Utc.timestamp_opt(secs as i64, nanos).single()
}
