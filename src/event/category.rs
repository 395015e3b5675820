use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// Event stream type, as named by the `type` field on the wire.
///
/// The set is closed: the event API only ever emits these ten names, and any
/// other value is treated as a protocol violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Result of a host or service check.
    CheckResult,
    /// Host or service changed state.
    StateChange,
    /// A notification was sent.
    Notification,
    /// A problem was acknowledged.
    AcknowledgementSet,
    /// An acknowledgement was removed.
    AcknowledgementCleared,
    /// A comment was added.
    CommentAdded,
    /// A comment was removed.
    CommentRemoved,
    /// A downtime was scheduled.
    DowntimeAdded,
    /// A downtime was removed.
    DowntimeRemoved,
    /// A scheduled downtime started.
    DowntimeTriggered,
}

impl Category {
    /// Number of categories.
    pub const COUNT: usize = 10;

    /// Every category, in declaration order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::CheckResult,
        Self::StateChange,
        Self::Notification,
        Self::AcknowledgementSet,
        Self::AcknowledgementCleared,
        Self::CommentAdded,
        Self::CommentRemoved,
        Self::DowntimeAdded,
        Self::DowntimeRemoved,
        Self::DowntimeTriggered,
    ];

    /// Wire name of this category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CheckResult => "CheckResult",
            Self::StateChange => "StateChange",
            Self::Notification => "Notification",
            Self::AcknowledgementSet => "AcknowledgementSet",
            Self::AcknowledgementCleared => "AcknowledgementCleared",
            Self::CommentAdded => "CommentAdded",
            Self::CommentRemoved => "CommentRemoved",
            Self::DowntimeAdded => "DowntimeAdded",
            Self::DowntimeRemoved => "DowntimeRemoved",
            Self::DowntimeTriggered => "DowntimeTriggered",
        }
    }

    /// Dense index in `0..COUNT`, stable with `ALL`.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Looks up a category by its exact wire name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ProtocolError::UnregisteredCategory {
            name: s.to_string(),
        })
    }
}
