mod log;

pub use log::{EventLog, EVENT_LOG_CAPACITY};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of cluster activity an event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    /// Leader or term change.
    Election,
    /// Sessions created or expired.
    Session,
    /// Locks acquired or released, fence token movement.
    Lock,
    /// Session keepalive traffic.
    Keepalive,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Election => "election",
            Self::Session => "session",
            Self::Lock => "lock",
            Self::Keepalive => "keepalive",
        }
    }
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A derived, human readable cluster event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub category: EventCategory,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl Event {
    pub fn new(category: EventCategory, message: impl Into<String>) -> Self {
        Self::at(category, message, Utc::now())
    }

    pub fn at(
        category: EventCategory,
        message: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            category,
            message: message.into(),
            timestamp,
        }
    }
}
