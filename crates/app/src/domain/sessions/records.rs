//! Session Records

use jiff::Timestamp;
use serde::Serialize;
use uuid::Uuid;

/// Session Record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionRecord {
    /// Unique session identifier.
    pub uuid: Uuid,

    /// Driver the session belongs to.
    pub user_id: String,

    /// Vehicle parked under the session.
    pub vehicle_number: String,

    /// Gate hint carried by the entry token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gate: Option<String>,

    /// Lot identifier carried by the entry token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lot: Option<String>,

    /// Timestamp embedded in the entry token, in milliseconds.
    pub token_timestamp_ms: i64,

    /// Entry scan time.
    pub entered_at: Timestamp,

    /// Exit scan time, once closed.
    pub exited_at: Option<Timestamp>,
}

impl SessionRecord {
    /// Whether the vehicle is still parked.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.exited_at.is_none()
    }
}

/// Result of toggling a driver and vehicle's session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionToggle {
    /// No session was open; a new one was opened.
    Opened(SessionRecord),

    /// The open session was closed.
    Closed(SessionRecord),
}
