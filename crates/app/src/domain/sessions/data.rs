//! Session Data

use jiff::Timestamp;
use uuid::Uuid;

/// New Session Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewSession {
    /// UUID to assign to the session.
    pub uuid: Uuid,

    /// Driver the session belongs to.
    pub user_id: String,

    /// Vehicle parked under the session.
    pub vehicle_number: String,

    /// Gate hint carried by the entry token.
    pub gate: Option<String>,

    /// Lot identifier carried by the entry token.
    pub lot: Option<String>,

    /// Timestamp embedded in the entry token, in milliseconds.
    pub token_timestamp_ms: i64,

    /// Time the entry scan was accepted.
    pub entered_at: Timestamp,
}
