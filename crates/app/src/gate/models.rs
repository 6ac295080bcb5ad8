//! Gate scan models.

use std::fmt;

use serde::Serialize;

use crate::domain::sessions::records::SessionRecord;

/// Which way the vehicle passed the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// A new session was opened.
    Entry,

    /// An open session was closed.
    Exit,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entry => f.write_str("entry"),
            Self::Exit => f.write_str("exit"),
        }
    }
}

/// Accepted scan result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanOutcome {
    /// Entry or exit.
    pub direction: Direction,

    /// Session after the scan was applied.
    pub session: SessionRecord,
}
