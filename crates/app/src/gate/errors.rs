//! Gate scan errors.

use thiserror::Error;
use vaultpark::error::{TokenError, TokenErrorKind};

use crate::domain::sessions::SessionsStoreError;

/// Reasons a scanned token did not produce an entry or exit.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The token failed format, integrity, timestamp or freshness checks.
    #[error("token rejected: {0}")]
    Rejected(#[from] TokenError),

    /// The token names a different gate.
    #[error("token is for gate {found:?}, this is gate {expected:?}")]
    WrongGate {
        /// Gate this scanner serves
        expected: String,

        /// Gate hint carried by the token
        found: String,
    },

    /// The token was already used for a scan.
    #[error("token has already been scanned")]
    Replayed,

    /// The scanner clock is outside the representable range.
    #[error("scanner clock is out of range")]
    Clock(#[source] jiff::Error),

    /// The session store failed.
    #[error("session store error")]
    Store(#[from] SessionsStoreError),
}

impl ScanError {
    /// Short machine-readable reason.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::Rejected(error) => match error.kind() {
                TokenErrorKind::Encoding | TokenErrorKind::Format => "format",
                TokenErrorKind::Integrity => "integrity",
                TokenErrorKind::Field => "field",
                TokenErrorKind::Expiry => "expiry",
            },
            Self::WrongGate { .. } => "wrong_gate",
            Self::Replayed => "replayed",
            Self::Clock(_) => "clock",
            Self::Store(_) => "store",
        }
    }
}
