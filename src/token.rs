//! Token values and claims.

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{clock::Clock, error::TokenError};

/// A generated QR token string.
///
/// The contents are fixed once produced by the encoder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QrToken(String);

impl QrToken {
    pub(crate) const fn new(token: String) -> Self {
        Self(token)
    }

    /// Borrow the token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take ownership of the token text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for QrToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QrToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<QrToken> for String {
    fn from(value: QrToken) -> Self {
        value.0
    }
}

/// Named positional token field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenField {
    /// Driver presenting the token.
    UserId,

    /// Creation time in milliseconds since the Unix epoch.
    Timestamp,

    /// Plate or vehicle identifier.
    VehicleNumber,

    /// Gate hint (extended format only).
    Gate,

    /// Lot identifier (extended format only).
    Lot,
}

impl TokenField {
    /// Canonical field name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UserId => "userId",
            Self::Timestamp => "timestamp",
            Self::VehicleNumber => "vehicleNumber",
            Self::Gate => "gate",
            Self::Lot => "lot",
        }
    }
}

impl fmt::Display for TokenField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenField {
    type Err = TokenError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "userId" | "user_id" => Ok(Self::UserId),
            "timestamp" => Ok(Self::Timestamp),
            "vehicleNumber" | "vehicle_number" => Ok(Self::VehicleNumber),
            "gate" => Ok(Self::Gate),
            "lot" => Ok(Self::Lot),
            _ => Err(TokenError::UnknownField(value.to_string())),
        }
    }
}

/// Values carried by a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Driver presenting the token.
    pub user_id: String,

    /// Plate or vehicle identifier.
    pub vehicle_number: String,

    /// Creation time in milliseconds since the Unix epoch.
    pub timestamp_ms: i64,

    /// Gate hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gate: Option<String>,

    /// Lot identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lot: Option<String>,
}

impl TokenClaims {
    /// Claims for a driver and vehicle at a fixed time.
    pub fn new(
        user_id: impl Into<String>,
        vehicle_number: impl Into<String>,
        timestamp_ms: i64,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            vehicle_number: vehicle_number.into(),
            timestamp_ms,
            gate: None,
            lot: None,
        }
    }

    /// Claims stamped with the clock's current time.
    pub fn issued_now(
        user_id: impl Into<String>,
        vehicle_number: impl Into<String>,
        clock: &dyn Clock,
    ) -> Self {
        Self::new(user_id, vehicle_number, clock.now_millis())
    }

    /// Attach a gate hint.
    #[must_use]
    pub fn with_gate(mut self, gate: impl Into<String>) -> Self {
        self.gate = Some(gate.into());
        self
    }

    /// Attach a lot identifier.
    #[must_use]
    pub fn with_lot(mut self, lot: impl Into<String>) -> Self {
        self.lot = Some(lot.into());
        self
    }

    /// Creation time, if representable.
    pub fn issued_at(&self) -> Option<Timestamp> {
        Timestamp::from_millisecond(self.timestamp_ms).ok()
    }
}

/// Borrowed view of a token that passed the format check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawToken<'a> {
    /// Driver presenting the token.
    pub user_id: &'a str,

    /// Unparsed timestamp field.
    pub timestamp: &'a str,

    /// Plate or vehicle identifier.
    pub vehicle_number: &'a str,

    /// Gate hint without its tag.
    pub gate: Option<&'a str>,

    /// Lot identifier without its tag.
    pub lot: Option<&'a str>,

    /// Everything before the final delimiter; the bytes the hash covers.
    pub payload: &'a str,

    /// Trailing hash field.
    pub hash: &'a str,
}

impl<'a> RawToken<'a> {
    /// Look up a field by name.
    #[must_use]
    pub const fn field(&self, field: TokenField) -> Option<&'a str> {
        match field {
            TokenField::UserId => Some(self.user_id),
            TokenField::Timestamp => Some(self.timestamp),
            TokenField::VehicleNumber => Some(self.vehicle_number),
            TokenField::Gate => self.gate,
            TokenField::Lot => self.lot,
        }
    }

    /// Parse the timestamp field.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidTimestamp`] if the field is not a decimal `i64`.
    pub fn timestamp_ms(&self) -> Result<i64, TokenError> {
        self.timestamp
            .parse::<i64>()
            .or(Err(TokenError::InvalidTimestamp))
    }

    /// Convert into owned claims.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidTimestamp`] if the timestamp does not parse.
    pub fn to_claims(&self) -> Result<TokenClaims, TokenError> {
        Ok(TokenClaims {
            user_id: self.user_id.to_string(),
            vehicle_number: self.vehicle_number.to_string(),
            timestamp_ms: self.timestamp_ms()?,
            gate: self.gate.map(str::to_string),
            lot: self.lot.map(str::to_string),
        })
    }
}
