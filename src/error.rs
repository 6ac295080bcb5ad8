//! Token errors

use std::fmt;

use thiserror::Error;

use crate::{format::TokenFormat, token::TokenField};

/// Reasons a token could not be produced or was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// A required field was empty at encode time.
    #[error("{0} must not be empty")]
    EmptyField(TokenField),

    /// A field contained the `|` delimiter at encode time.
    #[error("{0} must not contain the '|' delimiter")]
    DelimiterInField(TokenField),

    /// An optional field was supplied to a format that cannot carry it.
    #[error("{field} is not supported by the {format} token format")]
    FieldNotSupported {
        /// The rejected field
        field: TokenField,

        /// Format the codec is bound to
        format: TokenFormat,
    },

    /// The token has the wrong number of `|`-separated fields.
    #[error("token has {0} fields")]
    FieldCount(usize),

    /// The first field is not the prefix of the expected format.
    #[error("token prefix does not match the expected format")]
    Prefix,

    /// An optional field has an unknown tag, is duplicated or out of order.
    #[error("token optional field is malformed")]
    OptionalField,

    /// The trailing hash does not match the recomputed digest.
    #[error("token hash does not match its contents")]
    Integrity,

    /// The timestamp field is not a decimal integer.
    #[error("token timestamp is not a valid integer")]
    InvalidTimestamp,

    /// The token is older than the allowed window.
    #[error("token expired {age_ms} ms after issue")]
    Expired {
        /// Milliseconds elapsed since the token was issued
        age_ms: i64,
    },

    /// The token timestamp lies further in the future than the allowed skew.
    #[error("token was issued {ahead_ms} ms in the future")]
    IssuedInFuture {
        /// Milliseconds between now and the token timestamp
        ahead_ms: i64,
    },

    /// A format name could not be parsed.
    #[error("unknown token format {0:?}")]
    UnknownFormat(String),

    /// A field name could not be parsed.
    #[error("unknown token field {0:?}")]
    UnknownField(String),
}

/// Coarse classification of [`TokenError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenErrorKind {
    /// Caller supplied input the encoder cannot represent.
    Encoding,

    /// Wrong field count, prefix or optional-field layout.
    Format,

    /// Hash mismatch.
    Integrity,

    /// A single field failed to parse.
    Field,

    /// Outside the accepted time window.
    Expiry,
}

impl TokenErrorKind {
    /// Lowercase label used in logs and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Encoding => "encoding",
            Self::Format => "format",
            Self::Integrity => "integrity",
            Self::Field => "field",
            Self::Expiry => "expiry",
        }
    }
}

impl fmt::Display for TokenErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TokenError {
    /// Classify this error.
    #[must_use]
    pub const fn kind(&self) -> TokenErrorKind {
        match self {
            Self::EmptyField(_)
            | Self::DelimiterInField(_)
            | Self::FieldNotSupported { .. }
            | Self::UnknownFormat(_)
            | Self::UnknownField(_) => TokenErrorKind::Encoding,
            Self::FieldCount(_) | Self::Prefix | Self::OptionalField => TokenErrorKind::Format,
            Self::Integrity => TokenErrorKind::Integrity,
            Self::InvalidTimestamp => TokenErrorKind::Field,
            Self::Expired { .. } | Self::IssuedInFuture { .. } => TokenErrorKind::Expiry,
        }
    }
}
