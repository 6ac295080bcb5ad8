//! Token formats

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::TokenError;

/// Separator between token fields.
pub const DELIMITER: char = '|';

/// Prefix of compact (v1) tokens.
pub const COMPACT_PREFIX: &str = "VAULTPARK";

/// Prefix of extended (v2) tokens.
pub const EXTENDED_PREFIX: &str = "VAULTPARK-v2";

/// Hex characters kept from the digest in compact tokens.
pub const COMPACT_HASH_CHARS: usize = 16;

/// Hex characters of a full SHA-256 digest.
pub const FULL_HASH_CHARS: usize = 64;

/// Tag introducing the gate hint field of extended tokens.
pub const GATE_TAG: &str = "gate:";

/// Tag introducing the lot identifier field of extended tokens.
pub const LOT_TAG: &str = "lot:";

/// Prefix, user id, timestamp, vehicle number and hash.
const REQUIRED_FIELDS: usize = 5;

/// Versioned token layout.
///
/// A codec is bound to exactly one format. The prefixes differ, so a token
/// produced under one format never passes the format check of the other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenFormat {
    /// `VAULTPARK|user|timestamp|vehicle|hash16`
    #[default]
    Compact,

    /// `VAULTPARK-v2|user|timestamp|vehicle[|gate:..][|lot:..]|hash64`
    Extended,
}

impl TokenFormat {
    /// Constant first field of tokens in this format.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Compact => COMPACT_PREFIX,
            Self::Extended => EXTENDED_PREFIX,
        }
    }

    /// Length of the trailing hex hash.
    #[must_use]
    pub const fn hash_chars(self) -> usize {
        match self {
            Self::Compact => COMPACT_HASH_CHARS,
            Self::Extended => FULL_HASH_CHARS,
        }
    }

    /// Short version label, also accepted by [`FromStr`].
    #[must_use]
    pub const fn version(self) -> &'static str {
        match self {
            Self::Compact => "v1",
            Self::Extended => "v2",
        }
    }

    /// Whether this format carries the optional gate and lot fields.
    #[must_use]
    pub const fn supports_optional_fields(self) -> bool {
        matches!(self, Self::Extended)
    }

    /// Inclusive range of field counts a well-formed token may have.
    #[must_use]
    pub const fn field_count_range(self) -> (usize, usize) {
        match self {
            Self::Compact => (REQUIRED_FIELDS, REQUIRED_FIELDS),
            Self::Extended => (REQUIRED_FIELDS, REQUIRED_FIELDS + 2),
        }
    }

    /// Whether `count` `|`-separated fields is acceptable for this format.
    #[must_use]
    pub const fn accepts_field_count(self, count: usize) -> bool {
        let (min, max) = self.field_count_range();

        count >= min && count <= max
    }
}

impl fmt::Display for TokenFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compact => f.write_str("compact"),
            Self::Extended => f.write_str("extended"),
        }
    }
}

impl FromStr for TokenFormat {
    type Err = TokenError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "compact" | "v1" => Ok(Self::Compact),
            "extended" | "v2" => Ok(Self::Extended),
            _ => Err(TokenError::UnknownFormat(value.to_string())),
        }
    }
}
