//! Token Config

use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use clap::Args;
use jiff::SignedDuration;
use vaultpark::{
    codec::TokenCodec,
    expiry::ExpiryPolicy,
    format::TokenFormat,
    signing::{HmacSha256Signer, Sha256Signer, SigningKey, TokenSigner},
};

use crate::config::ConfigError;

/// Token format, signing and freshness settings.
#[derive(Debug, Args)]
pub struct TokenConfig {
    /// Token format (compact, extended)
    #[arg(
        long = "token-format",
        env = "VAULTPARK_TOKEN_FORMAT",
        default_value = "compact",
        global = true
    )]
    pub format: TokenFormat,

    /// Base64 HMAC-SHA-256 key; tokens use unkeyed SHA-256 when omitted
    #[arg(
        long,
        env = "VAULTPARK_SIGNING_KEY",
        hide_env_values = true,
        global = true
    )]
    pub signing_key: Option<String>,

    /// Maximum token age in seconds (0 accepts any age)
    #[arg(
        long,
        env = "VAULTPARK_TOKEN_MAX_AGE_SECONDS",
        default_value_t = 300_u64,
        global = true
    )]
    pub max_age_seconds: u64,

    /// Accepted clock skew in seconds for tokens stamped in the future
    #[arg(
        long,
        env = "VAULTPARK_TOKEN_MAX_SKEW_SECONDS",
        default_value_t = 30_u64,
        global = true
    )]
    pub max_skew_seconds: u64,
}

impl TokenConfig {
    /// Freshness window described by this configuration.
    #[must_use]
    pub fn expiry_policy(&self) -> ExpiryPolicy {
        let policy = match self.max_age_seconds {
            0 => ExpiryPolicy::unbounded(),
            seconds => ExpiryPolicy::within(seconds_duration(seconds)),
        };

        policy.with_max_clock_skew(seconds_duration(self.max_skew_seconds))
    }

    /// Decoded signing key, if one is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not base64 or decodes to nothing.
    pub fn signing_key(&self) -> Result<Option<SigningKey>, ConfigError> {
        let Some(encoded) = self.signing_key.as_deref() else {
            return Ok(None);
        };

        let bytes = BASE64
            .decode(encoded.trim())
            .map_err(ConfigError::SigningKeyEncoding)?;

        SigningKey::from_bytes(bytes)
            .map(Some)
            .map_err(ConfigError::SigningKey)
    }

    /// Signer selected by this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured signing key is invalid.
    pub fn signer(&self) -> Result<Arc<dyn TokenSigner>, ConfigError> {
        match self.signing_key()? {
            Some(key) => Ok(Arc::new(
                HmacSha256Signer::new(&key).map_err(ConfigError::SigningKey)?,
            )),
            None => Ok(Arc::new(Sha256Signer)),
        }
    }

    /// Codec for the configured format and signer.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured signing key is invalid.
    pub fn codec(&self) -> Result<TokenCodec, ConfigError> {
        Ok(TokenCodec::new(self.format, self.signer()?))
    }
}

fn seconds_duration(seconds: u64) -> SignedDuration {
    SignedDuration::from_secs(i64::try_from(seconds).unwrap_or(i64::MAX))
}
