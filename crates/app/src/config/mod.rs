//! Configuration

use thiserror::Error;
use vaultpark::signing::SigningKeyError;

pub mod logging;
pub mod scan;
pub mod token;

pub use logging::{LogFormat, LoggingConfig};
pub use scan::ScanConfig;
pub use token::TokenConfig;

/// Errors turning configuration values into runtime components.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The signing key is not valid base64.
    #[error("signing key is not valid base64")]
    SigningKeyEncoding(#[source] base64::DecodeError),

    /// The signing key could not be used.
    #[error("signing key is invalid")]
    SigningKey(#[source] SigningKeyError),
}
