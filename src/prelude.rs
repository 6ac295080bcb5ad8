//! Prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    clock::{Clock, FixedClock, SystemClock},
    codec::TokenCodec,
    error::{TokenError, TokenErrorKind},
    expiry::ExpiryPolicy,
    format::TokenFormat,
    signing::{HmacSha256Signer, Sha256Signer, SigningAlgorithm, SigningKey, TokenSigner},
    token::{QrToken, RawToken, TokenClaims, TokenField},
};
