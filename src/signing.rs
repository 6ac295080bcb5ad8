//! Integrity primitives used to compute the trailing token hash.
//!
//! The token layout is independent of the signer. [`Sha256Signer`] detects
//! accidental corruption only; anyone who knows the layout can mint a token.
//! [`HmacSha256Signer`] binds the hash to a secret key held by the gate side.

use std::fmt;

use hmac::{Hmac, Mac};
use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use thiserror::Error;
use zeroize::Zeroize;

type HmacSha256 = Hmac<Sha256>;

/// Length of a freshly generated signing key.
pub const SIGNING_KEY_BYTES: usize = 32;

/// Digest algorithm behind a signer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningAlgorithm {
    /// Plain SHA-256.
    Sha256,

    /// HMAC-SHA-256 with a secret key.
    HmacSha256,
}

impl fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha256 => f.write_str("sha256"),
            Self::HmacSha256 => f.write_str("hmac-sha256"),
        }
    }
}

/// Computes the 32-byte digest over a token payload.
pub trait TokenSigner: Send + Sync + fmt::Debug {
    /// Digest of `payload`.
    fn digest(&self, payload: &[u8]) -> [u8; 32];

    /// Algorithm identifier.
    fn algorithm(&self) -> SigningAlgorithm;

    /// Whether `expected_hex` is the digest of `payload` as lowercase hex cut to
    /// `chars` characters.
    fn verify(&self, payload: &[u8], expected_hex: &str, chars: usize) -> bool {
        expected_hex.len() == chars && digest_hex(&self.digest(payload), chars) == expected_hex
    }
}

/// Unkeyed SHA-256.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Signer;

impl TokenSigner for Sha256Signer {
    fn digest(&self, payload: &[u8]) -> [u8; 32] {
        Sha256::digest(payload).into()
    }

    fn algorithm(&self) -> SigningAlgorithm {
        SigningAlgorithm::Sha256
    }
}

/// Errors building signing keys.
#[derive(Debug, Error)]
pub enum SigningKeyError {
    /// Key material was empty.
    #[error("signing key must not be empty")]
    Empty,

    /// The MAC rejected the key length.
    #[error("signing key length is not accepted")]
    Length,
}

/// Secret key material for keyed signers.
#[derive(Clone)]
pub struct SigningKey {
    bytes: Vec<u8>,
}

impl SigningKey {
    /// Wrap existing key material.
    ///
    /// # Errors
    ///
    /// Returns [`SigningKeyError::Empty`] if `bytes` is empty.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, SigningKeyError> {
        if bytes.is_empty() {
            return Err(SigningKeyError::Empty);
        }

        Ok(Self { bytes })
    }

    /// Generate a random key from the operating system RNG.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = vec![0_u8; SIGNING_KEY_BYTES];

        OsRng.fill_bytes(&mut bytes);

        Self { bytes }
    }

    /// Raw key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(**redacted**)")
    }
}

impl Drop for SigningKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

/// HMAC-SHA-256 keyed signer.
#[derive(Clone)]
pub struct HmacSha256Signer {
    mac: HmacSha256,
}

impl HmacSha256Signer {
    /// Signer keyed with `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the MAC cannot be initialised with the key.
    pub fn new(key: &SigningKey) -> Result<Self, SigningKeyError> {
        let mac =
            HmacSha256::new_from_slice(key.as_bytes()).or(Err(SigningKeyError::Length))?;

        Ok(Self { mac })
    }
}

impl fmt::Debug for HmacSha256Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HmacSha256Signer(**redacted**)")
    }
}

impl TokenSigner for HmacSha256Signer {
    fn digest(&self, payload: &[u8]) -> [u8; 32] {
        let mut mac = self.mac.clone();

        mac.update(payload);

        mac.finalize().into_bytes().into()
    }

    fn algorithm(&self) -> SigningAlgorithm {
        SigningAlgorithm::HmacSha256
    }

    fn verify(&self, payload: &[u8], expected_hex: &str, chars: usize) -> bool {
        if expected_hex.len() != chars || !is_lower_hex(expected_hex) {
            return false;
        }

        let Ok(tag) = hex::decode(expected_hex) else {
            return false;
        };

        let mut mac = self.mac.clone();

        mac.update(payload);

        // Constant-time comparison of the leading tag bytes.
        mac.verify_truncated_left(&tag).is_ok()
    }
}

fn is_lower_hex(value: &str) -> bool {
    value
        .bytes()
        .all(|byte| matches!(byte, b'0'..=b'9' | b'a'..=b'f'))
}

/// Lowercase hex of `digest`, cut to `chars` characters.
pub(crate) fn digest_hex(digest: &[u8; 32], chars: usize) -> String {
    let mut encoded = hex::encode(digest);

    encoded.truncate(chars);

    encoded
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn sha256_matches_known_vector() {
        let digest = Sha256Signer.digest(b"abc");

        assert_eq!(
            digest_hex(&digest, 64),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn hmac_depends_on_key() -> TestResult {
        let a = HmacSha256Signer::new(&SigningKey::from_bytes(b"key-a".to_vec())?)?;
        let b = HmacSha256Signer::new(&SigningKey::from_bytes(b"key-b".to_vec())?)?;

        assert_ne!(a.digest(b"payload"), b.digest(b"payload"), "keys must matter");
        assert_eq!(a.digest(b"payload"), a.digest(b"payload"), "must be deterministic");

        Ok(())
    }

    #[test]
    fn hmac_matches_rfc4231_case_2() -> TestResult {
        let signer = HmacSha256Signer::new(&SigningKey::from_bytes(b"Jefe".to_vec())?)?;
        let digest = signer.digest(b"what do ya want for nothing?");

        assert_eq!(
            digest_hex(&digest, 64),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );

        Ok(())
    }

    #[test]
    fn hmac_verify_accepts_truncated_lowercase_tags() -> TestResult {
        let signer = HmacSha256Signer::new(&SigningKey::from_bytes(b"Jefe".to_vec())?)?;
        let payload = b"what do ya want for nothing?";
        let full = "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843";

        assert!(signer.verify(payload, full, 64), "full tag");
        assert!(signer.verify(payload, "5bdcc146bf60754e", 16), "truncated tag");
        assert!(!signer.verify(payload, "5bdcc146bf60754f", 16), "last char changed");

        Ok(())
    }

    #[test]
    fn hmac_verify_fails_closed_on_malformed_tags() -> TestResult {
        let signer = HmacSha256Signer::new(&SigningKey::from_bytes(b"Jefe".to_vec())?)?;
        let payload = b"what do ya want for nothing?";

        for (tag, chars) in [
            ("5BDCC146BF60754E", 16),
            ("5bdcc146bf60754", 15),
            ("5bdcc146bf60754", 16),
            ("5bdcc146bf60754e6", 16),
            ("zbdcc146bf60754e", 16),
            ("", 0),
        ] {
            assert!(!signer.verify(payload, tag, chars), "{tag:?} must not verify");
        }

        Ok(())
    }

    #[test]
    fn sha256_verify_is_case_sensitive() {
        assert!(Sha256Signer.verify(b"abc", "ba7816bf8f01cfea", 16), "lowercase");
        assert!(!Sha256Signer.verify(b"abc", "BA7816BF8F01CFEA", 16), "uppercase");
        assert!(!Sha256Signer.verify(b"abc", "ba7816bf8f01cfe", 16), "short");
    }

    #[test]
    fn empty_key_is_rejected() {
        assert!(
            matches!(SigningKey::from_bytes(Vec::new()), Err(SigningKeyError::Empty)),
            "empty key must be rejected"
        );
    }

    #[test]
    fn key_debug_is_redacted() {
        let key = SigningKey::generate();

        assert_eq!(key.as_bytes().len(), SIGNING_KEY_BYTES);
        assert_eq!(format!("{key:?}"), "SigningKey(**redacted**)");
    }

    #[test]
    fn truncation_keeps_leading_chars() {
        let digest = Sha256Signer.digest(b"abc");

        assert_eq!(digest_hex(&digest, 16), "ba7816bf8f01cfea");
    }
}
