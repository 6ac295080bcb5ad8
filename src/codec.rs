//! Token encoding and validation.
//!
//! A token is the `|`-joined list of its fields followed by a hex hash over
//! the exact text before the final delimiter:
//!
//! ```text
//! VAULTPARK|driver-42|1700000000000|ABC-123|<16 hex chars>
//! VAULTPARK-v2|driver-42|1700000000000|ABC-123|gate:north|lot:L2|<64 hex chars>
//! ```
//!
//! The boolean and optional-returning checks accept any string and never panic;
//! malformed input is simply rejected.

use std::sync::Arc;

use smallvec::SmallVec;

use crate::{
    clock::Clock,
    error::TokenError,
    expiry::ExpiryPolicy,
    format::{DELIMITER, GATE_TAG, LOT_TAG, TokenFormat},
    signing::{Sha256Signer, SigningAlgorithm, TokenSigner, digest_hex},
    token::{QrToken, RawToken, TokenClaims, TokenField},
};

type Fields<'a> = SmallVec<[&'a str; 8]>;

/// Encoder and validator bound to one format and one signer.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    format: TokenFormat,
    signer: Arc<dyn TokenSigner>,
}

impl TokenCodec {
    /// Codec using `signer` for the trailing hash.
    #[must_use]
    pub fn new(format: TokenFormat, signer: Arc<dyn TokenSigner>) -> Self {
        Self { format, signer }
    }

    /// Codec using plain SHA-256.
    #[must_use]
    pub fn unkeyed(format: TokenFormat) -> Self {
        Self::new(format, Arc::new(Sha256Signer))
    }

    /// Format this codec produces and accepts.
    #[must_use]
    pub const fn format(&self) -> TokenFormat {
        self.format
    }

    /// Algorithm behind the trailing hash.
    #[must_use]
    pub fn algorithm(&self) -> SigningAlgorithm {
        self.signer.algorithm()
    }

    /// Encode `claims` into a token.
    ///
    /// # Errors
    ///
    /// Returns an error if the user id or vehicle number is empty, if any
    /// field contains the `|` delimiter, or if optional fields are supplied to
    /// a format that cannot carry them.
    pub fn encode(&self, claims: &TokenClaims) -> Result<QrToken, TokenError> {
        require_value(TokenField::UserId, &claims.user_id)?;
        require_value(TokenField::VehicleNumber, &claims.vehicle_number)?;

        let timestamp = claims.timestamp_ms.to_string();

        let mut payload = String::with_capacity(
            self.format.prefix().len()
                + claims.user_id.len()
                + timestamp.len()
                + claims.vehicle_number.len()
                + 16,
        );

        payload.push_str(self.format.prefix());

        for field in [
            claims.user_id.as_str(),
            timestamp.as_str(),
            claims.vehicle_number.as_str(),
        ] {
            payload.push(DELIMITER);
            payload.push_str(field);
        }

        for (field, tag, value) in [
            (TokenField::Gate, GATE_TAG, claims.gate.as_deref()),
            (TokenField::Lot, LOT_TAG, claims.lot.as_deref()),
        ] {
            let Some(value) = value else {
                continue;
            };

            if !self.format.supports_optional_fields() {
                return Err(TokenError::FieldNotSupported {
                    field,
                    format: self.format,
                });
            }

            require_value(field, value)?;

            payload.push(DELIMITER);
            payload.push_str(tag);
            payload.push_str(value);
        }

        let hash = self.hash(&payload);

        payload.push(DELIMITER);
        payload.push_str(&hash);

        Ok(QrToken::new(payload))
    }

    /// Encode a token for `user_id` and `vehicle_number` stamped with the clock's time.
    ///
    /// # Errors
    ///
    /// See [`TokenCodec::encode`].
    pub fn encode_now(
        &self,
        user_id: &str,
        vehicle_number: &str,
        clock: &dyn Clock,
    ) -> Result<QrToken, TokenError> {
        self.encode(&TokenClaims::issued_now(user_id, vehicle_number, clock))
    }

    /// Whether `token` has the field count and prefix of this codec's format.
    pub fn validate_format(&self, token: &str) -> bool {
        self.check_format(token).is_ok()
    }

    /// Whether `token` is well-formed and its hash matches its contents.
    pub fn verify_integrity(&self, token: &str) -> bool {
        self.check_integrity(token).is_ok()
    }

    /// A named field of a well-formed token.
    ///
    /// Returns `None` for format-invalid tokens and for optional fields the
    /// token does not carry. The hash is not checked.
    pub fn extract_field<'a>(&self, token: &'a str, field: TokenField) -> Option<&'a str> {
        self.check_format(token).ok()?.field(field)
    }

    /// The timestamp of a well-formed token, if it parses as an integer.
    pub fn extract_timestamp(&self, token: &str) -> Option<i64> {
        self.check_format(token).ok()?.timestamp_ms().ok()
    }

    /// Split `token` and check its layout.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::FieldCount`], [`TokenError::Prefix`] or
    /// [`TokenError::OptionalField`] describing the first layout problem.
    pub fn check_format<'a>(&self, token: &'a str) -> Result<RawToken<'a>, TokenError> {
        let fields: Fields<'a> = token.split(DELIMITER).collect();

        if !self.format.accepts_field_count(fields.len()) {
            return Err(TokenError::FieldCount(fields.len()));
        }

        let Some((hash, fields)) = fields.split_last() else {
            return Err(TokenError::FieldCount(0));
        };

        let [prefix, user_id, timestamp, vehicle_number, optional @ ..] = fields else {
            return Err(TokenError::FieldCount(fields.len() + 1));
        };

        if *prefix != self.format.prefix() {
            return Err(TokenError::Prefix);
        }

        let (gate, lot) = parse_optional_fields(optional)?;

        let payload = token
            .rsplit_once(DELIMITER)
            .map_or(token, |(payload, _)| payload);

        Ok(RawToken {
            user_id: *user_id,
            timestamp: *timestamp,
            vehicle_number: *vehicle_number,
            gate,
            lot,
            payload,
            hash: *hash,
        })
    }

    /// Check layout and hash.
    ///
    /// # Errors
    ///
    /// Returns the format error from [`TokenCodec::check_format`], or
    /// [`TokenError::Integrity`] if the hash does not match.
    pub fn check_integrity<'a>(&self, token: &'a str) -> Result<RawToken<'a>, TokenError> {
        let raw = self.check_format(token)?;

        if !self
            .signer
            .verify(raw.payload.as_bytes(), raw.hash, self.format.hash_chars())
        {
            return Err(TokenError::Integrity);
        }

        Ok(raw)
    }

    /// Check layout and hash, then parse the claims.
    ///
    /// The token timestamp is not compared with the current time.
    ///
    /// # Errors
    ///
    /// Returns a format, integrity or timestamp error.
    pub fn decode(&self, token: &str) -> Result<TokenClaims, TokenError> {
        self.check_integrity(token)?.to_claims()
    }

    /// Decode `token` and check its timestamp against `policy` at `now_ms`.
    ///
    /// # Errors
    ///
    /// Returns a format, integrity, timestamp or expiry error.
    pub fn verify(
        &self,
        token: &str,
        policy: &ExpiryPolicy,
        now_ms: i64,
    ) -> Result<TokenClaims, TokenError> {
        let claims = self.decode(token)?;

        policy.check(claims.timestamp_ms, now_ms)?;

        Ok(claims)
    }

    fn hash(&self, payload: &str) -> String {
        digest_hex(
            &self.signer.digest(payload.as_bytes()),
            self.format.hash_chars(),
        )
    }
}

impl Default for TokenCodec {
    fn default() -> Self {
        Self::unkeyed(TokenFormat::default())
    }
}

fn require_value(field: TokenField, value: &str) -> Result<(), TokenError> {
    if value.is_empty() {
        return Err(TokenError::EmptyField(field));
    }

    if value.contains(DELIMITER) {
        return Err(TokenError::DelimiterInField(field));
    }

    Ok(())
}

/// Tagged optional fields must appear as `gate:` then `lot:`, each at most once.
fn parse_optional_fields<'a>(
    optional: &[&'a str],
) -> Result<(Option<&'a str>, Option<&'a str>), TokenError> {
    let mut gate = None;
    let mut lot = None;

    for field in optional {
        if let Some(value) = field.strip_prefix(GATE_TAG)
            && gate.is_none()
            && lot.is_none()
        {
            gate = Some(value);
        } else if let Some(value) = field.strip_prefix(LOT_TAG)
            && lot.is_none()
        {
            lot = Some(value);
        } else {
            return Err(TokenError::OptionalField);
        }
    }

    Ok((gate, lot))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        clock::FixedClock,
        signing::{HmacSha256Signer, SigningKey},
    };

    use super::*;

    const ISSUED: i64 = 1_700_000_000_000;

    fn compact() -> TokenCodec {
        TokenCodec::unkeyed(TokenFormat::Compact)
    }

    fn extended() -> TokenCodec {
        TokenCodec::unkeyed(TokenFormat::Extended)
    }

    #[test]
    fn compact_token_layout() -> TestResult {
        let token = compact().encode(&TokenClaims::new("driver-42", "ABC-123", ISSUED))?;
        let (payload, hash) = token.as_str().rsplit_once('|').ok_or("missing hash")?;

        assert_eq!(payload, "VAULTPARK|driver-42|1700000000000|ABC-123");
        assert_eq!(hash.len(), 16);
        assert!(
            hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()),
            "hash must be lowercase hex: {hash}"
        );

        Ok(())
    }

    #[test]
    fn compact_hash_is_truncated_sha256_of_payload() -> TestResult {
        let token = compact().encode(&TokenClaims::new("driver-42", "ABC-123", ISSUED))?;
        let expected = digest_hex(
            &Sha256Signer.digest(b"VAULTPARK|driver-42|1700000000000|ABC-123"),
            16,
        );

        assert!(token.as_str().ends_with(&expected), "{token} should end with {expected}");

        Ok(())
    }

    #[test]
    fn extended_token_carries_tagged_optional_fields() -> TestResult {
        let codec = extended();
        let claims = TokenClaims::new("driver-42", "ABC-123", ISSUED)
            .with_gate("north")
            .with_lot("L2");
        let token = codec.encode(&claims)?;

        assert!(
            token
                .as_str()
                .starts_with("VAULTPARK-v2|driver-42|1700000000000|ABC-123|gate:north|lot:L2|"),
            "unexpected layout: {token}"
        );
        assert_eq!(token.as_str().rsplit_once('|').map(|(_, h)| h.len()), Some(64));
        assert_eq!(codec.decode(token.as_str())?, claims);

        Ok(())
    }

    #[test]
    fn extended_token_with_lot_only() -> TestResult {
        let codec = extended();
        let claims = TokenClaims::new("driver-42", "ABC-123", ISSUED).with_lot("L9");
        let token = codec.encode(&claims)?;

        assert_eq!(codec.extract_field(token.as_str(), TokenField::Gate), None);
        assert_eq!(codec.extract_field(token.as_str(), TokenField::Lot), Some("L9"));

        Ok(())
    }

    #[test]
    fn compact_rejects_optional_fields() {
        let claims = TokenClaims::new("driver-42", "ABC-123", ISSUED).with_gate("north");

        assert_eq!(
            compact().encode(&claims),
            Err(TokenError::FieldNotSupported {
                field: TokenField::Gate,
                format: TokenFormat::Compact,
            })
        );
    }

    #[test]
    fn encode_rejects_empty_and_delimited_fields() {
        let codec = extended();

        assert_eq!(
            codec.encode(&TokenClaims::new("", "ABC-123", ISSUED)),
            Err(TokenError::EmptyField(TokenField::UserId))
        );
        assert_eq!(
            codec.encode(&TokenClaims::new("driver|42", "ABC-123", ISSUED)),
            Err(TokenError::DelimiterInField(TokenField::UserId))
        );
        assert_eq!(
            codec.encode(&TokenClaims::new("driver-42", "ABC|123", ISSUED)),
            Err(TokenError::DelimiterInField(TokenField::VehicleNumber))
        );
        assert_eq!(
            codec.encode(&TokenClaims::new("driver-42", "ABC-123", ISSUED).with_lot("")),
            Err(TokenError::EmptyField(TokenField::Lot))
        );
    }

    #[test]
    fn encode_now_stamps_clock_time() -> TestResult {
        let codec = compact();
        let token = codec.encode_now("driver-42", "ABC-123", &FixedClock::new(ISSUED))?;

        assert_eq!(codec.extract_timestamp(token.as_str()), Some(ISSUED));

        Ok(())
    }

    #[test]
    fn formats_reject_each_other() -> TestResult {
        let compact_token = compact().encode(&TokenClaims::new("u", "v", ISSUED))?;
        let extended_token = extended().encode(&TokenClaims::new("u", "v", ISSUED))?;

        assert!(!extended().validate_format(compact_token.as_str()), "v1 under v2");
        assert!(!compact().validate_format(extended_token.as_str()), "v2 under v1");

        Ok(())
    }

    #[test]
    fn check_format_reports_reason() {
        let codec = compact();

        assert_eq!(
            codec.check_format("VAULTPARK|a|b").err(),
            Some(TokenError::FieldCount(3))
        );
        assert_eq!(
            codec.check_format("PARKVAULT|a|1|b|0000").err(),
            Some(TokenError::Prefix)
        );
        assert_eq!(codec.check_format("").err(), Some(TokenError::FieldCount(1)));
    }

    #[test]
    fn extended_rejects_malformed_optional_fields() {
        let codec = extended();

        for token in [
            "VAULTPARK-v2|u|1|v|lane:3|h",
            "VAULTPARK-v2|u|1|v|lot:a|gate:b|h",
            "VAULTPARK-v2|u|1|v|gate:a|gate:b|h",
            "VAULTPARK-v2|u|1|v|lot:a|lot:b|h",
        ] {
            assert_eq!(
                codec.check_format(token).err(),
                Some(TokenError::OptionalField),
                "{token} should be rejected"
            );
        }
    }

    #[test]
    fn integrity_detects_hash_change() -> TestResult {
        let codec = compact();
        let token = codec.encode(&TokenClaims::new("driver-42", "ABC-123", ISSUED))?;
        let mut tampered = token.as_str().to_string();
        let last = tampered.pop().ok_or("empty token")?;

        tampered.push(if last == '0' { '1' } else { '0' });

        assert!(codec.verify_integrity(token.as_str()), "untampered token must verify");
        assert!(!codec.verify_integrity(&tampered), "tampered must not verify");
        assert_eq!(codec.check_integrity(&tampered).err(), Some(TokenError::Integrity));

        Ok(())
    }

    #[test]
    fn integrity_is_case_sensitive() -> TestResult {
        let codec = extended();
        let token = codec.encode(&TokenClaims::new("driver-42", "ABC-123", ISSUED))?;
        let (payload, hash) = token.as_str().rsplit_once('|').ok_or("missing hash")?;
        let upper = format!("{payload}|{}", hash.to_uppercase());

        assert_ne!(upper, token.as_str(), "digest should contain hex letters");
        assert!(!codec.verify_integrity(&upper), "uppercase hash must not verify");

        Ok(())
    }

    #[test]
    fn keyed_integrity_rejects_malformed_hashes() -> TestResult {
        let key = SigningKey::from_bytes(b"gate-secret".to_vec())?;
        let codec = TokenCodec::new(TokenFormat::Compact, Arc::new(HmacSha256Signer::new(&key)?));
        let token = codec.encode(&TokenClaims::new("driver-42", "ABC-123", ISSUED))?;
        let (payload, hash) = token.as_str().rsplit_once('|').ok_or("missing hash")?;
        let short: String = hash.chars().take(15).collect();

        for tampered in [
            format!("{payload}|{}", hash.to_uppercase()),
            format!("{payload}|{short}"),
            format!("{payload}|{hash}0"),
            format!("{payload}|"),
        ]
        .into_iter()
        .filter(|tampered| tampered != token.as_str())
        {
            assert!(!codec.verify_integrity(&tampered), "{tampered:?} must not verify");
        }

        assert!(codec.verify_integrity(token.as_str()), "untampered token must verify");

        Ok(())
    }

    #[test]
    fn keyed_tokens_fail_under_other_keys() -> TestResult {
        let key = SigningKey::from_bytes(b"gate-secret".to_vec())?;
        let other = SigningKey::from_bytes(b"forger".to_vec())?;
        let codec = TokenCodec::new(TokenFormat::Compact, Arc::new(HmacSha256Signer::new(&key)?));
        let forger = TokenCodec::new(TokenFormat::Compact, Arc::new(HmacSha256Signer::new(&other)?));

        let token = codec.encode(&TokenClaims::new("driver-42", "ABC-123", ISSUED))?;
        let forged = forger.encode(&TokenClaims::new("driver-42", "ABC-123", ISSUED))?;
        let unkeyed = compact().encode(&TokenClaims::new("driver-42", "ABC-123", ISSUED))?;

        assert!(codec.verify_integrity(token.as_str()), "own token must verify");
        assert!(!codec.verify_integrity(forged.as_str()), "other key must not verify");
        assert!(!codec.verify_integrity(unkeyed.as_str()), "unkeyed must not verify");
        assert_eq!(codec.algorithm(), SigningAlgorithm::HmacSha256);

        Ok(())
    }

    #[test]
    fn decode_rejects_non_numeric_timestamp_with_valid_hash() {
        let codec = compact();
        let payload = "VAULTPARK|driver-42|soon|ABC-123";
        let token = format!("{payload}|{}", codec.hash(payload));

        assert!(codec.verify_integrity(&token), "hash covers the text as written");
        assert!(codec.validate_format(&token), "format does not parse fields");
        assert_eq!(codec.extract_timestamp(&token), None);
        assert_eq!(codec.extract_field(&token, TokenField::Timestamp), Some("soon"));
        assert_eq!(codec.decode(&token), Err(TokenError::InvalidTimestamp));
    }

    #[test]
    fn verify_applies_expiry_policy() -> TestResult {
        let codec = compact();
        let token = codec.encode(&TokenClaims::new("driver-42", "ABC-123", ISSUED))?;
        let policy = ExpiryPolicy::within(jiff::SignedDuration::from_secs(60));

        assert!(codec.verify(token.as_str(), &policy, ISSUED + 59_000).is_ok(), "fresh");
        assert_eq!(
            codec.verify(token.as_str(), &policy, ISSUED + 61_000),
            Err(TokenError::Expired { age_ms: 61_000 })
        );
        assert!(
            codec
                .verify(token.as_str(), &ExpiryPolicy::unbounded(), ISSUED + 86_400_000)
                .is_ok(),
            "unbounded policy ignores age"
        );

        Ok(())
    }
}
