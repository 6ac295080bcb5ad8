//! Token freshness window.

use jiff::SignedDuration;

use crate::error::TokenError;

/// Default allowance for clocks running ahead of the scanner.
pub const DEFAULT_MAX_CLOCK_SKEW: SignedDuration = SignedDuration::from_secs(30);

/// Accepted age range for a token timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryPolicy {
    max_age: Option<SignedDuration>,
    max_clock_skew: SignedDuration,
}

impl ExpiryPolicy {
    /// Accept tokens of any age.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            max_age: None,
            max_clock_skew: DEFAULT_MAX_CLOCK_SKEW,
        }
    }

    /// Accept tokens no older than `max_age`.
    #[must_use]
    pub const fn within(max_age: SignedDuration) -> Self {
        Self {
            max_age: Some(max_age),
            max_clock_skew: DEFAULT_MAX_CLOCK_SKEW,
        }
    }

    /// Override how far in the future a timestamp may be.
    ///
    /// Negative values are treated as zero.
    #[must_use]
    pub fn with_max_clock_skew(mut self, max_clock_skew: SignedDuration) -> Self {
        self.max_clock_skew = max_clock_skew.max(SignedDuration::ZERO);
        self
    }

    /// Maximum accepted age, if bounded.
    #[must_use]
    pub const fn max_age(&self) -> Option<SignedDuration> {
        self.max_age
    }

    /// Accepted clock skew.
    #[must_use]
    pub const fn max_clock_skew(&self) -> SignedDuration {
        self.max_clock_skew
    }

    /// Check a token issued at `issued_ms` against `now_ms`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::IssuedInFuture`] when the token is ahead of `now_ms`
    /// by more than the skew allowance, or [`TokenError::Expired`] when it is older
    /// than the maximum age.
    pub fn check(&self, issued_ms: i64, now_ms: i64) -> Result<(), TokenError> {
        let age_ms = now_ms.saturating_sub(issued_ms);
        let age = SignedDuration::from_millis(age_ms);

        if age < -self.max_clock_skew {
            return Err(TokenError::IssuedInFuture {
                ahead_ms: age_ms.saturating_neg(),
            });
        }

        if let Some(max_age) = self.max_age
            && age > max_age
        {
            return Err(TokenError::Expired { age_ms });
        }

        Ok(())
    }
}

impl Default for ExpiryPolicy {
    fn default() -> Self {
        Self::unbounded()
    }
}
