//! Single-use enforcement for scanned tokens.

use std::sync::{Mutex, PoisonError};

use jiff::SignedDuration;
use rustc_hash::FxHashMap;
use vaultpark::expiry::ExpiryPolicy;

/// Default number of consumed tokens remembered.
pub const DEFAULT_REPLAY_CAPACITY: usize = 4_096;

/// Remembers consumed token hashes.
///
/// Entries are kept for `retention` after the token timestamp, and the oldest
/// entry is evicted once `capacity` is reached.
#[derive(Debug)]
pub struct ReplayGuard {
    retention_ms: Option<i64>,
    capacity: usize,
    seen: Mutex<FxHashMap<String, i64>>,
}

impl ReplayGuard {
    /// Guard remembering up to `capacity` tokens for `retention`.
    #[must_use]
    pub fn new(retention: Option<SignedDuration>, capacity: usize) -> Self {
        Self {
            retention_ms: retention
                .map(|retention| i64::try_from(retention.as_millis()).unwrap_or(i64::MAX)),
            capacity: capacity.max(1),
            seen: Mutex::new(FxHashMap::default()),
        }
    }

    /// Guard retaining tokens for as long as `policy` could still accept them.
    #[must_use]
    pub fn for_policy(policy: &ExpiryPolicy, capacity: usize) -> Self {
        let retention = policy
            .max_age()
            .map(|max_age| max_age.saturating_add(policy.max_clock_skew()));

        Self::new(retention, capacity)
    }

    /// Record `hash` as consumed.
    ///
    /// Returns `false` if it was already consumed.
    pub fn consume(&self, hash: &str, issued_ms: i64, now_ms: i64) -> bool {
        let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);

        if seen.contains_key(hash) {
            return false;
        }

        if let Some(retention_ms) = self.retention_ms {
            seen.retain(|_, issued| now_ms.saturating_sub(*issued) <= retention_ms);
        }

        if seen.len() >= self.capacity {
            let oldest = seen
                .iter()
                .min_by_key(|(_, issued)| **issued)
                .map(|(hash, _)| hash.clone());

            if let Some(oldest) = oldest {
                seen.remove(&oldest);
            }
        }

        seen.insert(hash.to_string(), issued_ms);

        true
    }

    /// Forget `hash` so the token can be scanned again.
    pub fn release(&self, hash: &str) {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(hash);
    }

    /// Number of remembered tokens.
    pub fn len(&self) -> usize {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing is remembered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ReplayGuard {
    fn default() -> Self {
        Self::new(None, DEFAULT_REPLAY_CAPACITY)
    }
}
