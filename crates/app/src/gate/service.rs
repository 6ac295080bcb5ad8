//! Gate Service

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::{Span, info, warn};
use uuid::Uuid;
use vaultpark::{clock::Clock, codec::TokenCodec, expiry::ExpiryPolicy};

use crate::{
    domain::sessions::{SessionsRepository, data::NewSession, records::SessionToggle},
    gate::{DEFAULT_REPLAY_CAPACITY, Direction, ReplayGuard, ScanError, ScanOutcome},
};

/// Scans tokens presented at a gate and opens or closes sessions.
pub struct TokenGateService {
    codec: TokenCodec,
    policy: ExpiryPolicy,
    gate_id: Option<String>,
    clock: Arc<dyn Clock>,
    replay: ReplayGuard,
    sessions: Arc<dyn SessionsRepository>,
}

impl TokenGateService {
    /// Service verifying tokens with `codec` and `policy` against `clock`.
    #[must_use]
    pub fn new(
        codec: TokenCodec,
        policy: ExpiryPolicy,
        clock: Arc<dyn Clock>,
        sessions: Arc<dyn SessionsRepository>,
    ) -> Self {
        Self {
            codec,
            policy,
            gate_id: None,
            clock,
            replay: ReplayGuard::for_policy(&policy, DEFAULT_REPLAY_CAPACITY),
            sessions,
        }
    }

    /// Only accept tokens without a gate hint or with a hint naming `gate_id`.
    #[must_use]
    pub fn with_gate_id(mut self, gate_id: impl Into<String>) -> Self {
        self.gate_id = Some(gate_id.into());
        self
    }

    /// Replace the replay guard.
    #[must_use]
    pub fn with_replay_guard(mut self, replay: ReplayGuard) -> Self {
        self.replay = replay;
        self
    }

    fn now(&self) -> Result<(i64, Timestamp), ScanError> {
        let now_ms = self.clock.now_millis();
        let now = Timestamp::from_millisecond(now_ms).map_err(ScanError::Clock)?;

        Ok((now_ms, now))
    }

    async fn apply(&self, token: &str) -> Result<ScanOutcome, ScanError> {
        let (now_ms, now) = self.now()?;

        let raw = self.codec.check_integrity(token)?;
        let claims = raw.to_claims()?;

        self.policy.check(claims.timestamp_ms, now_ms)?;

        let span = Span::current();

        span.record("user_id", tracing::field::display(&claims.user_id));
        span.record(
            "vehicle_number",
            tracing::field::display(&claims.vehicle_number),
        );

        if let (Some(expected), Some(found)) = (self.gate_id.as_deref(), claims.gate.as_deref())
            && expected != found
        {
            return Err(ScanError::WrongGate {
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }

        if !self.replay.consume(raw.hash, claims.timestamp_ms, now_ms) {
            return Err(ScanError::Replayed);
        }

        let toggled = self
            .sessions
            .toggle_session(NewSession {
                uuid: Uuid::now_v7(),
                user_id: claims.user_id,
                vehicle_number: claims.vehicle_number,
                gate: claims.gate,
                lot: claims.lot,
                token_timestamp_ms: claims.timestamp_ms,
                entered_at: now,
            })
            .await;

        // A token only counts as used once the store has recorded the scan.
        let outcome = match toggled {
            Ok(SessionToggle::Opened(session)) => ScanOutcome {
                direction: Direction::Entry,
                session,
            },
            Ok(SessionToggle::Closed(session)) => ScanOutcome {
                direction: Direction::Exit,
                session,
            },
            Err(error) => {
                self.replay.release(raw.hash);

                return Err(error.into());
            }
        };

        span.record("direction", tracing::field::display(outcome.direction));

        Ok(outcome)
    }
}

impl fmt::Debug for TokenGateService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenGateService")
            .field("codec", &self.codec)
            .field("policy", &self.policy)
            .field("gate_id", &self.gate_id)
            .field("replay", &self.replay)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl GateService for TokenGateService {
    #[tracing::instrument(
        name = "gate.service.scan",
        skip(self, token),
        fields(
            user_id = tracing::field::Empty,
            vehicle_number = tracing::field::Empty,
            direction = tracing::field::Empty
        )
    )]
    async fn scan(&self, token: &str) -> Result<ScanOutcome, ScanError> {
        match self.apply(token).await {
            Ok(outcome) => {
                info!(
                    session_uuid = %outcome.session.uuid,
                    direction = %outcome.direction,
                    "scan accepted"
                );

                Ok(outcome)
            }
            Err(error) => {
                warn!(reason = error.reason(), "scan rejected: {error}");

                Err(error)
            }
        }
    }
}

#[automock]
#[async_trait]
/// Gate scan operations.
pub trait GateService: Send + Sync {
    /// Verify `token` and record the resulting entry or exit.
    async fn scan(&self, token: &str) -> Result<ScanOutcome, ScanError>;
}
