//! App Context

use std::sync::Arc;

use vaultpark::{
    clock::{Clock, SystemClock},
    codec::TokenCodec,
    expiry::ExpiryPolicy,
};

use crate::{
    config::{ConfigError, ScanConfig, TokenConfig},
    domain::sessions::{InMemorySessionsRepository, SessionsRepository},
    gate::{GateService, ReplayGuard, TokenGateService},
};

/// Runtime components shared by commands.
#[derive(Clone)]
pub struct AppContext {
    pub codec: TokenCodec,
    pub policy: ExpiryPolicy,
    pub clock: Arc<dyn Clock>,
    pub sessions: Arc<dyn SessionsRepository>,
    pub gate: Arc<dyn GateService>,
}

impl AppContext {
    /// Build application context from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured signing key is invalid.
    pub fn from_config(token: &TokenConfig, scan: &ScanConfig) -> Result<Self, ConfigError> {
        Self::with_clock(token, scan, Arc::new(SystemClock))
    }

    /// Build application context reading time from `clock`.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured signing key is invalid.
    pub fn with_clock(
        token: &TokenConfig,
        scan: &ScanConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        let codec = token.codec()?;
        let policy = token.expiry_policy();
        let sessions: Arc<dyn SessionsRepository> = Arc::new(InMemorySessionsRepository::new());

        let mut gate = TokenGateService::new(
            codec.clone(),
            policy,
            Arc::clone(&clock),
            Arc::clone(&sessions),
        )
        .with_replay_guard(ReplayGuard::for_policy(&policy, scan.replay_capacity));

        if let Some(gate_id) = scan.gate_id.as_deref() {
            gate = gate.with_gate_id(gate_id);
        }

        Ok(Self {
            codec,
            policy,
            clock,
            sessions,
            gate: Arc::new(gate),
        })
    }

    /// Current time in Unix milliseconds.
    #[must_use]
    pub fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }
}
