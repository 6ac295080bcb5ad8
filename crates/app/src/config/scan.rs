//! Scan Config

use clap::Args;

use crate::gate::DEFAULT_REPLAY_CAPACITY;

/// Gate scanner settings.
#[derive(Debug, Args)]
pub struct ScanConfig {
    /// Gate served by this scanner; tokens hinting another gate are rejected
    #[arg(long, env = "VAULTPARK_GATE_ID")]
    pub gate_id: Option<String>,

    /// Number of consumed tokens remembered for replay detection
    #[arg(long, env = "VAULTPARK_REPLAY_CAPACITY", default_value_t = DEFAULT_REPLAY_CAPACITY)]
    pub replay_capacity: usize,
}
