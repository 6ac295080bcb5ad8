//! Gate scanning

mod errors;
mod models;
mod replay;
mod service;

pub use errors::ScanError;
pub use models::*;
pub use replay::{DEFAULT_REPLAY_CAPACITY, ReplayGuard};
pub use service::*;
