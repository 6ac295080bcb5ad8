//! vaultpark
//!
//! Signed QR session tokens linking a driver and vehicle to a parking gate scan.
//! The driver's device encodes a token, the guard's device verifies it before a
//! parking session is opened or closed.

pub mod clock;
pub mod codec;
pub mod error;
pub mod expiry;
pub mod format;
pub mod prelude;
pub mod signing;
pub mod token;
