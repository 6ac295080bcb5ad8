//! Gate-side application modules for vaultpark tokens.

pub mod config;
pub mod context;
pub mod domain;
pub mod gate;
pub mod observability;
