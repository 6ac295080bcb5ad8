//! Parking sessions

pub mod data;
pub mod errors;
mod memory;
pub mod records;
mod repository;

pub use errors::SessionsStoreError;
pub use memory::InMemorySessionsRepository;
pub use repository::*;
