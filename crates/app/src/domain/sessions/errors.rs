//! Session store errors.

use thiserror::Error;
use uuid::Uuid;

/// Session store error variants.
#[derive(Debug, Error)]
pub enum SessionsStoreError {
    /// A session with the same UUID already exists.
    #[error("session already exists")]
    AlreadyExists,

    /// The session was not found.
    #[error("session {0} not found")]
    NotFound(Uuid),

    /// The session has already been closed.
    #[error("session {0} is already closed")]
    AlreadyClosed(Uuid),

    /// The backing store could not complete the request.
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}
