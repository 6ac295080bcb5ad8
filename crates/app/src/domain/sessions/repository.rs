//! Sessions Repository

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use uuid::Uuid;

use crate::domain::sessions::{
    data::NewSession,
    errors::SessionsStoreError,
    records::{SessionRecord, SessionToggle},
};

#[automock]
#[async_trait]
/// Parking session persistence.
///
/// Production deployments back this with the hosted document store; the
/// in-memory implementation serves the CLI and tests.
pub trait SessionsRepository: Send + Sync {
    /// Open session for a driver and vehicle, if any.
    async fn find_open_session(
        &self,
        user_id: &str,
        vehicle_number: &str,
    ) -> Result<Option<SessionRecord>, SessionsStoreError>;

    /// Persist a new open session.
    async fn open_session(&self, session: NewSession) -> Result<SessionRecord, SessionsStoreError>;

    /// Mark a session as exited.
    async fn close_session(
        &self,
        uuid: Uuid,
        exited_at: Timestamp,
    ) -> Result<SessionRecord, SessionsStoreError>;

    /// Close the open session for the driver and vehicle of `session`, or open
    /// `session` if there is none, as one atomic step.
    ///
    /// A closed session is stamped with `session.entered_at` as its exit time.
    async fn toggle_session(&self, session: NewSession) -> Result<SessionToggle, SessionsStoreError>;

    /// All sessions, oldest entry first.
    async fn list_sessions(&self) -> Result<Vec<SessionRecord>, SessionsStoreError>;
}
