//! In-memory sessions repository.

use async_trait::async_trait;
use jiff::Timestamp;
use rustc_hash::FxHashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::sessions::{
    SessionsRepository,
    data::NewSession,
    errors::SessionsStoreError,
    records::{SessionRecord, SessionToggle},
};

type Sessions = FxHashMap<Uuid, SessionRecord>;

/// Process-local session store.
#[derive(Debug, Default)]
pub struct InMemorySessionsRepository {
    sessions: RwLock<Sessions>,
}

impl InMemorySessionsRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn find_open<'a>(
    sessions: &'a Sessions,
    user_id: &str,
    vehicle_number: &str,
) -> Option<&'a SessionRecord> {
    sessions
        .values()
        .filter(|session| {
            session.is_open()
                && session.user_id == user_id
                && session.vehicle_number == vehicle_number
        })
        .max_by_key(|session| session.entered_at)
}

fn insert_open(
    sessions: &mut Sessions,
    session: NewSession,
) -> Result<SessionRecord, SessionsStoreError> {
    if sessions.contains_key(&session.uuid) {
        return Err(SessionsStoreError::AlreadyExists);
    }

    let record = SessionRecord {
        uuid: session.uuid,
        user_id: session.user_id,
        vehicle_number: session.vehicle_number,
        gate: session.gate,
        lot: session.lot,
        token_timestamp_ms: session.token_timestamp_ms,
        entered_at: session.entered_at,
        exited_at: None,
    };

    sessions.insert(record.uuid, record.clone());

    Ok(record)
}

fn mark_closed(
    sessions: &mut Sessions,
    uuid: Uuid,
    exited_at: Timestamp,
) -> Result<SessionRecord, SessionsStoreError> {
    let session = sessions
        .get_mut(&uuid)
        .ok_or(SessionsStoreError::NotFound(uuid))?;

    if !session.is_open() {
        return Err(SessionsStoreError::AlreadyClosed(uuid));
    }

    session.exited_at = Some(exited_at);

    Ok(session.clone())
}

#[async_trait]
impl SessionsRepository for InMemorySessionsRepository {
    async fn find_open_session(
        &self,
        user_id: &str,
        vehicle_number: &str,
    ) -> Result<Option<SessionRecord>, SessionsStoreError> {
        let sessions = self.sessions.read().await;

        Ok(find_open(&sessions, user_id, vehicle_number).cloned())
    }

    async fn open_session(&self, session: NewSession) -> Result<SessionRecord, SessionsStoreError> {
        let mut sessions = self.sessions.write().await;

        insert_open(&mut sessions, session)
    }

    async fn close_session(
        &self,
        uuid: Uuid,
        exited_at: Timestamp,
    ) -> Result<SessionRecord, SessionsStoreError> {
        let mut sessions = self.sessions.write().await;

        mark_closed(&mut sessions, uuid, exited_at)
    }

    async fn toggle_session(&self, session: NewSession) -> Result<SessionToggle, SessionsStoreError> {
        let mut sessions = self.sessions.write().await;

        let open = find_open(&sessions, &session.user_id, &session.vehicle_number)
            .map(|record| record.uuid);

        match open {
            Some(uuid) => {
                mark_closed(&mut sessions, uuid, session.entered_at).map(SessionToggle::Closed)
            }
            None => insert_open(&mut sessions, session).map(SessionToggle::Opened),
        }
    }

    async fn list_sessions(&self) -> Result<Vec<SessionRecord>, SessionsStoreError> {
        let sessions = self.sessions.read().await;

        let mut records: Vec<SessionRecord> = sessions.values().cloned().collect();

        records.sort_by_key(|session| (session.entered_at, session.uuid));

        Ok(records)
    }
}
