use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{EventScheduleWindow, ScheduleField};
use super::timestamp::Timestamp;
use super::validator::{FieldView, ScheduleValidator};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("sched-{id:06}"))
}

/// One live schedule form per session. Each validator is only ever driven by a
/// single synchronous call while the lock is held.
#[derive(Debug, Default)]
pub struct ScheduleSessions {
    sessions: Mutex<HashMap<SessionId, ScheduleValidator>>,
}

impl ScheduleSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self) -> Result<(SessionId, Vec<FieldView>), SessionError> {
        let id = next_session_id();
        let validator = ScheduleValidator::new();
        let view = validator.view();
        self.lock()?.insert(id.clone(), validator);
        debug!(session_id = %id, "schedule session opened");
        Ok((id, view))
    }

    pub fn set_field(
        &self,
        id: &SessionId,
        field: ScheduleField,
        value: Option<Timestamp>,
    ) -> Result<Vec<FieldView>, SessionError> {
        let mut sessions = self.lock()?;
        let validator = sessions
            .get_mut(id)
            .ok_or_else(|| SessionError::NotFound(id.clone()))?;
        validator.set_field(field, value);
        Ok(validator.view())
    }

    pub fn snapshot(&self, id: &SessionId) -> Result<Vec<FieldView>, SessionError> {
        self.with_validator(id, ScheduleValidator::view)
    }

    pub fn window(&self, id: &SessionId) -> Result<EventScheduleWindow, SessionError> {
        self.with_validator(id, |validator| *validator.window())
    }

    pub fn discard(&self, id: &SessionId) -> Result<(), SessionError> {
        if self.lock()?.remove(id).is_none() {
            return Err(SessionError::NotFound(id.clone()));
        }
        debug!(session_id = %id, "schedule session discarded");
        Ok(())
    }

    fn with_validator<T>(
        &self,
        id: &SessionId,
        read: impl FnOnce(&ScheduleValidator) -> T,
    ) -> Result<T, SessionError> {
        let sessions = self.lock()?;
        sessions
            .get(id)
            .map(read)
            .ok_or_else(|| SessionError::NotFound(id.clone()))
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<SessionId, ScheduleValidator>>, SessionError> {
        self.sessions.lock().map_err(|_| SessionError::Poisoned)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("schedule session {0} not found")]
    NotFound(SessionId),
    #[error("schedule session store is unavailable")]
    Poisoned,
}
