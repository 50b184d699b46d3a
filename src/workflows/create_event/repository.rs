use serde::{Deserialize, Serialize};
use std::fmt;

use super::draft::EventDraft;
use super::timestamp::Timestamp;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub String);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An accepted event as persisted by the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: EventId,
    pub draft: EventDraft,
    pub submitted_at: Timestamp,
}

/// Storage abstraction so the submission service can be exercised in isolation.
pub trait EventRepository: Send + Sync {
    fn insert(&self, record: EventRecord) -> Result<EventRecord, RepositoryError>;
    fn fetch(&self, id: &EventId) -> Result<Option<EventRecord>, RepositoryError>;
    fn list(&self) -> Result<Vec<EventRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
