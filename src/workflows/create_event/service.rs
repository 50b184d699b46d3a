use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::draft::{DraftReport, EventDraft};
use super::repository::{EventId, EventRecord, EventRepository, RepositoryError};

/// Runs the submit-time checks and hands accepted drafts to the repository.
pub struct EventSubmissionService<R> {
    repository: Arc<R>,
    max_capacity: u32,
}

static EVENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_event_id() -> EventId {
    let id = EVENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    EventId(format!("evt-{id:06}"))
}

impl<R> EventSubmissionService<R>
where
    R: EventRepository + 'static,
{
    pub fn new(repository: Arc<R>, max_capacity: u32) -> Self {
        Self {
            repository,
            max_capacity,
        }
    }

    pub fn max_capacity(&self) -> u32 {
        self.max_capacity
    }

    /// Check a draft without storing it.
    pub fn review(&self, draft: &EventDraft) -> DraftReport {
        draft.validate(self.max_capacity)
    }

    /// Validate and store a draft. Any violation rejects the whole draft.
    pub fn submit(&self, draft: EventDraft) -> Result<EventRecord, SubmissionError> {
        let report = self.review(&draft);
        if !report.is_clean() {
            warn!(
                title = %draft.title,
                violations = report.violation_count(),
                "event draft rejected"
            );
            return Err(SubmissionError::Rejected(report));
        }

        let record = EventRecord {
            id: next_event_id(),
            draft,
            submitted_at: Utc::now(),
        };

        let stored = self.repository.insert(record)?;
        info!(event_id = %stored.id, title = %stored.draft.title, "event accepted");
        Ok(stored)
    }

    pub fn get(&self, id: &EventId) -> Result<EventRecord, SubmissionError> {
        let record = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn list(&self) -> Result<Vec<EventRecord>, SubmissionError> {
        Ok(self.repository.list()?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("event draft rejected: {0}")]
    Rejected(DraftReport),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
