use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::create_event::{
    event_router, parse_timestamp, EventDraft, EventId, EventRecord, EventRepository,
    EventScheduleWindow, EventSubmissionService, EventVisibility, RepositoryError,
    ScheduleSessions, Timestamp,
};

pub(super) const MAX_CAPACITY: u32 = 500;

pub(super) fn ts(raw: &str) -> Timestamp {
    parse_timestamp(raw).expect("valid test timestamp")
}

/// Lifecycle spans January 2025; sales run 5th-10th, the event 12th-14th.
pub(super) fn complete_window() -> EventScheduleWindow {
    EventScheduleWindow {
        lifecycle_start: Some(ts("2025-01-01")),
        lifecycle_end: Some(ts("2025-01-31")),
        sale_start: Some(ts("2025-01-05")),
        sale_end: Some(ts("2025-01-10")),
        event_start: Some(ts("2025-01-12T18:00:00Z")),
        event_end: Some(ts("2025-01-14T23:00:00Z")),
    }
}

pub(super) fn draft() -> EventDraft {
    EventDraft {
        title: "Riverside Jazz Night".to_string(),
        capacity: Some(250),
        visibility: EventVisibility::Public,
        schedule: complete_window(),
    }
}

pub(super) fn build_service() -> (EventSubmissionService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = EventSubmissionService::new(repository.clone(), MAX_CAPACITY);
    (service, repository)
}

pub(super) fn router_with_service<R>(service: EventSubmissionService<R>) -> axum::Router
where
    R: EventRepository + 'static,
{
    event_router(Arc::new(service), Arc::new(ScheduleSessions::new()))
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<EventId, EventRecord>>>,
}

impl EventRepository for MemoryRepository {
    fn insert(&self, record: EventRecord) -> Result<EventRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &EventId) -> Result<Option<EventRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<EventRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

pub(super) struct ConflictRepository;

impl EventRepository for ConflictRepository {
    fn insert(&self, _record: EventRecord) -> Result<EventRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn fetch(&self, _id: &EventId) -> Result<Option<EventRecord>, RepositoryError> {
        Ok(None)
    }

    fn list(&self) -> Result<Vec<EventRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl EventRepository for UnavailableRepository {
    fn insert(&self, _record: EventRecord) -> Result<EventRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &EventId) -> Result<Option<EventRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<EventRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
