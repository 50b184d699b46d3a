use event_schedule::workflows::create_event::{
    parse_timestamp, EventId, EventRecord, EventRepository, RepositoryError, Timestamp,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryEventRepository {
    records: Arc<Mutex<HashMap<EventId, EventRecord>>>,
}

impl InMemoryEventRepository {
    fn records(&self) -> Result<MutexGuard<'_, HashMap<EventId, EventRecord>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("event store lock poisoned".to_string()))
    }
}

impl EventRepository for InMemoryEventRepository {
    fn insert(&self, record: EventRecord) -> Result<EventRecord, RepositoryError> {
        let mut guard = self.records()?;
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &EventId) -> Result<Option<EventRecord>, RepositoryError> {
        Ok(self.records()?.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<EventRecord>, RepositoryError> {
        let mut records: Vec<EventRecord> = self.records()?.values().cloned().collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(records)
    }
}

/// Clap value parser for timestamp flags.
pub(crate) fn parse_timestamp_arg(raw: &str) -> Result<Timestamp, String> {
    parse_timestamp(raw).map_err(|err| err.to_string())
}
