use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use super::domain::{EventScheduleWindow, ScheduleField};
use super::draft::{EventDraft, EventVisibility};
use super::repository::{EventId, EventRepository, RepositoryError};
use super::service::{EventSubmissionService, SubmissionError};
use super::sessions::{ScheduleSessions, SessionError, SessionId};
use super::timestamp::parse_optional_timestamp;
use super::validator::{FieldView, ScheduleValidator};

/// Shared handles behind the create-event routes.
pub struct EventRoutesState<R> {
    pub service: Arc<EventSubmissionService<R>>,
    pub sessions: Arc<ScheduleSessions>,
}

impl<R> Clone for EventRoutesState<R> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            sessions: Arc::clone(&self.sessions),
        }
    }
}

/// Router builder exposing schedule validation, live form sessions and submission.
pub fn event_router<R>(
    service: Arc<EventSubmissionService<R>>,
    sessions: Arc<ScheduleSessions>,
) -> Router
where
    R: EventRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/events",
            post(submit_handler::<R>).get(list_handler::<R>),
        )
        .route("/api/v1/events/:event_id", get(event_handler::<R>))
        .route("/api/v1/events/schedule/validate", post(validate_handler))
        .route(
            "/api/v1/events/schedule/sessions",
            post(open_session_handler::<R>),
        )
        .route(
            "/api/v1/events/schedule/sessions/:session_id",
            get(session_handler::<R>).delete(discard_session_handler::<R>),
        )
        .route(
            "/api/v1/events/schedule/sessions/:session_id/fields/:field",
            put(set_field_handler::<R>),
        )
        .with_state(EventRoutesState { service, sessions })
}

#[derive(Debug, Serialize)]
pub struct ScheduleValidationResponse {
    pub valid: bool,
    pub fields: Vec<FieldView>,
    pub errors: BTreeMap<ScheduleField, String>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: SessionId,
    pub fields: Vec<FieldView>,
}

#[derive(Debug, Deserialize)]
pub struct FieldUpdate {
    #[serde(default)]
    pub value: Option<String>,
}

/// Submission payload. A `session_id` takes the schedule from a live form session,
/// which is discarded once the event is accepted. `session_id` and `schedule` are
/// mutually exclusive.
#[derive(Debug, Deserialize)]
pub struct SubmitEventRequest {
    pub title: String,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub visibility: EventVisibility,
    #[serde(default)]
    pub schedule: Option<EventScheduleWindow>,
    #[serde(default)]
    pub session_id: Option<SessionId>,
}

pub(crate) async fn validate_handler(
    Json(window): Json<EventScheduleWindow>,
) -> Json<ScheduleValidationResponse> {
    let validator = ScheduleValidator::from_window(window);
    let errors: BTreeMap<ScheduleField, String> = validator
        .validate_all()
        .into_iter()
        .map(|(field, violation)| (field, violation.to_string()))
        .collect();

    Json(ScheduleValidationResponse {
        valid: errors.is_empty(),
        fields: validator.view(),
        errors,
    })
}

pub(crate) async fn open_session_handler<R>(State(state): State<EventRoutesState<R>>) -> Response
where
    R: EventRepository + 'static,
{
    match state.sessions.open() {
        Ok((session_id, fields)) => (
            StatusCode::CREATED,
            Json(SessionResponse { session_id, fields }),
        )
            .into_response(),
        Err(err) => session_error_response(err),
    }
}

pub(crate) async fn session_handler<R>(
    State(state): State<EventRoutesState<R>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: EventRepository + 'static,
{
    let session_id = SessionId(session_id);
    match state.sessions.snapshot(&session_id) {
        Ok(fields) => Json(SessionResponse { session_id, fields }).into_response(),
        Err(err) => session_error_response(err),
    }
}

pub(crate) async fn set_field_handler<R>(
    State(state): State<EventRoutesState<R>>,
    Path((session_id, field)): Path<(String, String)>,
    Json(update): Json<FieldUpdate>,
) -> Response
where
    R: EventRepository + 'static,
{
    let field = match field.parse::<ScheduleField>() {
        Ok(field) => field,
        Err(err) => return error_response(StatusCode::BAD_REQUEST, err.to_string()),
    };
    let value = match parse_optional_timestamp(update.value.as_deref()) {
        Ok(value) => value,
        Err(err) => return error_response(StatusCode::BAD_REQUEST, err.to_string()),
    };

    let session_id = SessionId(session_id);
    match state.sessions.set_field(&session_id, field, value) {
        Ok(fields) => Json(SessionResponse { session_id, fields }).into_response(),
        Err(err) => session_error_response(err),
    }
}

pub(crate) async fn discard_session_handler<R>(
    State(state): State<EventRoutesState<R>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: EventRepository + 'static,
{
    match state.sessions.discard(&SessionId(session_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => session_error_response(err),
    }
}

pub(crate) async fn submit_handler<R>(
    State(state): State<EventRoutesState<R>>,
    Json(request): Json<SubmitEventRequest>,
) -> Response
where
    R: EventRepository + 'static,
{
    let SubmitEventRequest {
        title,
        capacity,
        visibility,
        schedule,
        session_id,
    } = request;

    let schedule = match (&session_id, schedule) {
        (Some(_), Some(_)) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "send either session_id or schedule, not both".to_string(),
            )
        }
        (Some(id), None) => match state.sessions.window(id) {
            Ok(window) => window,
            Err(err) => return session_error_response(err),
        },
        (None, schedule) => schedule.unwrap_or_default(),
    };

    let draft = EventDraft {
        title,
        capacity,
        visibility,
        schedule,
    };

    match state.service.submit(draft) {
        Ok(record) => {
            if let Some(id) = session_id {
                if let Err(err) = state.sessions.discard(&id) {
                    warn!(session_id = %id, error = %err, "could not discard submitted session");
                }
            }
            (StatusCode::CREATED, Json(record)).into_response()
        }
        Err(SubmissionError::Rejected(report)) => {
            let payload = json!({
                "error": "event draft rejected",
                "messages": report.messages(),
                "violations": report,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        Err(SubmissionError::Repository(RepositoryError::Conflict)) => {
            error_response(StatusCode::CONFLICT, "event already exists".to_string())
        }
        Err(other) => error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}

pub(crate) async fn event_handler<R>(
    State(state): State<EventRoutesState<R>>,
    Path(event_id): Path<String>,
) -> Response
where
    R: EventRepository + 'static,
{
    match state.service.get(&EventId(event_id)) {
        Ok(record) => Json(record).into_response(),
        Err(SubmissionError::Repository(RepositoryError::NotFound)) => {
            error_response(StatusCode::NOT_FOUND, "event not found".to_string())
        }
        Err(other) => error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}

pub(crate) async fn list_handler<R>(State(state): State<EventRoutesState<R>>) -> Response
where
    R: EventRepository + 'static,
{
    match state.service.list() {
        Ok(records) => Json(json!({ "events": records })).into_response(),
        Err(other) => error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}

fn session_error_response(err: SessionError) -> Response {
    let status = match err {
        SessionError::NotFound(_) => StatusCode::NOT_FOUND,
        SessionError::Poisoned => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, err.to_string())
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
