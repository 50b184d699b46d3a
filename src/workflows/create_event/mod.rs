//! Schedule step of the create-event wizard.
//!
//! An event carries three chained windows: its administrative lifecycle, the ticket
//! sale, and the event itself. The sale and the event must sit inside the lifecycle,
//! the event may not start before the sale closes, and a window only becomes
//! editable once every window upstream of it has both bounds. [`ScheduleValidator`]
//! keeps those rules live while fields are entered one at a time; the remaining
//! modules wrap it for drafts, submission, form sessions, CSV import and HTTP.

mod dependency;
pub mod domain;
pub mod draft;
pub mod import;
pub mod repository;
pub mod router;
pub mod service;
pub mod sessions;
pub mod timestamp;
mod validator;

#[cfg(test)]
mod tests;

pub use domain::{EventScheduleWindow, ScheduleField, ScheduleWindowKind, UnknownFieldError};
pub use draft::{DraftReport, DraftViolation, EventDraft, EventVisibility};
pub use import::{ScheduleImportError, ScheduleImporter};
pub use repository::{EventId, EventRecord, EventRepository, RepositoryError};
pub use router::event_router;
pub use service::{EventSubmissionService, SubmissionError};
pub use sessions::{ScheduleSessions, SessionError, SessionId};
pub use timestamp::{parse_optional_timestamp, parse_timestamp, Timestamp, TimestampError};
pub use validator::{BoundSide, FieldBounds, FieldView, ScheduleValidator, ScheduleViolation};
