use super::common::*;
use crate::workflows::create_event::{
    ScheduleField, ScheduleSessions, ScheduleViolation, SessionError, SessionId,
};

#[test]
fn open_returns_an_empty_form() {
    let sessions = ScheduleSessions::new();

    let (id, fields) = sessions.open().expect("session opens");

    assert!(id.0.starts_with("sched-"));
    assert_eq!(fields.len(), 6);
    assert!(fields.iter().all(|view| view.value.is_none()));
    assert_eq!(sessions.snapshot(&id).expect("session stored"), fields);
}

#[test]
fn set_field_drives_the_session_validator() {
    let sessions = ScheduleSessions::new();
    let (id, _) = sessions.open().expect("session opens");

    sessions
        .set_field(&id, ScheduleField::LifecycleStart, Some(ts("2025-01-01")))
        .expect("update applies");
    let fields = sessions
        .set_field(&id, ScheduleField::LifecycleEnd, Some(ts("2025-01-31")))
        .expect("update applies");

    let sale_start = fields
        .iter()
        .find(|view| view.field == ScheduleField::SaleStart)
        .expect("sale start present");
    assert!(!sale_start.disabled);
    assert_eq!(sale_start.min, Some(ts("2025-01-01")));

    let fields = sessions
        .set_field(&id, ScheduleField::SaleStart, Some(ts("2025-02-01")))
        .expect("update applies");
    let sale_start = fields
        .iter()
        .find(|view| view.field == ScheduleField::SaleStart)
        .expect("sale start present");
    assert!(matches!(
        sale_start.violation,
        Some(ScheduleViolation::RangeViolation { .. })
    ));

    let window = sessions.window(&id).expect("window readable");
    assert_eq!(window.sale_start, Some(ts("2025-02-01")));
}

#[test]
fn sessions_are_isolated() {
    let sessions = ScheduleSessions::new();
    let (first, _) = sessions.open().expect("session opens");
    let (second, _) = sessions.open().expect("session opens");
    assert_ne!(first, second);

    sessions
        .set_field(&first, ScheduleField::LifecycleStart, Some(ts("2025-01-01")))
        .expect("update applies");

    let untouched = sessions.snapshot(&second).expect("snapshot");
    assert!(untouched.iter().all(|view| view.value.is_none()));
}

#[test]
fn discard_removes_the_session() {
    let sessions = ScheduleSessions::new();
    let (id, _) = sessions.open().expect("session opens");

    sessions.discard(&id).expect("discard succeeds");

    assert!(matches!(
        sessions.snapshot(&id),
        Err(SessionError::NotFound(_))
    ));
    assert!(matches!(
        sessions.discard(&id),
        Err(SessionError::NotFound(_))
    ));
}

#[test]
fn unknown_session_is_not_found() {
    let sessions = ScheduleSessions::new();
    let missing = SessionId("sched-missing".to_string());

    let err = sessions
        .set_field(&missing, ScheduleField::LifecycleStart, None)
        .expect_err("unknown session");

    assert!(err.to_string().contains("sched-missing"));
}
