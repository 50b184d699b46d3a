use super::common::*;
use crate::workflows::create_event::{
    DraftViolation, EventId, EventRepository, EventSubmissionService, RepositoryError,
    ScheduleField, ScheduleViolation, SubmissionError,
};
use std::sync::Arc;

#[test]
fn submit_stores_valid_drafts() {
    let (service, repository) = build_service();

    let record = service.submit(draft()).expect("draft accepted");

    assert!(record.id.0.starts_with("evt-"));
    let stored = repository
        .fetch(&record.id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored.draft.title, "Riverside Jazz Night");
    assert_eq!(stored.draft.schedule, complete_window());
}

#[test]
fn submit_rejects_schedule_violations_without_storing() {
    let (service, repository) = build_service();
    let mut draft = draft();
    draft.schedule.event_start = Some(ts("2025-01-08"));

    match service.submit(draft) {
        Err(SubmissionError::Rejected(report)) => {
            assert!(report.draft.is_empty());
            assert!(matches!(
                report.schedule.get(&ScheduleField::EventStart),
                Some(ScheduleViolation::RangeViolation { .. })
            ));
        }
        other => panic!("expected rejection, got {other:?}"),
    }
    assert!(repository.list().expect("list succeeds").is_empty());
}

#[test]
fn submit_rejects_incomplete_schedules() {
    let (service, _) = build_service();
    let mut draft = draft();
    draft.schedule.sale_end = None;

    let err = service.submit(draft).expect_err("incomplete schedule");

    match err {
        SubmissionError::Rejected(report) => {
            assert_eq!(
                report.schedule.get(&ScheduleField::SaleEnd),
                Some(&ScheduleViolation::Required {
                    field: ScheduleField::SaleEnd
                })
            );
            assert!(matches!(
                report.schedule.get(&ScheduleField::EventStart),
                Some(ScheduleViolation::MissingPrerequisite { .. })
            ));
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[test]
fn draft_rules_cover_title_and_capacity() {
    let (service, _) = build_service();
    let mut draft = draft();
    draft.title = "   ".to_string();
    draft.capacity = Some(MAX_CAPACITY + 1);

    assert_eq!(service.max_capacity(), MAX_CAPACITY);
    let report = service.review(&draft);

    assert_eq!(
        report.draft,
        vec![
            DraftViolation::BlankTitle,
            DraftViolation::CapacityOutOfRange { max: MAX_CAPACITY }
        ]
    );
    assert!(report.schedule.is_empty());
    assert_eq!(report.violation_count(), 2);

    draft.title = "Open mic".to_string();
    draft.capacity = Some(0);
    assert_eq!(service.review(&draft).violation_count(), 1);

    draft.capacity = None;
    assert!(service.review(&draft).is_clean());
}

#[test]
fn get_propagates_not_found() {
    let (service, _) = build_service();

    match service.get(&EventId("evt-unknown".to_string())) {
        Err(SubmissionError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn repository_failures_surface_as_errors() {
    let service = EventSubmissionService::new(Arc::new(UnavailableRepository), MAX_CAPACITY);

    match service.submit(draft()) {
        Err(SubmissionError::Repository(RepositoryError::Unavailable(reason))) => {
            assert_eq!(reason, "database offline");
        }
        other => panic!("expected repository failure, got {other:?}"),
    }
}
