//! Static shape of the schedule: which fields gate which, which fields anchor
//! another field's bounds, and which fields a change re-validates.

use super::domain::ScheduleField::{self, *};
use super::domain::ScheduleWindowKind;

/// Direct re-validation edges. Every edge points forward in `ScheduleField::ordered()`.
const TRIGGERS: [(ScheduleField, &[ScheduleField]); 5] = [
    (LifecycleStart, &[LifecycleEnd, SaleStart]),
    (LifecycleEnd, &[SaleStart, SaleEnd, EventStart, EventEnd]),
    (SaleStart, &[SaleEnd, EventStart]),
    (SaleEnd, &[EventStart, EventEnd]),
    (EventStart, &[EventEnd]),
];

pub(crate) fn triggered_by(field: ScheduleField) -> &'static [ScheduleField] {
    TRIGGERS
        .iter()
        .find(|(source, _)| *source == field)
        .map(|(_, targets)| *targets)
        .unwrap_or(&[])
}

/// Fields to re-validate after `changed` was written: the field itself plus its
/// transitive dependents, in topological order.
pub(crate) fn cascade(changed: ScheduleField) -> Vec<ScheduleField> {
    let mut reached = [false; 6];
    reached[changed.index()] = true;
    let mut pending = vec![changed];

    while let Some(field) = pending.pop() {
        for next in triggered_by(field) {
            if !reached[next.index()] {
                reached[next.index()] = true;
                pending.push(*next);
            }
        }
    }

    ScheduleField::ordered()
        .into_iter()
        .filter(|field| reached[field.index()])
        .collect()
}

/// Windows that must be complete before `field` becomes editable, upstream first.
pub(crate) fn upstream_windows(field: ScheduleField) -> impl Iterator<Item = ScheduleWindowKind> {
    let own = field.window();
    ScheduleWindowKind::ordered()
        .into_iter()
        .take_while(move |window| *window != own)
}

/// Neighbouring fields a value is compared against.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Anchors {
    /// Start of the same window; the end must be strictly after it.
    pub own_start: Option<ScheduleField>,
    /// Candidates for the inclusive lower bound, nearest first.
    pub min: &'static [ScheduleField],
    /// Inclusive upper bound.
    pub max: Option<ScheduleField>,
}

pub(crate) const fn anchors(field: ScheduleField) -> Anchors {
    match field {
        LifecycleStart => Anchors {
            own_start: None,
            min: &[],
            max: None,
        },
        LifecycleEnd => Anchors {
            own_start: Some(LifecycleStart),
            min: &[LifecycleStart],
            max: None,
        },
        SaleStart => Anchors {
            own_start: None,
            min: &[LifecycleStart],
            max: Some(LifecycleEnd),
        },
        SaleEnd => Anchors {
            own_start: Some(SaleStart),
            min: &[SaleStart, LifecycleStart],
            max: Some(LifecycleEnd),
        },
        EventStart => Anchors {
            own_start: None,
            min: &[SaleEnd, SaleStart, LifecycleStart],
            max: Some(LifecycleEnd),
        },
        EventEnd => Anchors {
            own_start: Some(EventStart),
            min: &[EventStart, SaleEnd, SaleStart, LifecycleStart],
            max: Some(LifecycleEnd),
        },
    }
}
