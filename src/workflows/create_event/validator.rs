use super::dependency::{anchors, cascade, upstream_windows};
use super::domain::{EventScheduleWindow, ScheduleField};
use super::timestamp::Timestamp;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Which side of a field's allowed range a value fell outside of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundSide {
    Min,
    Max,
}

impl BoundSide {
    const fn phrase(self) -> &'static str {
        match self {
            Self::Min => "on or after",
            Self::Max => "on or before",
        }
    }
}

/// Schedule invariant violations. They are attached to a field and never raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleViolation {
    #[error("{field} cannot be set until {missing} is set")]
    MissingPrerequisite {
        field: ScheduleField,
        missing: ScheduleField,
    },
    #[error("{field} must be after {start}")]
    OrderViolation {
        field: ScheduleField,
        start: ScheduleField,
    },
    #[error("{field} must be {} {anchor} ({limit})", .side.phrase())]
    RangeViolation {
        field: ScheduleField,
        side: BoundSide,
        anchor: ScheduleField,
        limit: Timestamp,
    },
    #[error("{field} is required")]
    Required { field: ScheduleField },
}

/// Inclusive range a field's value may take given the anchors set so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FieldBounds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<Timestamp>,
}

/// Per-field view-model handed to the form layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldView {
    pub field: ScheduleField,
    pub label: &'static str,
    pub value: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<Timestamp>,
    pub disabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    pub violation: Option<ScheduleViolation>,
}

/// Live state of one schedule form: the entered values plus the error each field
/// carried after its last re-validation.
///
/// Writes go through [`ScheduleValidator::set_field`], which re-validates the written
/// field and everything downstream of it. Fields outside that cascade keep their
/// previous error; [`ScheduleValidator::validate_all`] is the authoritative check.
#[derive(Debug, Clone, Default)]
pub struct ScheduleValidator {
    window: EventScheduleWindow,
    errors: BTreeMap<ScheduleField, ScheduleViolation>,
}

impl ScheduleValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a validator from a snapshot and runs a full live pass over it.
    pub fn from_window(window: EventScheduleWindow) -> Self {
        let mut validator = Self {
            window,
            errors: BTreeMap::new(),
        };
        for field in ScheduleField::ordered() {
            validator.revalidate(field);
        }
        validator
    }

    pub fn window(&self) -> &EventScheduleWindow {
        &self.window
    }

    pub fn value(&self, field: ScheduleField) -> Option<Timestamp> {
        self.window.get(field)
    }

    /// Writes (or clears) a field and returns the fields that were re-validated.
    pub fn set_field(
        &mut self,
        field: ScheduleField,
        value: Option<Timestamp>,
    ) -> Vec<ScheduleField> {
        self.window.set(field, value);

        let affected = cascade(field);
        for target in &affected {
            self.revalidate(*target);
        }

        debug!(
            field = field.key(),
            cleared = value.is_none(),
            revalidated = affected.len(),
            errors = self.errors.len(),
            "schedule field updated"
        );

        affected
    }

    pub fn is_field_enabled(&self, field: ScheduleField) -> bool {
        self.missing_prerequisite(field).is_none()
    }

    /// First empty bound of the first incomplete upstream window.
    pub fn missing_prerequisite(&self, field: ScheduleField) -> Option<ScheduleField> {
        let window = upstream_windows(field)
            .find(|window| !self.window.is_window_complete(*window))?;
        let (start, end) = window.bounds();
        [start, end]
            .into_iter()
            .find(|bound| !self.window.is_set(*bound))
    }

    pub fn compute_bounds(&self, field: ScheduleField) -> FieldBounds {
        let anchors = anchors(field);
        FieldBounds {
            min: self.nearest_set(anchors.min).map(|(_, value)| value),
            max: anchors.max.and_then(|anchor| self.window.get(anchor)),
        }
    }

    pub fn error(&self, field: ScheduleField) -> Option<&ScheduleViolation> {
        self.errors.get(&field)
    }

    pub fn errors(&self) -> &BTreeMap<ScheduleField, ScheduleViolation> {
        &self.errors
    }

    pub fn field_view(&self, field: ScheduleField) -> FieldView {
        let bounds = self.compute_bounds(field);
        let violation = self.errors.get(&field).cloned();
        FieldView {
            field,
            label: field.label(),
            value: self.window.get(field),
            min: bounds.min,
            max: bounds.max,
            disabled: !self.is_field_enabled(field),
            error: violation.as_ref().map(ToString::to_string),
            violation,
        }
    }

    pub fn view(&self) -> Vec<FieldView> {
        ScheduleField::ordered()
            .into_iter()
            .map(|field| self.field_view(field))
            .collect()
    }

    /// Submit-time check of every field, independent of the live error state.
    /// An empty map means the schedule is submittable.
    pub fn validate_all(&self) -> BTreeMap<ScheduleField, ScheduleViolation> {
        ScheduleField::ordered()
            .into_iter()
            .filter_map(|field| {
                let violation = match self.window.get(field) {
                    Some(value) => self.check(field, value),
                    None => Some(match self.missing_prerequisite(field) {
                        Some(missing) => ScheduleViolation::MissingPrerequisite { field, missing },
                        None => ScheduleViolation::Required { field },
                    }),
                };
                violation.map(|violation| (field, violation))
            })
            .collect()
    }

    /// Discards every value, as on form reset or after a successful submission.
    pub fn reset(&mut self) {
        self.window = EventScheduleWindow::default();
        self.errors.clear();
    }

    fn revalidate(&mut self, field: ScheduleField) {
        let violation = self
            .window
            .get(field)
            .and_then(|value| self.check(field, value));

        match violation {
            Some(violation) => {
                self.errors.insert(field, violation);
            }
            None => {
                self.errors.remove(&field);
            }
        }
    }

    fn check(&self, field: ScheduleField, value: Timestamp) -> Option<ScheduleViolation> {
        if let Some(missing) = self.missing_prerequisite(field) {
            return Some(ScheduleViolation::MissingPrerequisite { field, missing });
        }

        let anchors = anchors(field);

        if let Some(start) = anchors.own_start {
            if self.window.get(start).is_some_and(|start_value| value <= start_value) {
                return Some(ScheduleViolation::OrderViolation { field, start });
            }
        }

        if let Some((anchor, limit)) = self.nearest_set(anchors.min) {
            if value < limit {
                return Some(ScheduleViolation::RangeViolation {
                    field,
                    side: BoundSide::Min,
                    anchor,
                    limit,
                });
            }
        }

        if let Some(anchor) = anchors.max {
            if let Some(limit) = self.window.get(anchor) {
                if value > limit {
                    return Some(ScheduleViolation::RangeViolation {
                        field,
                        side: BoundSide::Max,
                        anchor,
                        limit,
                    });
                }
            }
        }

        None
    }

    fn nearest_set(&self, candidates: &[ScheduleField]) -> Option<(ScheduleField, Timestamp)> {
        candidates
            .iter()
            .find_map(|anchor| self.window.get(*anchor).map(|value| (*anchor, value)))
    }
}
