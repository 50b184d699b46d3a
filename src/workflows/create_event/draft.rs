use super::domain::{EventScheduleWindow, ScheduleField};
use super::validator::{ScheduleValidator, ScheduleViolation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Who can discover the event once published.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventVisibility {
    #[default]
    Public,
    Unlisted,
    Private,
}

impl EventVisibility {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Public => "Public",
            Self::Unlisted => "Unlisted",
            Self::Private => "Private",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown visibility '{0}' (expected public, unlisted or private)")]
pub struct UnknownVisibilityError(pub String);

impl FromStr for EventVisibility {
    type Err = UnknownVisibilityError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "public" => Ok(Self::Public),
            "unlisted" => Ok(Self::Unlisted),
            "private" => Ok(Self::Private),
            _ => Err(UnknownVisibilityError(raw.to_string())),
        }
    }
}

/// Everything the create-event wizard collects before submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    /// `None` means unlimited seats.
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub visibility: EventVisibility,
    #[serde(default)]
    pub schedule: EventScheduleWindow,
}

/// Draft-level rules outside the schedule chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DraftViolation {
    #[error("event title must not be blank")]
    BlankTitle,
    #[error("capacity must be between 1 and {max}")]
    CapacityOutOfRange { max: u32 },
}

/// Outcome of checking a draft; empty means submittable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DraftReport {
    pub draft: Vec<DraftViolation>,
    pub schedule: BTreeMap<ScheduleField, ScheduleViolation>,
}

impl DraftReport {
    pub fn is_clean(&self) -> bool {
        self.draft.is_empty() && self.schedule.is_empty()
    }

    pub fn violation_count(&self) -> usize {
        self.draft.len() + self.schedule.len()
    }

    pub fn messages(&self) -> Vec<String> {
        self.draft
            .iter()
            .map(ToString::to_string)
            .chain(self.schedule.values().map(ToString::to_string))
            .collect()
    }
}

impl fmt::Display for DraftReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return f.write_str("no violations");
        }
        f.write_str(&self.messages().join("; "))
    }
}

impl EventDraft {
    pub fn validate(&self, max_capacity: u32) -> DraftReport {
        let mut draft = Vec::new();

        if self.title.trim().is_empty() {
            draft.push(DraftViolation::BlankTitle);
        }

        if let Some(capacity) = self.capacity {
            if capacity == 0 || capacity > max_capacity {
                draft.push(DraftViolation::CapacityOutOfRange { max: max_capacity });
            }
        }

        let schedule = ScheduleValidator::from_window(self.schedule).validate_all();

        DraftReport { draft, schedule }
    }
}
