use super::timestamp::{deserialize_optional_timestamp, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the six timestamps captured by the schedule step of the create-event wizard.
///
/// Variants are declared in topological order of the re-validation graph, so the
/// derived `Ord` doubles as the order in which a cascade visits fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleField {
    LifecycleStart,
    LifecycleEnd,
    SaleStart,
    SaleEnd,
    EventStart,
    EventEnd,
}

impl ScheduleField {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::LifecycleStart,
            Self::LifecycleEnd,
            Self::SaleStart,
            Self::SaleEnd,
            Self::EventStart,
            Self::EventEnd,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::LifecycleStart => "Lifecycle start",
            Self::LifecycleEnd => "Lifecycle end",
            Self::SaleStart => "Ticket sale start",
            Self::SaleEnd => "Ticket sale end",
            Self::EventStart => "Event start",
            Self::EventEnd => "Event end",
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::LifecycleStart => "lifecycle_start",
            Self::LifecycleEnd => "lifecycle_end",
            Self::SaleStart => "sale_start",
            Self::SaleEnd => "sale_end",
            Self::EventStart => "event_start",
            Self::EventEnd => "event_end",
        }
    }

    pub const fn window(self) -> ScheduleWindowKind {
        match self {
            Self::LifecycleStart | Self::LifecycleEnd => ScheduleWindowKind::Lifecycle,
            Self::SaleStart | Self::SaleEnd => ScheduleWindowKind::TicketSale,
            Self::EventStart | Self::EventEnd => ScheduleWindowKind::EventTime,
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ScheduleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raised when a field identifier from a URL or CLI flag names no schedule field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown schedule field '{0}'")]
pub struct UnknownFieldError(pub String);

impl FromStr for ScheduleField {
    type Err = UnknownFieldError;

    /// Accepts `sale_start`, `sale-start` and `saleStart` spellings.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized: String = raw
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        Self::ordered()
            .into_iter()
            .find(|field| field.key().replace('_', "") == normalized)
            .ok_or_else(|| UnknownFieldError(raw.to_string()))
    }
}

/// The three chained windows of an event schedule, upstream first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleWindowKind {
    Lifecycle,
    TicketSale,
    EventTime,
}

impl ScheduleWindowKind {
    pub const fn ordered() -> [Self; 3] {
        [Self::Lifecycle, Self::TicketSale, Self::EventTime]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Lifecycle => "Event lifecycle",
            Self::TicketSale => "Ticket sale",
            Self::EventTime => "Event time",
        }
    }

    pub const fn bounds(self) -> (ScheduleField, ScheduleField) {
        match self {
            Self::Lifecycle => (ScheduleField::LifecycleStart, ScheduleField::LifecycleEnd),
            Self::TicketSale => (ScheduleField::SaleStart, ScheduleField::SaleEnd),
            Self::EventTime => (ScheduleField::EventStart, ScheduleField::EventEnd),
        }
    }
}

/// Raw values of the six schedule fields as entered so far. Any field may be empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventScheduleWindow {
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub lifecycle_start: Option<Timestamp>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub lifecycle_end: Option<Timestamp>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub sale_start: Option<Timestamp>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub sale_end: Option<Timestamp>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub event_start: Option<Timestamp>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub event_end: Option<Timestamp>,
}

impl EventScheduleWindow {
    pub fn get(&self, field: ScheduleField) -> Option<Timestamp> {
        match field {
            ScheduleField::LifecycleStart => self.lifecycle_start,
            ScheduleField::LifecycleEnd => self.lifecycle_end,
            ScheduleField::SaleStart => self.sale_start,
            ScheduleField::SaleEnd => self.sale_end,
            ScheduleField::EventStart => self.event_start,
            ScheduleField::EventEnd => self.event_end,
        }
    }

    pub fn set(&mut self, field: ScheduleField, value: Option<Timestamp>) {
        let slot = match field {
            ScheduleField::LifecycleStart => &mut self.lifecycle_start,
            ScheduleField::LifecycleEnd => &mut self.lifecycle_end,
            ScheduleField::SaleStart => &mut self.sale_start,
            ScheduleField::SaleEnd => &mut self.sale_end,
            ScheduleField::EventStart => &mut self.event_start,
            ScheduleField::EventEnd => &mut self.event_end,
        };
        *slot = value;
    }

    pub fn is_set(&self, field: ScheduleField) -> bool {
        self.get(field).is_some()
    }

    /// A window counts as complete once both of its bounds hold a value.
    pub fn is_window_complete(&self, window: ScheduleWindowKind) -> bool {
        let (start, end) = window.bounds();
        self.is_set(start) && self.is_set(end)
    }

    pub fn is_empty(&self) -> bool {
        ScheduleField::ordered()
            .into_iter()
            .all(|field| !self.is_set(field))
    }
}
