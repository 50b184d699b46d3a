use super::domain::{EventScheduleWindow, ScheduleField};
use super::draft::{EventDraft, EventVisibility, UnknownVisibilityError};
use super::timestamp::{parse_timestamp, TimestampError};
use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum ScheduleImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Timestamp {
        row: usize,
        field: ScheduleField,
        source: TimestampError,
    },
    Capacity {
        row: usize,
        value: String,
    },
    Visibility {
        row: usize,
        source: UnknownVisibilityError,
    },
}

impl std::fmt::Display for ScheduleImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleImportError::Io(err) => write!(f, "failed to read event export: {}", err),
            ScheduleImportError::Csv(err) => write!(f, "invalid event CSV data: {}", err),
            ScheduleImportError::Timestamp { row, field, source } => {
                write!(f, "row {}: {} {}", row, field, source)
            }
            ScheduleImportError::Capacity { row, value } => {
                write!(f, "row {}: capacity '{}' is not a whole number", row, value)
            }
            ScheduleImportError::Visibility { row, source } => write!(f, "row {}: {}", row, source),
        }
    }
}

impl std::error::Error for ScheduleImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScheduleImportError::Io(err) => Some(err),
            ScheduleImportError::Csv(err) => Some(err),
            ScheduleImportError::Timestamp { source, .. } => Some(source),
            ScheduleImportError::Capacity { .. } => None,
            ScheduleImportError::Visibility { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for ScheduleImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ScheduleImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads event drafts from a spreadsheet export, one event per row.
pub struct ScheduleImporter;

impl ScheduleImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<EventDraft>, ScheduleImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<EventDraft>, ScheduleImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut drafts = Vec::new();

        for (index, record) in csv_reader.deserialize::<EventRow>().enumerate() {
            // Line 1 is the header.
            let row = index + 2;
            drafts.push(record?.into_draft(row)?);
        }

        Ok(drafts)
    }
}

#[derive(Debug, Deserialize)]
struct EventRow {
    #[serde(rename = "Title", default)]
    title: String,
    #[serde(rename = "Capacity", default, deserialize_with = "empty_string_as_none")]
    capacity: Option<String>,
    #[serde(rename = "Visibility", default, deserialize_with = "empty_string_as_none")]
    visibility: Option<String>,
    #[serde(
        rename = "Lifecycle Start",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    lifecycle_start: Option<String>,
    #[serde(
        rename = "Lifecycle End",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    lifecycle_end: Option<String>,
    #[serde(rename = "Sale Start", default, deserialize_with = "empty_string_as_none")]
    sale_start: Option<String>,
    #[serde(rename = "Sale End", default, deserialize_with = "empty_string_as_none")]
    sale_end: Option<String>,
    #[serde(rename = "Event Start", default, deserialize_with = "empty_string_as_none")]
    event_start: Option<String>,
    #[serde(rename = "Event End", default, deserialize_with = "empty_string_as_none")]
    event_end: Option<String>,
}

impl EventRow {
    fn into_draft(self, row: usize) -> Result<EventDraft, ScheduleImportError> {
        let capacity = self
            .capacity
            .map(|raw| {
                raw.parse::<u32>()
                    .map_err(|_| ScheduleImportError::Capacity { row, value: raw })
            })
            .transpose()?;

        let visibility = match self.visibility.as_deref() {
            Some(raw) => raw
                .parse::<EventVisibility>()
                .map_err(|source| ScheduleImportError::Visibility { row, source })?,
            None => EventVisibility::default(),
        };

        let mut schedule = EventScheduleWindow::default();
        let cells = [
            (ScheduleField::LifecycleStart, self.lifecycle_start),
            (ScheduleField::LifecycleEnd, self.lifecycle_end),
            (ScheduleField::SaleStart, self.sale_start),
            (ScheduleField::SaleEnd, self.sale_end),
            (ScheduleField::EventStart, self.event_start),
            (ScheduleField::EventEnd, self.event_end),
        ];
        for (field, cell) in cells {
            if let Some(raw) = cell {
                let value = parse_timestamp(&raw)
                    .map_err(|source| ScheduleImportError::Timestamp { row, field, source })?;
                schedule.set(field, Some(value));
            }
        }

        Ok(EventDraft {
            title: self.title,
            capacity,
            visibility,
            schedule,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
