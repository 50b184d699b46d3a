use crate::infra::parse_timestamp_arg;
use clap::Args;
use event_schedule::config::AppConfig;
use event_schedule::error::AppError;
use event_schedule::workflows::create_event::{
    parse_timestamp, DraftReport, EventDraft, FieldView, ScheduleField, ScheduleImporter,
    ScheduleValidator, Timestamp,
};
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct ScheduleCheckArgs {
    /// Lifecycle start (RFC 3339, YYYY-MM-DDTHH:MM or YYYY-MM-DD; naive values are UTC)
    #[arg(long, value_parser = parse_timestamp_arg)]
    pub(crate) lifecycle_start: Option<Timestamp>,
    /// Lifecycle end
    #[arg(long, value_parser = parse_timestamp_arg)]
    pub(crate) lifecycle_end: Option<Timestamp>,
    /// Ticket sale start
    #[arg(long, value_parser = parse_timestamp_arg)]
    pub(crate) sale_start: Option<Timestamp>,
    /// Ticket sale end
    #[arg(long, value_parser = parse_timestamp_arg)]
    pub(crate) sale_end: Option<Timestamp>,
    /// Event start
    #[arg(long, value_parser = parse_timestamp_arg)]
    pub(crate) event_start: Option<Timestamp>,
    /// Event end
    #[arg(long, value_parser = parse_timestamp_arg)]
    pub(crate) event_end: Option<Timestamp>,
}

impl ScheduleCheckArgs {
    fn value(&self, field: ScheduleField) -> Option<Timestamp> {
        match field {
            ScheduleField::LifecycleStart => self.lifecycle_start,
            ScheduleField::LifecycleEnd => self.lifecycle_end,
            ScheduleField::SaleStart => self.sale_start,
            ScheduleField::SaleEnd => self.sale_end,
            ScheduleField::EventStart => self.event_start,
            ScheduleField::EventEnd => self.event_end,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct ScheduleImportArgs {
    /// CSV export with Title, Capacity, Visibility and the six schedule columns
    pub(crate) path: PathBuf,
    /// Override APP_MAX_EVENT_CAPACITY for this run
    #[arg(long)]
    pub(crate) max_capacity: Option<u32>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print bounds for every field after each step, not just the changed ones.
    #[arg(long)]
    pub(crate) verbose: bool,
}

pub(crate) fn run_schedule_check(args: ScheduleCheckArgs) -> Result<(), AppError> {
    let mut validator = ScheduleValidator::new();
    for field in ScheduleField::ordered() {
        if let Some(value) = args.value(field) {
            validator.set_field(field, Some(value));
        }
    }

    println!("Schedule check");
    render_fields(&validator.view());

    let errors = validator.validate_all();
    if errors.is_empty() {
        println!("\nSchedule is ready to submit");
    } else {
        println!("\nBlocking issues");
        for violation in errors.values() {
            println!("- {violation}");
        }
    }

    Ok(())
}

pub(crate) fn run_schedule_import(args: ScheduleImportArgs) -> Result<(), AppError> {
    let max_capacity = match args.max_capacity {
        Some(value) => value,
        None => AppConfig::load()?.schedule.max_capacity,
    };

    let drafts = ScheduleImporter::from_path(&args.path)?;
    println!(
        "Imported {} event draft(s) from {}",
        drafts.len(),
        args.path.display()
    );

    let mut accepted = 0;
    for draft in &drafts {
        let report = draft.validate(max_capacity);
        if report.is_clean() {
            accepted += 1;
        }
        render_draft_report(draft, &report);
    }

    println!(
        "\n{accepted} of {} draft(s) ready to submit",
        drafts.len()
    );
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { verbose } = args;
    let mut validator = ScheduleValidator::new();

    println!("Create-event schedule demo");
    let steps: [(&str, ScheduleField, Option<&str>); 8] = [
        ("Open the lifecycle", ScheduleField::LifecycleStart, Some("2025-01-01")),
        ("Close the lifecycle", ScheduleField::LifecycleEnd, Some("2025-01-31")),
        ("Open ticket sales", ScheduleField::SaleStart, Some("2025-01-05")),
        ("Close ticket sales", ScheduleField::SaleEnd, Some("2025-01-10")),
        ("Start the event as sales close", ScheduleField::EventStart, Some("2025-01-10")),
        ("End the event", ScheduleField::EventEnd, Some("2025-01-11T02:00")),
        ("Shrink the lifecycle", ScheduleField::LifecycleEnd, Some("2025-01-03")),
        ("Clear the lifecycle start", ScheduleField::LifecycleStart, None),
    ];

    for (index, (description, field, raw)) in steps.into_iter().enumerate() {
        let value = raw.map(parse_timestamp).transpose()?;
        let revalidated = validator.set_field(field, value);

        println!(
            "\nStep {}: {} ({} = {})",
            index + 1,
            description,
            field.key(),
            format_value(value)
        );
        let views: Vec<FieldView> = if verbose {
            validator.view()
        } else {
            revalidated
                .iter()
                .map(|field| validator.field_view(*field))
                .collect()
        };
        render_fields(&views);
    }

    let errors = validator.validate_all();
    println!("\nSubmit check: {} blocking issue(s)", errors.len());
    for violation in errors.values() {
        println!("- {violation}");
    }

    Ok(())
}

fn render_fields(views: &[FieldView]) {
    let mut current_window = None;
    for view in views {
        let window = view.field.window();
        if current_window != Some(window) {
            println!("{}", window.label());
            current_window = Some(window);
        }
        let state = if view.disabled { "locked" } else { "open" };
        let bounds = match (view.min, view.max) {
            (None, None) => String::new(),
            (min, max) => format!(
                " | range {} .. {}",
                format_bound(min),
                format_bound(max)
            ),
        };
        let status = view.error.as_deref().unwrap_or("ok");
        println!(
            "  - {}: {} [{}]{} | {}",
            view.label,
            format_value(view.value),
            state,
            bounds,
            status
        );
    }
}

fn render_draft_report(draft: &EventDraft, report: &DraftReport) {
    let capacity = match draft.capacity {
        Some(capacity) => capacity.to_string(),
        None => "unlimited".to_string(),
    };
    println!(
        "\n{} ({}, capacity {})",
        if draft.title.trim().is_empty() {
            "<untitled>"
        } else {
            draft.title.as_str()
        },
        draft.visibility.label(),
        capacity
    );

    if report.is_clean() {
        println!("- ready to submit");
        return;
    }
    for message in report.messages() {
        println!("- {message}");
    }
}

fn format_value(value: Option<Timestamp>) -> String {
    match value {
        Some(value) => value.format("%Y-%m-%d %H:%M UTC").to_string(),
        None => "empty".to_string(),
    }
}

fn format_bound(value: Option<Timestamp>) -> String {
    match value {
        Some(value) => value.format("%Y-%m-%d %H:%M").to_string(),
        None => "*".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_runs_to_completion() {
        run_demo(DemoArgs { verbose: true }).expect("demo runs");
    }

    #[test]
    fn schedule_check_accepts_partial_input() {
        let args = ScheduleCheckArgs {
            lifecycle_start: Some(parse_timestamp("2025-01-01").expect("valid")),
            lifecycle_end: Some(parse_timestamp("2025-01-31").expect("valid")),
            ..ScheduleCheckArgs::default()
        };
        run_schedule_check(args).expect("check runs");
    }

    #[test]
    fn import_reports_missing_files() {
        let args = ScheduleImportArgs {
            path: PathBuf::from("does/not/exist.csv"),
            max_capacity: Some(100),
        };
        assert!(matches!(
            run_schedule_import(args),
            Err(AppError::Import(_))
        ));
    }

    #[test]
    fn empty_values_render_as_empty() {
        assert_eq!(format_value(None), "empty");
        assert_eq!(format_bound(None), "*");
        let value = parse_timestamp("2025-01-10T18:30:00+02:00").expect("valid");
        assert_eq!(format_value(Some(value)), "2025-01-10 16:30 UTC");
    }
}
