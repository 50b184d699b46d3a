use crate::demo::{
    run_demo, run_schedule_check, run_schedule_import, DemoArgs, ScheduleCheckArgs,
    ScheduleImportArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use event_schedule::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Event Schedule Service",
    about = "Validate create-event schedules and serve the schedule API",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Check event schedules from the command line
    Schedule {
        #[command(subcommand)]
        command: ScheduleCommand,
    },
    /// Walk through the schedule wizard with sample dates
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum ScheduleCommand {
    /// Validate a single schedule given as flags
    Check(ScheduleCheckArgs),
    /// Validate every draft in a CSV export
    Import(ScheduleImportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Schedule {
            command: ScheduleCommand::Check(args),
        } => run_schedule_check(args),
        Command::Schedule {
            command: ScheduleCommand::Import(args),
        } => run_schedule_import(args),
        Command::Demo(args) => run_demo(args),
    }
}
