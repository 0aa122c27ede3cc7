use crate::careers::{run_apply, run_jobs, ApplyCommand, JobsCommand};
use crate::department::{run_department, DepartmentCommand};
use crate::server;
use clap::{Args, Parser, Subcommand};
use hr_portal::config::AppConfig;
use hr_portal::error::AppError;
use hr_portal::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "hr-portal",
    about = "Browse openings, send applications, and manage the department board",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Browse the published openings
    Jobs {
        #[command(subcommand)]
        command: JobsCommand,
    },
    /// Send an application to the submission endpoint
    Apply {
        #[command(subcommand)]
        command: ApplyCommand,
    },
    /// Inspect and edit groups, employees, and tasks
    Department {
        #[command(subcommand)]
        command: DepartmentCommand,
    },
    /// Serve the in-memory sandbox endpoints (default command)
    Sandbox(SandboxArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct SandboxArgs {
    /// Override the configured host for the sandbox
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the sandbox
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Sandbox(SandboxArgs::default()));

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match command {
        Command::Jobs { command } => {
            run_jobs(command);
            Ok(())
        }
        Command::Apply { command } => run_apply(&config, command).await,
        Command::Department { command } => run_department(&config, command).await,
        Command::Sandbox(args) => server::run(config, args).await,
    }
}
