#![forbid(unsafe_code)]

mod cmd;
mod output;
mod project;

use clap::{Parser, Subcommand};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use std::env;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use tally_core::ErrorCode;
use tally_core::model::InvalidStatus;
use tally_core::store::TaskNotFound;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "tally: task tracker with per-user dashboard analytics",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Lifecycle",
        about = "Initialize a tally project",
        long_about = "Initialize a tally project in the current directory.",
        after_help = "EXAMPLES:\n    # Initialize a project with a dashboard roster\n    tly init --user alice --user bob\n\n    # Emit machine-readable output\n    tly init --json"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Create a new task",
        after_help = "EXAMPLES:\n    # Create a task for alice\n    tly add --title \"Fix login timeout\" --owner alice\n\n    # With tags\n    tly add --title \"Ship v2\" --owner bob --tag urgent --tag infra"
    )]
    Add(cmd::add::AddArgs),

    #[command(
        next_help_heading = "Read",
        about = "List tasks",
        after_help = "EXAMPLES:\n    # All tasks\n    tly list\n\n    # Filter by owner and status\n    tly list --owner alice --status completed"
    )]
    List(cmd::list::ListArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Update fields of a task",
        after_help = "EXAMPLES:\n    # Mark a task completed\n    tly update tk-abc12345 --status completed\n\n    # Retitle\n    tly update tk-abc12345 --title \"New title\""
    )]
    Update(cmd::update::UpdateArgs),

    #[command(
        next_help_heading = "Metadata",
        about = "Add a comment to a task",
        after_help = "EXAMPLES:\n    tly comment tk-abc12345 \"Root cause found\""
    )]
    Comment(cmd::comment::CommentArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Delete a task",
        after_help = "EXAMPLES:\n    tly delete tk-abc12345"
    )]
    Delete(cmd::delete::DeleteArgs),

    #[command(
        next_help_heading = "Read",
        about = "Per-user analytics dashboard",
        long_about = "Compute (or serve from cache) one analytics snapshot per roster user:\nstatus histogram, daily completion timeline, top tags, and completion rates.",
        after_help = "EXAMPLES:\n    # Cached when fresh, recomputed otherwise\n    tly dashboard --json\n\n    # Force recomputation\n    tly dashboard --refresh"
    )]
    Dashboard(cmd::dashboard::DashboardArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TALLY_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "tally=debug,info"
        } else {
            "tally=info,warn"
        })
    });

    let format = env::var("TALLY_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry.with(fmt::layer().json().with_ansi(false)).init();
        }
        _ => {
            registry.with(fmt::layer().compact()).init();
        }
    }
}

/// Map an error chain to a structured CLI error with a stable code.
fn classify_error(err: &anyhow::Error) -> CliError {
    if let Some(e) = err.downcast_ref::<TaskNotFound>() {
        return CliError::from_code(ErrorCode::TaskNotFound, e.to_string());
    }
    if let Some(e) = err.downcast_ref::<InvalidStatus>() {
        return CliError::from_code(ErrorCode::InvalidStatus, e.to_string());
    }
    if err.downcast_ref::<project::NotInitialized>().is_some() {
        return CliError::from_code(ErrorCode::NotInitialized, err.to_string());
    }
    if err.chain().any(|cause| cause.is::<toml::de::Error>()) {
        return CliError::from_code(ErrorCode::ConfigParseError, format!("{err:#}"));
    }
    CliError::new(format!("{err:#}"))
}

fn run(cli: &Cli, output: OutputMode) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match &cli.command {
        // init works in the current directory; everything else requires a project.
        Commands::Init(args) => cmd::init::run_init(args, output, &cwd),
        command => {
            let project_root = project::require_project_root(&cwd)?;
            match command {
                Commands::Init(_) => unreachable!("handled above"),
                Commands::Add(args) => cmd::add::run_add(args, output, &project_root),
                Commands::List(args) => cmd::list::run_list(args, output, &project_root),
                Commands::Update(args) => cmd::update::run_update(args, output, &project_root),
                Commands::Comment(args) => cmd::comment::run_comment(args, output, &project_root),
                Commands::Delete(args) => cmd::delete::run_delete(args, output, &project_root),
                Commands::Dashboard(args) => {
                    cmd::dashboard::run_dashboard(args, output, &project_root)
                }
            }
        }
    }
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    if cli.verbose {
        info!("Verbose mode enabled");
    }
    let output = resolve_output_mode(cli.format, cli.json);

    if let Err(err) = run(&cli, output) {
        let cli_error = classify_error(&err);
        // Stderr failures at this point have nowhere better to go.
        let _ = render_error(output, &cli_error);
        std::process::exit(1);
    }
}
