//! Argument parsing and command dispatch for the `seedwatch` binary.

use clap::{Args, Parser, Subcommand, ValueEnum};
use seedwatch_core::JobAction;
use seedwatch_telemetry::{LoggingConfig, init_logging};
use url::Url;

use crate::client::{AppContext, CliResult, random_string};
use crate::commands::{
    handle_add, handle_ctl, handle_jobs, handle_system_check, handle_system_install, handle_watch,
};

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// Parses CLI arguments, executes the requested command, and reports the
/// outcome. Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    if let Err(err) = init_logging(&LoggingConfig::default()) {
        eprintln!("warning: {err:#}");
    }

    let command_name = command_label(&cli.command);
    let trace_id = random_string(16);
    tracing::debug!(command = command_name, trace_id, "command invoked");

    let ctx = match AppContext::from_cli(&cli, &trace_id) {
        Ok(ctx) => ctx,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            return err.exit_code();
        }
    };

    match dispatch(cli, &ctx).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

async fn dispatch(cli: Cli, ctx: &AppContext) -> CliResult<()> {
    match cli.command {
        Command::Watch(args) => handle_watch(ctx, args).await,
        Command::Jobs => handle_jobs(ctx).await,
        Command::Add(args) => handle_add(ctx, args).await,
        Command::Ctl(args) => handle_ctl(ctx, args).await,
        Command::System(system) => match system {
            SystemCommand::Check => handle_system_check(ctx).await,
            SystemCommand::Install => handle_system_install(ctx).await,
        },
    }
}

#[derive(Parser)]
#[command(name = "seedwatch", about = "Terminal client for a seedwatch download backend")]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        env = "SEEDWATCH_API_URL",
        value_parser = parse_url,
        default_value = DEFAULT_API_URL
    )]
    pub(crate) api_url: Url,
    #[arg(
        long,
        global = true,
        env = "SEEDWATCH_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    pub(crate) timeout: u64,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    pub(crate) output: OutputFormat,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Poll the backend continuously and render the job table.
    Watch(WatchArgs),
    /// Fetch and render the job table once.
    Jobs,
    /// Submit a magnet link or a .torrent file.
    Add(AddArgs),
    /// Send a control action to a single job.
    Ctl(CtlArgs),
    /// Inspect or repair the backend's download tooling.
    #[command(subcommand)]
    System(SystemCommand),
}

#[derive(Args)]
pub(crate) struct WatchArgs {
    #[arg(long, help = "Start at the slower background polling cadence")]
    pub(crate) background: bool,
}

#[derive(Args)]
pub(crate) struct AddArgs {
    #[arg(help = "Magnet link, or path to a .torrent file")]
    pub(crate) source: String,
}

#[derive(Args)]
pub(crate) struct CtlArgs {
    #[arg(help = "Job identifier as reported by the backend")]
    pub(crate) id: String,
    #[arg(value_enum)]
    pub(crate) action: ActionType,
    #[arg(long, help = "Confirm a destructive action without prompting")]
    pub(crate) yes: bool,
}

#[derive(Subcommand)]
pub(crate) enum SystemCommand {
    /// Report which download engines the backend has available.
    Check,
    /// Ask the backend to install its recommended download engine.
    Install,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub(crate) enum ActionType {
    Pause,
    Resume,
    Stop,
    Delete,
}

impl From<ActionType> for JobAction {
    fn from(action: ActionType) -> Self {
        match action {
            ActionType::Pause => Self::Pause,
            ActionType::Resume => Self::Resume,
            ActionType::Stop => Self::Stop,
            ActionType::Delete => Self::Delete,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Watch(_) => "watch",
        Command::Jobs => "jobs",
        Command::Add(_) => "add",
        Command::Ctl(args) => match args.action {
            ActionType::Pause => "ctl_pause",
            ActionType::Resume => "ctl_resume",
            ActionType::Stop => "ctl_stop",
            ActionType::Delete => "ctl_delete",
        },
        Command::System(SystemCommand::Check) => "system_check",
        Command::System(SystemCommand::Install) => "system_install",
    }
}

fn parse_url(input: &str) -> Result<Url, String> {
    input
        .parse::<Url>()
        .map_err(|err| format!("invalid URL '{input}': {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_only_a_command_is_given() {
        let cli = Cli::try_parse_from(["seedwatch", "jobs"]).expect("parse");
        assert_eq!(cli.api_url.as_str(), "http://127.0.0.1:5000/");
        assert_eq!(cli.timeout, DEFAULT_TIMEOUT_SECS);
        assert!(matches!(cli.output, OutputFormat::Table));
    }

    #[test]
    fn ctl_parses_action_and_confirmation_flag() {
        let cli = Cli::try_parse_from(["seedwatch", "ctl", "abc123", "delete", "--yes"])
            .expect("parse");
        let Command::Ctl(args) = cli.command else {
            panic!("expected ctl command");
        };
        assert_eq!(args.id, "abc123");
        assert!(matches!(args.action, ActionType::Delete));
        assert!(args.yes);
    }

    #[test]
    fn command_labels_name_the_dispatched_action() {
        let cli = Cli::try_parse_from(["seedwatch", "ctl", "abc123", "pause"]).expect("parse");
        assert_eq!(command_label(&cli.command), "ctl_pause");

        let cli = Cli::try_parse_from(["seedwatch", "system", "check"]).expect("parse");
        assert_eq!(command_label(&cli.command), "system_check");
    }

    #[test]
    fn rejects_a_malformed_api_url() {
        let result = Cli::try_parse_from(["seedwatch", "--api-url", "not a url", "jobs"]);
        assert!(result.is_err());
    }
}
