//! Argument parsing and command dispatch.

use clap::{Args, Parser, Subcommand, ValueEnum};
use patientaccess_client::DEFAULT_BASE_URL;
use patientaccess_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging};
use uuid::Uuid;

use crate::client::{AppContext, CliResult};
use crate::commands::appointments::handle_slots;
use crate::commands::auth::handle_signin;

pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Parses CLI arguments, installs logging, and executes the requested
/// command. Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();

    let logging = LoggingConfig {
        level: &cli.log_level,
        format: cli.log_format.unwrap_or_else(LogFormat::infer),
    };
    if let Err(err) = init_logging(&logging) {
        eprintln!("warning: {err:#}");
    }

    match dispatch(cli).await {
        Ok(()) => 0,
        Err(err) => {
            tracing::debug!(exit_code = err.exit_code(), "command failed");
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

async fn dispatch(cli: Cli) -> CliResult<()> {
    let ctx = AppContext::from_cli(&cli)?;

    match cli.command {
        Command::Signin(args) => handle_signin(&ctx, args, cli.output).await,
        Command::Slots(args) => handle_slots(&ctx, args, cli.output).await,
    }
}

#[derive(Parser)]
#[command(
    name = "patientaccess",
    version,
    about = "Command-line client for the Patient Access API"
)]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        env = "PATIENTACCESS_API_URL",
        default_value = DEFAULT_BASE_URL
    )]
    pub(crate) api_url: String,
    #[arg(long, global = true, env = "PATIENTACCESS_USER_AGENT")]
    pub(crate) user_agent: Option<String>,
    #[arg(
        long,
        global = true,
        env = "PATIENTACCESS_HTTP_TIMEOUT_SECS",
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
    #[arg(
        long,
        global = true,
        env = "PATIENTACCESS_LOG_LEVEL",
        default_value = DEFAULT_LOG_LEVEL
    )]
    pub(crate) log_level: String,
    #[arg(
        long,
        global = true,
        env = "PATIENTACCESS_LOG_FORMAT",
        help = "Log output format: json or pretty (text)"
    )]
    pub(crate) log_format: Option<LogFormat>,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Sign in and print the issued access token.
    Signin(SigninArgs),
    /// List the appointment slot types available to a patient.
    Slots(SlotsArgs),
}

#[derive(Args, Default)]
pub(crate) struct CredentialArgs {
    #[arg(long, env = "PATIENTACCESS_USERNAME")]
    pub(crate) username: Option<String>,
    #[arg(long, env = "PATIENTACCESS_PASSWORD", hide_env_values = true)]
    pub(crate) password: Option<String>,
}

#[derive(Args, Default)]
pub(crate) struct SigninArgs {
    #[command(flatten)]
    pub(crate) credentials: CredentialArgs,
}

#[derive(Args)]
pub(crate) struct SlotsArgs {
    #[arg(long, env = "PATIENTACCESS_PATIENT_ID", help = "Patient identifier")]
    pub(crate) patient_id: Uuid,
    #[arg(
        long,
        env = "PATIENTACCESS_TOKEN",
        hide_env_values = true,
        help = "Reuse an existing access token instead of signing in"
    )]
    pub(crate) token: Option<String>,
    #[command(flatten)]
    pub(crate) credentials: CredentialArgs,
}

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}
