//! Shared context, error types, and credential helpers for the CLI.

use std::fmt::{self, Display, Formatter};
use std::io::{self, IsTerminal};
use std::time::Duration;

use anyhow::anyhow;
use patientaccess_client::{Client, ClientError};

use crate::cli::{Cli, CredentialArgs};

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<ClientError> for CliError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::BadCredentials => {
                Self::validation("sign-in rejected: check username and password")
            }
            ClientError::InvalidBaseUrl { .. }
            | ClientError::InvalidUserAgent { .. }
            | ClientError::MalformedPath { .. } => Self::validation(error.to_string()),
            other => Self::failure(other),
        }
    }
}

/// Application context passed to command handlers.
#[derive(Clone)]
pub(crate) struct AppContext {
    pub(crate) client: Client,
}

impl AppContext {
    /// Build the API client from global CLI options.
    pub(crate) fn from_cli(cli: &Cli) -> CliResult<Self> {
        let mut builder = Client::builder()
            .base_url(cli.api_url.as_str())
            .timeout(Duration::from_secs(cli.timeout));
        if let Some(agent) = &cli.user_agent {
            builder = builder.user_agent(agent.as_str());
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

/// Username and password ready to submit.
pub(crate) struct Credentials {
    pub(crate) username: String,
    pub(crate) password: String,
}

/// Resolve credentials from flags/environment, prompting for the password on a terminal.
pub(crate) fn resolve_credentials(args: &CredentialArgs) -> CliResult<Credentials> {
    let username = args
        .username
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            CliError::validation("username is required (flag --username or PATIENTACCESS_USERNAME)")
        })?
        .to_string();

    let password = match &args.password {
        Some(value) => value.clone(),
        None if io::stdin().is_terminal() => rpassword::prompt_password("Password: ")
            .map_err(|err| CliError::failure(anyhow!("failed to read password from stdin: {err}")))?,
        None => {
            return Err(CliError::validation(
                "password required; supply via --password or PATIENTACCESS_PASSWORD when running non-interactively",
            ));
        }
    };

    if password.is_empty() {
        return Err(CliError::validation("password cannot be empty"));
    }

    Ok(Credentials { username, password })
}
