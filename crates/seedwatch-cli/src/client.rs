//! Shared HTTP wiring, error types, and helpers for the CLI.

use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use anyhow::anyhow;
use rand::{Rng, distr::Alphanumeric};
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use seedwatch_client::ApiClient;
use url::Url;

use crate::cli::{Cli, OutputFormat};

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";

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

/// Resolved dependencies shared by every command handler.
pub(crate) struct AppContext {
    pub(crate) api: ApiClient,
    pub(crate) base_url: Url,
    pub(crate) timeout: Duration,
    pub(crate) output: OutputFormat,
}

impl AppContext {
    /// Construct the backend client from parsed CLI options, tagging every
    /// request with a per-invocation trace identifier.
    pub(crate) fn from_cli(cli: &Cli, trace_id: &str) -> CliResult<Self> {
        let mut default_headers = HeaderMap::new();
        let request_id = HeaderValue::from_str(trace_id).map_err(|_| {
            CliError::failure(anyhow!("trace identifier contains invalid characters"))
        })?;
        default_headers.insert(HEADER_REQUEST_ID, request_id);

        let timeout = Duration::from_secs(cli.timeout);
        let http = Client::builder()
            .timeout(timeout)
            .default_headers(default_headers)
            .build()
            .map_err(|err| CliError::failure(anyhow!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            api: ApiClient::from_parts(http, cli.api_url.clone()),
            base_url: cli.api_url.clone(),
            timeout,
            output: cli.output,
        })
    }
}

/// Generate a random alphanumeric string of the requested length.
pub(crate) fn random_string(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len).map(|_| rng.sample(Alphanumeric) as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_distinguish_validation_from_failure() {
        assert_eq!(CliError::validation("bad flag").exit_code(), 2);
        assert_eq!(CliError::failure(anyhow!("boom")).exit_code(), 3);
    }

    #[test]
    fn random_string_has_requested_length() {
        let id = random_string(16);
        assert_eq!(id.len(), 16);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
