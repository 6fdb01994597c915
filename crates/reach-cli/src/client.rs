//! HTTP status source, CLI error types, and client construction.

use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};

use anyhow::anyhow;
use async_trait::async_trait;
use reach_api_models::{ApiErrorBody, STATUS_PATH, StatusSnapshot};
use reach_monitor::{RefreshError, StatusSource};
use reach_telemetry::REQUEST_ID_HEADER;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode, Url};

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

/// Build the shared HTTP client. Every request of a session carries the same
/// request id so server logs can be correlated with one watcher.
///
/// No timeout is configured: a slow cycle is simply overtaken by the next one.
pub(crate) fn build_client(trace_id: &str) -> CliResult<Client> {
    let mut default_headers = HeaderMap::new();
    let request_id = HeaderValue::from_str(trace_id).map_err(|_| {
        CliError::failure(anyhow!("trace identifier contains invalid characters"))
    })?;
    default_headers.insert(REQUEST_ID_HEADER, request_id);

    Client::builder()
        .default_headers(default_headers)
        .build()
        .map_err(|err| CliError::failure(anyhow!("failed to build HTTP client: {err}")))
}

/// Parse the API URL provided to the CLI.
pub(crate) fn parse_url(input: &str) -> Result<Url, String> {
    input
        .parse::<Url>()
        .map_err(|err| format!("invalid URL '{input}': {err}"))
}

/// Fetches snapshots from `GET /api/data` on a Reach server.
#[derive(Clone)]
pub(crate) struct HttpStatusSource {
    client: Client,
    endpoint: Url,
}

impl HttpStatusSource {
    pub(crate) fn new(client: Client, base_url: &Url) -> CliResult<Self> {
        let endpoint = base_url
            .join(STATUS_PATH)
            .map_err(|err| CliError::validation(format!("invalid base URL: {err}")))?;
        Ok(Self { client, endpoint })
    }

    pub(crate) const fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl StatusSource for HttpStatusSource {
    async fn fetch_status(&self) -> Result<StatusSnapshot, RefreshError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(|err| RefreshError::transport(describe(&err)))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| RefreshError::transport(describe(&err)))?;

        if !status.is_success() {
            return Err(classify_failure(status, &bytes));
        }

        serde_json::from_slice::<StatusSnapshot>(&bytes)
            .map_err(|err| RefreshError::transport(format!("invalid status payload: {err}")))
    }
}

/// Classify a non-success response. A JSON body is an application error
/// carrying its `error` field (or the status text when the field is missing);
/// a body that is not JSON at all could not be parsed and counts as a
/// transport failure.
pub(crate) fn classify_failure(status: StatusCode, body: &[u8]) -> RefreshError {
    if let Ok(problem) = serde_json::from_slice::<ApiErrorBody>(body) {
        return RefreshError::application(status.as_u16(), problem.error);
    }
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(_) => RefreshError::application(
            status.as_u16(),
            status.canonical_reason().unwrap_or("request failed"),
        ),
        Err(err) => RefreshError::transport(format!(
            "invalid error payload for status {}: {err}",
            status.as_u16()
        )),
    }
}

/// Flatten an error and its sources into one line.
fn describe(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
