//! Argument parsing and the watch loop.

use std::sync::Arc;

use anyhow::anyhow;
use clap::{Parser, ValueEnum};
use reach_monitor::{OverlapPolicy, RefreshSchedule, RenderSink, StatusPoller, StatusSource};
use reach_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LogTarget, LoggingConfig, init_logging};
use reqwest::Url;
use tokio_util::sync::CancellationToken;
use tracing::info;
use uuid::Uuid;

use crate::client::{CliError, CliResult, HttpStatusSource, build_client, parse_url};
use crate::output::TerminalSink;

const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// Parses CLI arguments and watches the status endpoint until interrupted.
/// Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    match execute(cli).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "reach-watch",
    about = "Watch the Reach bot status from a terminal"
)]
pub(crate) struct Cli {
    #[arg(
        long,
        env = "REACH_API_URL",
        value_parser = parse_url,
        default_value = DEFAULT_API_URL
    )]
    api_url: Url,
    #[arg(
        long = "output",
        alias = "format",
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Render frames as a table or as one JSON object per line"
    )]
    output: OutputFormat,
    #[arg(
        long,
        help = "Abandon a pending request when the next refresh starts"
    )]
    cancel_stale: bool,
    #[arg(long, help = "Run a single refresh, then exit with its outcome")]
    once: bool,
    #[arg(long, env = "REACH_LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,
    #[arg(long, env = "REACH_LOG_FORMAT", value_parser = parse_log_format)]
    log_format: Option<LogFormat>,
}

impl Cli {
    const fn overlap_policy(&self) -> OverlapPolicy {
        if self.cancel_stale {
            OverlapPolicy::CancelStale
        } else {
            OverlapPolicy::Overlap
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    Table,
    Json,
}

fn parse_log_format(input: &str) -> Result<LogFormat, String> {
    input.parse::<LogFormat>().map_err(|err| err.to_string())
}

async fn execute(cli: Cli) -> CliResult<()> {
    let logging = LoggingConfig {
        level: &cli.log_level,
        format: cli.log_format.unwrap_or(LogFormat::Pretty),
        target: LogTarget::Stderr,
        ..LoggingConfig::default()
    };
    init_logging(&logging).map_err(CliError::failure)?;

    let trace_id = Uuid::new_v4().to_string();
    let client = build_client(&trace_id)?;
    let source = HttpStatusSource::new(client, &cli.api_url)?;
    let sink = TerminalSink::stdout(cli.output);
    let poller = Arc::new(StatusPoller::new(source, sink));

    info!(
        endpoint = %poller.source().endpoint(),
        trace_id = %trace_id,
        "watching status endpoint"
    );

    if cli.once {
        return refresh_once(&poller).await;
    }
    watch(poller, cli.overlap_policy(), shutdown_signal()).await
}

/// Run one cycle and report its failure, if any, through the exit code.
pub(crate) async fn refresh_once<S, K>(poller: &StatusPoller<S, K>) -> CliResult<()>
where
    S: StatusSource,
    K: RenderSink,
{
    let outcome = poller.fetch().await;
    let failure = outcome.as_ref().err().cloned();
    poller.render(outcome);
    failure.map_or(Ok(()), |err| Err(CliError::failure(err)))
}

/// Drive the poller on the refresh schedule until `stop` resolves.
pub(crate) async fn watch<S, K, F>(
    poller: Arc<StatusPoller<S, K>>,
    policy: OverlapPolicy,
    stop: F,
) -> CliResult<()>
where
    S: StatusSource + Send + Sync + 'static,
    K: RenderSink + Send + Sync + 'static,
    F: Future<Output = CliResult<()>>,
{
    let shutdown = CancellationToken::new();
    let schedule = RefreshSchedule::new(shutdown.clone())
        .with_policy(policy)
        .spawn(poller);

    let stopped = stop.await;
    shutdown.cancel();
    schedule
        .await
        .map_err(|err| CliError::failure(anyhow!("refresh schedule aborted: {err}")))?;
    stopped
}

async fn shutdown_signal() -> CliResult<()> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|err| CliError::failure(anyhow!("failed to listen for interrupt: {err}")))?;
    info!("interrupt received; stopping watcher");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use anyhow::Result;
    use httpmock::MockServer;
    use httpmock::prelude::*;
    use reach_api_models::STATUS_PATH;
    use reach_monitor::RefreshError;
    use reach_test_support::fixtures::{error_payload, started_payload};

    use super::*;

    fn poller_for(
        server: &MockServer,
    ) -> Result<StatusPoller<HttpStatusSource, TerminalSink<Vec<u8>>>> {
        let base = parse_url(&server.base_url()).map_err(|err| anyhow!(err))?;
        let client = build_client("trace-cli").map_err(|err| anyhow!(err.display_message()))?;
        let source =
            HttpStatusSource::new(client, &base).map_err(|err| anyhow!(err.display_message()))?;
        Ok(StatusPoller::new(
            source,
            TerminalSink::new(Vec::new(), OutputFormat::Json, false),
        ))
    }

    #[test]
    fn defaults_point_at_local_dashboard() -> Result<()> {
        let cli = Cli::try_parse_from(["reach-watch"])?;
        assert_eq!(cli.api_url.as_str(), "http://127.0.0.1:5000/");
        assert_eq!(cli.output, OutputFormat::Table);
        assert_eq!(cli.overlap_policy(), OverlapPolicy::Overlap);
        assert!(!cli.once);
        Ok(())
    }

    #[test]
    fn flags_select_policy_and_format() -> Result<()> {
        let cli = Cli::try_parse_from([
            "reach-watch",
            "--api-url",
            "http://bot.local:8080",
            "--output",
            "json",
            "--cancel-stale",
            "--log-format",
            "json",
        ])?;
        assert_eq!(cli.api_url.host_str(), Some("bot.local"));
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.overlap_policy(), OverlapPolicy::CancelStale);
        assert_eq!(cli.log_format, Some(LogFormat::Json));
        Ok(())
    }

    #[test]
    fn invalid_arguments_are_rejected() {
        assert!(Cli::try_parse_from(["reach-watch", "--api-url", "::nope"]).is_err());
        assert!(Cli::try_parse_from(["reach-watch", "--log-format", "xml"]).is_err());
    }

    #[tokio::test]
    async fn refresh_once_succeeds_against_healthy_server() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path(STATUS_PATH);
            then.status(200)
                .header("content-type", "application/json")
                .json_body(started_payload());
        });

        let poller = poller_for(&server)?;
        refresh_once(&poller)
            .await
            .map_err(|err| anyhow!(err.display_message()))?;
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn refresh_once_fails_with_server_message() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path(STATUS_PATH);
            then.status(500)
                .header("content-type", "application/json")
                .json_body(error_payload("no such table: users"));
        });

        let poller = poller_for(&server)?;
        let err = refresh_once(&poller)
            .await
            .expect_err("failure expected");
        assert_eq!(err.exit_code(), 3);
        assert!(err.display_message().contains("no such table: users"));
        Ok(())
    }

    #[tokio::test]
    async fn watch_polls_until_stopped() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path(STATUS_PATH);
            then.status(200)
                .header("content-type", "application/json")
                .json_body(started_payload());
        });

        let poller = Arc::new(poller_for(&server)?);
        let first_frame = Arc::clone(&poller);
        // Stop as soon as the immediate cycle has rendered, well before the
        // next tick is due.
        let stop = async move {
            tokio::time::timeout(Duration::from_secs(4), async {
                while first_frame.sink().frames_written() == 0 {
                    tokio::time::sleep(Duration::from_millis(10)).await;
                }
            })
            .await
            .map_err(|_| CliError::failure(anyhow!("no frame rendered")))
        };
        watch(Arc::clone(&poller), OverlapPolicy::Overlap, stop)
            .await
            .map_err(|err| anyhow!(err.display_message()))?;

        mock.assert_hits_async(1).await;
        assert_eq!(poller.sink().frames_written(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn watch_surfaces_stop_failure() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path(STATUS_PATH);
            then.status(200).json_body(started_payload());
        });

        let poller = Arc::new(poller_for(&server)?);
        let stop = async { Err(CliError::failure(RefreshError::transport("signal"))) };
        let err = watch(poller, OverlapPolicy::CancelStale, stop)
            .await
            .expect_err("stop failure propagates");
        assert_eq!(err.exit_code(), 3);
        Ok(())
    }
}
