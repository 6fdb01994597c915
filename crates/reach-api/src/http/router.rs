//! Router construction and server host for the API.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{Router, http::Request, routing::get};
use reach_api_models::STATUS_PATH;
use reach_telemetry::{build_sha, request_id_text};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{request_id::RequestId, services::ServeDir, trace::TraceLayer};
use tracing::{Span, info};

use crate::error::{ApiServerError, ApiServerResult};
use crate::http::page::index;
use crate::http::status::{health, status_data};
use crate::state::ApiState;
use crate::store::SharedStore;

/// Path prefix the browser frontend bundle is served under.
pub(crate) const ASSETS_PATH: &str = "/assets";

/// Axum router wrapper that hosts the dashboard endpoints.
pub struct ApiServer {
    router: Router,
}

impl ApiServer {
    /// Build the router over `store`. When `assets` is set, the directory is
    /// served under `/assets` so the dashboard page can load the browser
    /// frontend.
    #[must_use]
    pub fn new(store: SharedStore, assets: Option<PathBuf>) -> Self {
        let state = Arc::new(ApiState::new(store));
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &Request<_>| {
                let request_id = request_id_text(request.extensions().get::<RequestId>());
                tracing::info_span!(
                    "http.request",
                    method = %request.method(),
                    route = %request.uri().path(),
                    request_id = %request_id,
                    build_sha = %build_sha(),
                    status_code = tracing::field::Empty,
                    latency_ms = tracing::field::Empty
                )
            })
            .on_request(|_request: &Request<_>, _span: &Span| {})
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &Span| {
                    span.record("status_code", response.status().as_u16());
                    let latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
                    span.record("latency_ms", latency_ms);
                },
            );
        let layered = ServiceBuilder::new()
            .layer(reach_telemetry::echo_request_id())
            .layer(reach_telemetry::assign_request_id())
            .layer(trace_layer);

        let router = Router::new()
            .route("/", get(index))
            .route(STATUS_PATH, get(status_data))
            .route("/health", get(health))
            .with_state(state);
        let router = match assets {
            Some(dir) => router.nest_service(ASSETS_PATH, ServeDir::new(dir)),
            None => router,
        };

        Self {
            router: router.layer(layered),
        }
    }

    /// Serve on `addr` until `shutdown` resolves.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener fails to bind or the server terminates
    /// unexpectedly.
    pub async fn serve<F>(self, addr: SocketAddr, shutdown: F) -> ApiServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ApiServerError::Bind { addr, source })?;
        info!(%addr, "dashboard listening");
        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|source| ApiServerError::Serve { source })
    }

    /// The fully layered router.
    #[must_use]
    pub fn into_router(self) -> Router {
        self.router
    }
}
