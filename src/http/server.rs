//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the media and health handlers
//! - Wire up middleware (concurrency cap, request ID, tracing, timeout)
//! - Serve on a plain TCP listener or behind rustls
//! - Hand each media request to the pipeline and record the outcome

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use axum_server::tls_rustls::RustlsConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::EdgeConfig;
use crate::http::request::{EdgeRequest, MakeEdgeRequestId, X_REQUEST_ID};
use crate::lifecycle::shutdown::wait_for_shutdown;
use crate::observability::metrics;
use crate::pipeline::EdgePipeline;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<EdgePipeline>,
}

/// HTTP server for the edge node.
pub struct EdgeServer {
    router: Router,
    config: EdgeConfig,
}

impl EdgeServer {
    /// Create a server whose pipeline talks to the configured backend over HTTP.
    pub fn new(config: EdgeConfig) -> Result<Self, reqwest::Error> {
        let pipeline = EdgePipeline::from_config(&config)?;
        Ok(Self::with_pipeline(config, pipeline))
    }

    /// Create a server around an already-built pipeline.
    pub fn with_pipeline(config: EdgeConfig, pipeline: EdgePipeline) -> Self {
        let state = AppState {
            pipeline: Arc::new(pipeline),
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// A request that outlives `timeouts.request_secs` is answered with 504,
    /// the same status an origin header timeout produces.
    fn build_router(config: &EdgeConfig, state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/{*path}", get(media_handler))
            .route("/", get(media_handler))
            .with_state(state)
            .layer(TimeoutLayer::with_status_code(
                StatusCode::GATEWAY_TIMEOUT,
                Duration::from_secs(config.timeouts.request_secs),
            ))
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get(X_REQUEST_ID)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("unknown");
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        path = %request.uri().path(),
                        request_id = %request_id,
                    )
                }),
            )
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeEdgeRequestId))
            .layer(GlobalConcurrencyLimitLayer::new(
                config.listener.max_concurrent_requests,
            ))
    }

    /// The fully layered router, e.g. for serving it on a custom listener.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, accepting connections on `listener`.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(wait_for_shutdown(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Run the server behind TLS until `shutdown` fires.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let handle = axum_server::Handle::new();
        let grace = Duration::from_secs(self.config.timeouts.shutdown_grace_secs);

        let shutdown_handle = handle.clone();
        tokio::spawn(async move {
            wait_for_shutdown(shutdown).await;
            shutdown_handle.graceful_shutdown(Some(grace));
        });

        tracing::info!(address = %addr, "HTTPS server starting");
        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &EdgeConfig {
        &self.config
    }
}

/// Liveness probe; never touches upstreams.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Media handler.
/// Runs the pipeline and maps terminal errors to responses.
async fn media_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let (parts, _body) = request.into_parts();
    let request = EdgeRequest::from_parts(&parts);
    let kind = request.kind();

    tracing::debug!(
        request_id = %request.request_id,
        path = %request.path,
        kind = %kind,
        "Handling media request"
    );

    match state.pipeline.handle(&request).await {
        Ok(response) => {
            metrics::record_request(kind.as_str(), response.status().as_u16(), start);
            response
        }
        Err(e) => {
            let status = e.status_code();
            if status.is_server_error() {
                tracing::error!(
                    request_id = %request.request_id,
                    status = %status,
                    outcome = e.outcome(),
                    error = %e,
                    "Request failed"
                );
            } else {
                tracing::debug!(
                    request_id = %request.request_id,
                    status = %status,
                    outcome = e.outcome(),
                    "Request rejected"
                );
            }
            metrics::record_request(e.outcome(), status.as_u16(), start);
            e.into_response()
        }
    }
}
