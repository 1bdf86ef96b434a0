//! HTTP host for the calculator.
//!
//! Runtime execution order of the middleware stack (outermost -> innermost):
//!   1. `SetRequestId`       - generate or keep `x-request-id`
//!   2. `PropagateRequestId` - echo the id on the response
//!   3. Trace                - one span per request
//!   4. Timeout              - 504 when the budget is exceeded
//!   5. `BodyLimit`          - oversize bodies are rejected by the JSON extractor
//!   6. CORS                 - if enabled
//!   7. Router

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::{Json, Router};
use expr_calculator::{Service, register_routes};
use http::StatusCode;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::field::Empty;

use crate::config::AppConfig;
use crate::{cors, request_id, shutdown};

#[allow(clippy::unused_async)]
async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn apply_trace_layer(router: Router) -> Router {
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(|req: &http::Request<axum::body::Body>| {
                let rid = req
                    .headers()
                    .get(request_id::header())
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("n/a");

                tracing::info_span!(
                    "http_request",
                    method = %req.method(),
                    path = %req.uri().path(),
                    request_id = %rid,
                    status = Empty,
                    latency_ms = Empty,
                )
            })
            .on_response(
                |res: &http::Response<axum::body::Body>,
                 latency: Duration,
                 span: &tracing::Span| {
                    span.record("status", res.status().as_u16());
                    span.record("latency_ms", latency.as_millis());
                    tracing::info!(parent: span, "request completed");
                },
            ),
    )
}

/// Build the full application router: calculator routes, health endpoints and
/// the middleware stack.
///
/// # Errors
/// Returns an error if the CORS settings are invalid.
pub fn build_router(config: &AppConfig) -> Result<Router> {
    let service = Arc::new(Service::new(&config.calculator));

    let mut router = Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(|| async { "ok" }));
    router = register_routes(router, service);

    // Layers are registered innermost first.
    if config.cors.enabled {
        router = router.layer(cors::build_cors_layer(&config.cors)?);
    }

    router = router.layer(DefaultBodyLimit::max(config.server.body_limit_bytes));

    router = router.layer(TimeoutLayer::with_status_code(
        StatusCode::GATEWAY_TIMEOUT,
        Duration::from_millis(config.server.request_timeout_ms),
    ));

    router = apply_trace_layer(router);

    let x_request_id = request_id::header();
    router = router.layer(PropagateRequestIdLayer::new(x_request_id.clone()));
    router = router.layer(SetRequestIdLayer::new(x_request_id, request_id::MakeReqId));

    Ok(router)
}

/// Bind and serve until `cancel` fires.
///
/// # Errors
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(config: &AppConfig, cancel: CancellationToken) -> Result<()> {
    let router = build_router(config)?;
    let addr = config.server.socket_addr()?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server bound on {}", listener.local_addr()?);

    let shutdown = async move {
        cancel.cancelled().await;
        tracing::info!("HTTP server shutting down gracefully (cancellation)");
    };

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| anyhow::anyhow!(e))
}

/// Run the server until Ctrl+C or SIGTERM.
///
/// # Errors
/// Returns an error if the server fails to start or stops abnormally.
pub async fn run(config: &AppConfig) -> Result<()> {
    let cancel = CancellationToken::new();

    let cancel_for_signals = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = shutdown::wait_for_shutdown().await {
            tracing::warn!(
                error = %e,
                "shutdown: primary waiter failed, falling back to ctrl_c()"
            );
            let _ = tokio::signal::ctrl_c().await;
        }
        cancel_for_signals.cancel();
    });

    let result = serve(config, cancel).await;
    tracing::info!("Server stopped");
    result
}
