//! HTTP server facade for shelf with Axum, error envelopes, and OpenAPI support.

use std::time::Instant;

use anyhow::Context;
use axum::{extract::Request, routing::get, Json, Router};
use once_cell::sync::Lazy;
use serde_json::json;
use tower_http::normalize_path::NormalizePath;

use shelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

pub mod error;
pub mod response;
pub mod router;

pub use error::{AppError, AppResult};
pub use response::{ApiJson, ApiResponse};

use router::RouterBuilder;

static STARTED_AT: Lazy<Instant> = Lazy::new(Instant::now);

/// The assembled application: the router behind trailing-slash trimming,
/// so `/api/books/` routes like `/api/books`
pub type App = NormalizePath<Router>;

/// Start the HTTP server with the given module registry
///
/// Runs until ctrl-c, then stops every module in reverse order.
pub async fn start_server(registry: &ModuleRegistry, settings: &Settings) -> anyhow::Result<()> {
    let ctx = InitCtx { settings };
    registry
        .start_all(&ctx)
        .await
        .context("failed to start modules")?;

    let app = build_router(registry, settings);

    let address = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind to {address}"))?;

    tracing::info!("HTTP server listening on http://{}", address);

    axum::serve(listener, axum::ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    registry
        .stop_all()
        .await
        .context("failed to stop modules")?;

    Ok(())
}

/// Build the main HTTP application with all module routes mounted
pub fn build_router(registry: &ModuleRegistry, settings: &Settings) -> App {
    Lazy::force(&STARTED_AT);

    let environment = settings.environment.as_str();

    let mut router_builder = RouterBuilder::new()
        .with_tracing()
        .with_cors()
        .with_request_id()
        .with_catch_panic()
        .with_timeout(settings.server.request_timeout_ms)
        .with_body_limit(settings.server.body_limit_bytes)
        .with_error_details(settings.expose_error_details())
        .route("/", get(welcome))
        .route("/health", get(move || health_check(environment)));

    for module in registry.modules() {
        tracing::info!(
            module = module.name(),
            "mounting module routes under /api/{}",
            module.name()
        );
        router_builder = router_builder.mount_module(module.name(), module.routes());
    }

    let router = router_builder.with_openapi(registry).build();
    NormalizePath::trim_trailing_slash(router)
}

async fn health_check(environment: &'static str) -> Json<serde_json::Value> {
    Json(json!({
        "status": "OK",
        "timestamp": chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        "uptime": STARTED_AT.elapsed().as_secs_f64(),
        "environment": environment,
    }))
}

async fn welcome() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Welcome to the shelf book catalogue API",
        "version": env!("CARGO_PKG_VERSION"),
        "documentation": {
            "endpoints": "/api-docs",
            "health": "/health"
        }
    }))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
