use anyhow::Context;
use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::LogConfig;
use crate::error::{method_not_allowed, route_not_found};
use crate::state::AppState;
use crate::{auth, users};

/// Installs the global subscriber; text by default, JSON lines when asked.
pub fn init_tracing(log: &LogConfig) {
    let builder = tracing_subscriber::fmt().with_env_filter(log.filter.as_str());
    if log.json {
        builder.with_target(false).json().init();
    } else {
        builder.init();
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "message": "User Management System" }))
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(health).fallback(method_not_allowed))
        .merge(users::router())
        .merge(auth::router())
        .fallback(route_not_found)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, ?latency, "response");
                        } else {
                            tracing::info!(%status, ?latency, "response");
                        }
                    },
                ),
        )
}

/// Binds to the configured address and serves until the listener fails.
pub async fn serve(state: AppState) -> anyhow::Result<()> {
    let addr = state.config.listen_addr;
    let app = build_app(state);

    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    axum::serve(listener, app).await?;
    Ok(())
}
