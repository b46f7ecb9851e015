use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth;
use crate::state::AppState;

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(auth::router())
        .route("/health", get(|| async { "ok" }))
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
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
