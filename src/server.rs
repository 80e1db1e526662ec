use crate::app::batch_use_case::SharedOrchestrator;
use crate::constants::{ADDRESS_QUERY_KEY, TITLE_ROUTE};
use crate::error::Result;
use crate::report::{self, BAD_REQUEST_PAGE, NOT_FOUND_PAGE, SERVER_ERROR_PAGE};
use axum::{
    extract::RawQuery,
    http::{header, Method, StatusCode},
    response::{Html, IntoResponse, Json},
    routing::get,
    Extension, Router,
};
use hyper::Server;
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "title_fetcher",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn metrics_snapshot() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        crate::metrics::render().unwrap_or_default(),
    )
}

/// Every `address` value in query order; a bare `address` key counts as an empty entry.
pub fn addresses_from_query(query: Option<&str>) -> Vec<Option<String>> {
    query
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .filter(|(key, _)| key == ADDRESS_QUERY_KEY)
                .map(|(_, value)| Some(value.into_owned()))
                .collect()
        })
        .unwrap_or_default()
}

async fn titles(
    Extension(orchestrator): Extension<SharedOrchestrator>,
    RawQuery(query): RawQuery,
) -> (StatusCode, Html<String>) {
    let raw = addresses_from_query(query.as_deref());
    match orchestrator.handle_batch(raw).await {
        Ok(batch) => (StatusCode::OK, Html(report::render_html(&batch))),
        Err(e) if e.is_client_error() => {
            warn!("Rejected title request: {}", e);
            (StatusCode::BAD_REQUEST, Html(BAD_REQUEST_PAGE.to_string()))
        }
        Err(e) => {
            error!("Title batch failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Html(SERVER_ERROR_PAGE.to_string()))
        }
    }
}

async fn not_found() -> (StatusCode, Html<&'static str>) {
    (StatusCode::NOT_FOUND, Html(NOT_FOUND_PAGE))
}

/// Create the HTTP router with all routes
pub fn create_server(orchestrator: SharedOrchestrator) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route(TITLE_ROUTE, get(titles))
        .route("/health", get(health))
        .route("/metrics", get(metrics_snapshot))
        .fallback(not_found)
        .layer(Extension(orchestrator))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
}

/// Bind the listener on `port` and serve until Ctrl-C.
pub async fn start_server(orchestrator: SharedOrchestrator, port: u16) -> Result<()> {
    let app = create_server(orchestrator);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("HTTP server running on http://localhost:{port}");
    info!("Titles:       http://localhost:{port}{TITLE_ROUTE}?address=example.com");
    info!("Health check: http://localhost:{port}/health");

    Server::try_bind(&addr)?
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addresses_from_query() {
        assert_eq!(
            addresses_from_query(Some("address=a.com&x=1&address=b.com%2Fpath&address=")),
            vec![Some("a.com".to_string()), Some("b.com/path".to_string()), Some(String::new())]
        );
        assert!(addresses_from_query(Some("other=1")).is_empty());
        assert!(addresses_from_query(None).is_empty());
    }
}
