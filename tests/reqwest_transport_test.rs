//! Exercises the reqwest adapter against a throwaway local site.

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;
use std::time::Duration;
use title_fetcher::app::ports::HttpClientPort;
use title_fetcher::infra::http_client::ReqwestHttp;
use title_fetcher::{Address, ConcurrencyLimit, BatchOrchestrator, FetchOutcome, NoResponseReason, TitleFetcher};

fn redirect(to: &'static str) -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, to)])
}

async fn spawn_site() -> SocketAddr {
    let app = Router::new()
        .route("/", get(|| async { Html("<html><head><TITLE>Local Home</TITLE></head></html>") }))
        .route("/untitled", get(|| async { Html("<p>nothing here</p>") }))
        .route("/hop", get(|| async { redirect("/") }))
        .route("/loop", get(|| async { redirect("/loop") }))
        .route("/boom", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
        .route("/created", get(|| async { (StatusCode::CREATED, Html("<title>Made</title>")) }))
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Html("<title>Too Late</title>")
            }),
        )
        .route(
            "/agent",
            get(|headers: axum::http::HeaderMap| async move {
                let agent = headers
                    .get(header::USER_AGENT)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                Html(format!("<title>{}</title>", if agent.contains("Mozilla/5.0") { "browser" } else { "bot" }))
            }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        hyper::Server::from_tcp(listener)
            .unwrap()
            .serve(app.into_make_service())
            .await
            .unwrap();
    });
    addr
}

fn fetcher(timeout: Duration) -> TitleFetcher<dyn HttpClientPort> {
    let http: Arc<dyn HttpClientPort> = Arc::new(ReqwestHttp::new().unwrap());
    TitleFetcher::new(http, timeout, 5)
}

#[tokio::test]
async fn test_real_transport_outcomes() {
    let addr = spawn_site().await;
    let f = fetcher(Duration::from_millis(500));
    let at = |path: &str| Address::new(format!("{addr}{path}"));

    assert_eq!(f.fetch(&at("/")).await, FetchOutcome::Title("Local Home".into()));
    assert_eq!(f.fetch(&at("/hop")).await, FetchOutcome::Title("Local Home".into()));
    assert_eq!(f.fetch(&at("/agent")).await, FetchOutcome::Title("browser".into()));
    assert_eq!(f.fetch(&at("/untitled")).await, NoResponseReason::NoTitleFound.into());
    assert_eq!(f.fetch(&at("/boom")).await, NoResponseReason::StatusCode(500).into());
    assert_eq!(f.fetch(&at("/created")).await, NoResponseReason::StatusCode(201).into());
    assert_eq!(f.fetch(&at("/missing")).await, NoResponseReason::StatusCode(404).into());
    assert_eq!(f.fetch(&at("/loop")).await, NoResponseReason::TooManyRedirects.into());
    assert_eq!(f.fetch(&at("/slow")).await, NoResponseReason::Timeout.into());
}

#[tokio::test]
async fn test_refused_connection_is_invalid_address() {
    let closed = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let f = fetcher(Duration::from_secs(2));
    assert_eq!(
        f.fetch(&Address::new(format!("http://{closed}/"))).await,
        NoResponseReason::InvalidAddress.into()
    );
    assert_eq!(
        f.fetch(&Address::new("http://[not a host")).await,
        NoResponseReason::InvalidAddress.into()
    );
}

#[tokio::test]
async fn test_batch_over_real_transport_keeps_order() {
    let addr = spawn_site().await;
    let orch = BatchOrchestrator::new(fetcher(Duration::from_millis(500)), ConcurrencyLimit::Unbounded);
    let raw = vec![format!("{addr}/slow"), format!("{addr}/hop"), format!("{addr}/boom")];

    let batch = orch.handle_batch(raw.clone()).await.unwrap();
    assert_eq!(
        batch.rendered_lines(),
        vec![
            format!("{} - NO RESPONSE (Timeout)", raw[0]),
            format!("{} - \"Local Home\"", raw[1]),
            format!("{} - NO RESPONSE (Status Code: 500)", raw[2]),
        ]
    );
}
