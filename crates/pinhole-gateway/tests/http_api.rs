//! In-process tests of the HTTP surface.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{ACCEPT, CONTENT_TYPE, LOCATION};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use pinhole_core::store::Result as StoreResult;
use pinhole_core::{KvStore, StoreError};
use pinhole_gateway::{App, AppState};
use pinhole_generator::HashGenerator;
use pinhole_resolver::ResolverService;
use pinhole_storage::InMemoryStore;
use serde_json::{json, Value};
use tower::ServiceExt;

const BASE_URL: &str = "http://sho.rt";

/// A store whose backend is down.
struct UnavailableStore;

#[async_trait]
impl KvStore for UnavailableStore {
    async fn get(&self, _key: &str) -> StoreResult<Option<String>> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn set(&self, _key: &str, _value: &str) -> StoreResult<()> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn set_if_absent(&self, _key: &str, _value: &str) -> StoreResult<bool> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn ping(&self) -> StoreResult<()> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

fn router_on(store: Arc<dyn KvStore>) -> Router {
    let resolver = ResolverService::new(Arc::clone(&store), HashGenerator::default());
    App::router(AppState::new(Arc::new(resolver), store, BASE_URL))
}

fn test_router() -> (Router, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    (router_on(store.clone()), store)
}

struct Reply {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Reply {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    fn text(&self) -> String {
        String::from_utf8(self.body.clone()).unwrap()
    }

    fn content_type(&self) -> &str {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }
}

async fn send(router: &Router, request: Request<Body>) -> Reply {
    let response = router.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();

    Reply {
        status,
        headers,
        body,
    }
}

async fn shorten(router: &Router, payload: Value) -> Reply {
    let request = Request::builder()
        .method("POST")
        .uri("/shorten")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
        .unwrap();
    send(router, request).await
}

async fn get(router: &Router, uri: &str, accept: Option<&str>) -> Reply {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(accept) = accept {
        builder = builder.header(ACCEPT, accept);
    }
    send(router, builder.body(Body::empty()).unwrap()).await
}

#[tokio::test]
async fn shorten_returns_short_url() {
    let (router, _) = test_router();

    let reply = shorten(&router, json!({ "url": "https://example.com/page" })).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(
        reply.json(),
        json!({
            "short_url": "http://sho.rt/uOYtaEV0",
            "original_url": "https://example.com/page",
        })
    );
}

#[tokio::test]
async fn shorten_is_idempotent() {
    let (router, store) = test_router();

    let first = shorten(&router, json!({ "url": "https://example.com" })).await;
    let second = shorten(&router, json!({ "url": "https://example.com" })).await;

    assert_eq!(first.json(), second.json());
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn short_code_redirects() {
    let (router, _) = test_router();
    shorten(&router, json!({ "url": "https://example.com/page" })).await;

    let reply = get(&router, "/uOYtaEV0", None).await;

    assert_eq!(reply.status, StatusCode::FOUND);
    assert_eq!(
        reply.headers.get(LOCATION).unwrap(),
        "https://example.com/page"
    );
}

#[tokio::test]
async fn unknown_code_is_html_404_by_default() {
    let (router, _) = test_router();

    let reply = get(&router, "/zzzzzz", None).await;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert!(reply.content_type().starts_with("text/html"));
    assert!(reply.text().contains("404 - Not Found"));
}

#[tokio::test]
async fn unknown_code_is_json_404_for_api_clients() {
    let (router, _) = test_router();

    let reply = get(&router, "/zzzzzz", Some("application/json")).await;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(
        reply.json(),
        json!({
            "error": "Not Found",
            "message": "The requested resource was not found.",
        })
    );
}

#[tokio::test]
async fn browser_accept_gets_html_404() {
    let (router, _) = test_router();

    let reply = get(&router, "/zzzzzz", Some("text/html,application/json;q=0.9")).await;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert!(reply.content_type().starts_with("text/html"));
}

#[tokio::test]
async fn malformed_code_is_not_found() {
    let (router, store) = test_router();

    for uri in ["/not-a-code", "/favicon.ico", "/abcdefghijkl"] {
        let reply = get(&router, uri, Some("application/json")).await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND, "{uri}");
    }

    assert!(store.is_empty());
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let (router, _) = test_router();

    let reply = get(&router, "/a/b", None).await;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert!(reply.text().contains("404 - Not Found"));
}

#[tokio::test]
async fn shorten_requires_url_field() {
    let (router, _) = test_router();

    let reply = shorten(&router, json!({ "link": "https://example.com" })).await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.json()["message"], "URL is required in JSON payload");
}

#[tokio::test]
async fn shorten_rejects_malformed_payloads() {
    let (router, _) = test_router();

    let not_json = Request::builder()
        .method("POST")
        .uri("/shorten")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    assert_eq!(send(&router, not_json).await.status, StatusCode::BAD_REQUEST);

    let no_content_type = Request::builder()
        .method("POST")
        .uri("/shorten")
        .body(Body::from(r#"{"url":"https://example.com"}"#))
        .unwrap();
    assert_eq!(
        send(&router, no_content_type).await.status,
        StatusCode::BAD_REQUEST
    );

    let reply = shorten(&router, json!({ "url": 42 })).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn shorten_rejects_invalid_urls() {
    let (router, store) = test_router();

    for url in ["", "example.com", "ftp://example.com/file", "https://"] {
        let reply = shorten(&router, json!({ "url": url })).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST, "{url}");
        assert_eq!(reply.json()["error"], "Bad Request");
    }

    assert!(store.is_empty());
}

#[tokio::test]
async fn exhausted_allocation_is_500() {
    let (router, store) = test_router();
    for (i, code) in ["uOYtaEV0", "ljXDSDhn", "TrtO6YeP", "bhcGk8iez", "blmKMmxNh"]
        .iter()
        .enumerate()
    {
        store
            .set(&format!("short:{code}"), &format!("https://other-{i}.example"))
            .await
            .unwrap();
    }

    let reply = shorten(&router, json!({ "url": "https://example.com/page" })).await;

    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(reply.json()["error"], "Internal Server Error");
}

#[tokio::test]
async fn unredirectable_target_is_negotiated_500() {
    let (router, store) = test_router();
    store.set("short:bad", "not a url\u{1}").await.unwrap();

    let reply = get(&router, "/bad", None).await;
    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(reply.content_type().starts_with("text/html"));
    assert!(reply.text().contains("500 - Internal Server Error"));

    let reply = get(&router, "/bad", Some("application/json")).await;
    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        reply.json(),
        json!({
            "error": "Internal Server Error",
            "message": "Something went wrong on our end.",
        })
    );
}

#[tokio::test]
async fn store_outage_is_503() {
    let router = router_on(Arc::new(UnavailableStore));

    let reply = shorten(&router, json!({ "url": "https://example.com" })).await;
    assert_eq!(reply.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(reply.json()["error"], "Service Unavailable");

    let reply = get(&router, "/uOYtaEV0", Some("application/json")).await;
    assert_eq!(reply.status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(reply.text().contains("Service Unavailable"));
    assert!(reply.content_type().starts_with("text/html"));
}

#[tokio::test]
async fn health_reports_store_state() {
    let (router, _) = test_router();
    let reply = get(&router, "/health", None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json(), json!({ "status": "ok" }));

    let router = router_on(Arc::new(UnavailableStore));
    let reply = get(&router, "/health", None).await;
    assert_eq!(reply.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(reply.json(), json!({ "status": "unavailable" }));
}

#[tokio::test]
async fn index_serves_front_page() {
    let (router, _) = test_router();

    let reply = get(&router, "/", None).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.content_type().starts_with("text/html"));
    assert!(reply.text().contains("shorten-form"));
}
