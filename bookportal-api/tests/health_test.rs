/// Root, health, error envelope and middleware tests

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{request, TestContext};
use tower::Service as _;

#[tokio::test]
async fn test_root() {
    let ctx = TestContext::new();

    let (status, body) = ctx.send(request("GET", "/", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "API is working");
}

#[tokio::test]
async fn test_health_reports_unreachable_database() {
    let ctx = TestContext::new();

    let (status, body) = ctx.send(request("GET", "/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "disconnected");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_unknown_route_uses_error_envelope() {
    let ctx = TestContext::new();

    let (status, body) = ctx.send(request("GET", "/api/v1/nowhere", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_code"], "not_found");

    // Unknown paths under a protected prefix are not reported as auth failures
    let (status, _) = ctx.send(request("GET", "/api/v1/books/a/b/c", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_untrusted_host_is_rejected() {
    let ctx = TestContext::new();

    let response = ctx
        .app
        .clone()
        .call(
            Request::builder()
                .uri("/")
                .header(header::HOST, "evil.example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cors_allows_any_origin_with_credentials() {
    let ctx = TestContext::new();

    let response = ctx
        .app
        .clone()
        .call(
            Request::builder()
                .uri("/")
                .header(header::HOST, "localhost")
                .header(header::ORIGIN, "https://frontend.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "https://frontend.example"
    );
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .unwrap(),
        "true"
    );
}
