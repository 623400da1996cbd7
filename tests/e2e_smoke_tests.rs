//! Smoke tests for the service plumbing: root info, health probe, and the
//! OpenAPI document.

use anyhow::Result;
use axum::http::StatusCode;

#[path = "test_utils/mod.rs"]
mod test_utils;
use test_utils::{TestApp, body_json};

#[tokio::test]
async fn root_reports_service_info() -> Result<()> {
    let app = TestApp::spawn().await?;

    let response = app.get("/", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["service"], "aromara");
    assert!(body["version"].is_string());

    Ok(())
}

#[tokio::test]
async fn healthz_reports_ok_with_a_live_database() -> Result<()> {
    let app = TestApp::spawn().await?;

    let response = app.get("/healthz", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");

    Ok(())
}

#[tokio::test]
async fn openapi_document_is_served() -> Result<()> {
    let app = TestApp::spawn().await?;

    let response = app.get("/openapi.json", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["info"]["title"], "Aromara API");
    assert!(
        body["paths"]
            .as_object()
            .unwrap()
            .contains_key("/api/v1/products")
    );

    Ok(())
}

#[tokio::test]
async fn error_responses_carry_a_trace_id() -> Result<()> {
    let app = TestApp::spawn().await?;

    let response = app.get("/api/v1/dashboard/stats", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key("x-trace-id"));

    let body = body_json(response).await;
    assert!(body["trace_id"].is_string());

    Ok(())
}
