//! Integration tests for registration, login, logout, and the session
//! endpoint.

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

#[path = "test_utils/mod.rs"]
mod test_utils;
use test_utils::{TestApp, body_json, session_cookie};

#[tokio::test]
async fn register_establishes_a_session() -> Result<()> {
    let app = TestApp::spawn().await?;

    let response = app
        .send_json(
            "POST",
            "/api/v1/auth/register",
            None,
            json!({
                "name": "Nusantara Aroma",
                "email": "dewi@nusantara.co.id",
                "password": "rahasia-123",
                "role": "supplier",
                "city": "Surabaya",
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let cookie = session_cookie(&response).expect("session cookie is set");
    assert!(cookie.starts_with("user="));

    let body = body_json(response).await;
    assert_eq!(body["email"], "dewi@nusantara.co.id");
    assert_eq!(body["role"], "supplier");
    assert!(body.get("password_digest").is_none());

    // The cookie works against /me
    let me = app.get("/api/v1/auth/me", Some(&cookie)).await;
    assert_eq!(me.status(), StatusCode::OK);
    let me = body_json(me).await;
    assert_eq!(me["name"], "Nusantara Aroma");

    Ok(())
}

#[tokio::test]
async fn duplicate_email_conflicts() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.register("Nusantara Aroma", "dewi@nusantara.co.id", "supplier")
        .await?;

    let response = app
        .send_json(
            "POST",
            "/api/v1/auth/register",
            None,
            json!({
                "name": "Copycat",
                "email": "dewi@nusantara.co.id",
                "password": "rahasia-456",
                "role": "buyer",
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["code"], "CONFLICT");

    Ok(())
}

#[tokio::test]
async fn register_validates_role_and_password() -> Result<()> {
    let app = TestApp::spawn().await?;

    let bad_role = app
        .send_json(
            "POST",
            "/api/v1/auth/register",
            None,
            json!({
                "name": "Ops",
                "email": "ops@x.co.id",
                "password": "rahasia-123",
                "role": "admin",
            }),
        )
        .await;
    assert_eq!(bad_role.status(), StatusCode::BAD_REQUEST);

    let short_password = app
        .send_json(
            "POST",
            "/api/v1/auth/register",
            None,
            json!({
                "name": "Ops",
                "email": "ops@x.co.id",
                "password": "short",
                "role": "buyer",
            }),
        )
        .await;
    assert_eq!(short_password.status(), StatusCode::BAD_REQUEST);
    let body = body_json(short_password).await;
    assert_eq!(body["code"], "VALIDATION_FAILED");

    Ok(())
}

#[tokio::test]
async fn login_accepts_correct_credentials_only() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.register("Parfum Jakarta", "buyer@x.co.id", "buyer")
        .await?;

    let ok = app
        .send_json(
            "POST",
            "/api/v1/auth/login",
            None,
            json!({ "email": "buyer@x.co.id", "password": "rahasia-123" }),
        )
        .await;
    assert_eq!(ok.status(), StatusCode::OK);
    assert!(session_cookie(&ok).is_some());

    // Wrong password and unknown email are indistinguishable
    let wrong_password = app
        .send_json(
            "POST",
            "/api/v1/auth/login",
            None,
            json!({ "email": "buyer@x.co.id", "password": "rahasia-999" }),
        )
        .await;
    let unknown_email = app
        .send_json(
            "POST",
            "/api/v1/auth/login",
            None,
            json!({ "email": "nobody@x.co.id", "password": "rahasia-123" }),
        )
        .await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);

    let wrong_body = body_json(wrong_password).await;
    let unknown_body = body_json(unknown_email).await;
    assert_eq!(wrong_body["message"], unknown_body["message"]);

    Ok(())
}

#[tokio::test]
async fn logout_clears_the_cookie() -> Result<()> {
    let app = TestApp::spawn().await?;
    let cookie = app
        .register("Parfum Jakarta", "buyer@x.co.id", "buyer")
        .await?;

    let response = app
        .send_json("POST", "/api/v1/auth/logout", Some(&cookie), json!({}))
        .await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let set_cookie = response
        .headers()
        .get("set-cookie")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with("user="));
    assert!(set_cookie.contains("Max-Age=0"));

    Ok(())
}

#[tokio::test]
async fn me_requires_a_session() -> Result<()> {
    let app = TestApp::spawn().await?;

    let response = app.get("/api/v1/auth/me", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}
