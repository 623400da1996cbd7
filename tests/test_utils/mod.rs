//! Test utilities for API testing.
//!
//! This module provides utilities for setting up in-memory SQLite databases
//! with migrations, assembling a full application router, and driving it
//! with `tower::ServiceExt::oneshot` requests.

// Not every suite uses every helper.
#![allow(dead_code)]

use anyhow::Result;
use aromara::config::AppConfig;
use aromara::server::{AppState, create_app};
use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode},
};
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use tempfile::TempDir;
use tower::ServiceExt;

/// Sets up an in-memory SQLite database with all migrations applied.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

/// Configuration suitable for router tests: test profile, uploads in a
/// temporary directory.
pub fn test_config(upload_dir: &TempDir) -> AppConfig {
    AppConfig {
        profile: "test".to_string(),
        upload_dir: upload_dir.path().to_string_lossy().into_owned(),
        ..Default::default()
    }
}

/// A fully wired application over an in-memory database.
pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
    pub upload_dir: TempDir,
}

impl TestApp {
    /// Spawn an app with the default test configuration.
    pub async fn spawn() -> Result<Self> {
        let upload_dir = TempDir::new()?;
        let config = test_config(&upload_dir);
        Self::spawn_with_config(config, upload_dir).await
    }

    /// Spawn an app with a custom configuration (the upload dir should point
    /// into the provided temp dir).
    pub async fn spawn_with_config(config: AppConfig, upload_dir: TempDir) -> Result<Self> {
        let db = setup_test_db().await?;
        let state = AppState::new(config, db.clone());
        let router = create_app(state);

        Ok(Self {
            router,
            db,
            upload_dir,
        })
    }

    /// Issue a request without a body.
    pub async fn get(&self, path: &str, cookie: Option<&str>) -> Response<Body> {
        self.request("GET", path, cookie, None).await
    }

    /// Issue a JSON request.
    pub async fn send_json(
        &self,
        method: &str,
        path: &str,
        cookie: Option<&str>,
        body: serde_json::Value,
    ) -> Response<Body> {
        self.request(method, path, cookie, Some(body)).await
    }

    async fn request(
        &self,
        method: &str,
        path: &str,
        cookie: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(cookie) = cookie {
            builder = builder.header("Cookie", cookie);
        }

        let request = match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Issue a raw request (custom headers/body, e.g. multipart uploads).
    pub async fn send_raw(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Register an account and return its session cookie pair (name=value).
    pub async fn register(&self, name: &str, email: &str, role: &str) -> Result<String> {
        let response = self
            .send_json(
                "POST",
                "/api/v1/auth/register",
                None,
                serde_json::json!({
                    "name": name,
                    "email": email,
                    "password": "rahasia-123",
                    "role": role,
                }),
            )
            .await;

        anyhow::ensure!(
            response.status() == StatusCode::CREATED,
            "registration failed with {}",
            response.status()
        );

        session_cookie(&response).ok_or_else(|| anyhow::anyhow!("no session cookie set"))
    }
}

/// Extract the `user` session cookie pair from a response's `Set-Cookie`.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    let header = response.headers().get("set-cookie")?.to_str().ok()?;
    let pair = header.split(';').next()?.trim();
    pair.starts_with("user=").then(|| pair.to_string())
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
