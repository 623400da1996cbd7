//! # Session Gate and Authorization
//!
//! This module provides the request gate that runs on every incoming
//! request: it decodes the signed session cookie, redirects unauthenticated
//! requests to protected pages to the login page (preserving the original
//! path), and keeps each role out of the other role's section. Handlers
//! consume the session through the [`CurrentUser`], [`SupplierAuth`], and
//! [`BuyerAuth`] extractors.

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{HeaderMap, header::COOKIE, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::config::AppConfig;
use crate::error::{ApiError, forbidden, unauthorized};
use crate::models::company::CompanyRole;
use crate::server::AppState;
use crate::session::{self, SessionUser};

/// Path prefixes that never require a session. `/` matches exactly; every
/// other entry matches as a prefix.
const PUBLIC_PREFIXES: &[&str] = &[
    "/login",
    "/register",
    "/products",
    "/suppliers",
    "/categories",
    "/recommendations",
    "/uploads",
    "/healthz",
    "/docs",
    "/openapi.json",
    "/api/v1/auth",
    "/api/v1/products",
    "/api/v1/suppliers",
    "/api/v1/categories",
    "/api/v1/recommendations",
];

/// Page section reserved for suppliers.
const SUPPLIER_SECTION: &str = "/dashboard";

/// Page section reserved for buyers.
const BUYER_SECTION: &str = "/account";

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        Arc::clone(&app_state.config)
    }
}

/// Extractor for the authenticated session user.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub SessionUser);

/// Extractor that additionally requires the supplier role.
#[derive(Debug, Clone)]
pub struct SupplierAuth(pub SessionUser);

/// Extractor that additionally requires the buyer role.
#[derive(Debug, Clone)]
pub struct BuyerAuth(pub SessionUser);

fn is_public(path: &str) -> bool {
    path == "/" || PUBLIC_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

fn is_api(path: &str) -> bool {
    path.starts_with("/api/")
}

/// Section of the path tree the request targets, if it is role-restricted.
fn restricted_to(path: &str) -> Option<CompanyRole> {
    if path.starts_with(SUPPLIER_SECTION) || path.starts_with("/api/v1/dashboard") {
        Some(CompanyRole::Supplier)
    } else if path.starts_with(BUYER_SECTION) || path.starts_with("/api/v1/account") {
        Some(CompanyRole::Buyer)
    } else {
        None
    }
}

fn decode_session(headers: &HeaderMap, key: &[u8]) -> Option<SessionUser> {
    headers
        .get(COOKIE)
        .and_then(|header| header.to_str().ok())
        .and_then(session::cookie_value)
        .and_then(|value| session::decode(value, key))
}

/// Build the login redirect preserving the original path (and query) in the
/// `redirect` parameter.
fn login_redirect(original: &str) -> Response {
    let encoded: String = url::form_urlencoded::byte_serialize(original.as_bytes()).collect();
    Redirect::to(&format!("/login?redirect={}", encoded)).into_response()
}

/// Session gate middleware applied to the whole router.
///
/// A malformed, tampered, or expired cookie is treated exactly like an
/// absent one: browsers land on the login page, API clients get 401.
pub async fn session_gate(
    State(config): State<Arc<AppConfig>>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let original = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| path.clone());

    let key = config.session_key();
    let user = decode_session(request.headers(), &key);

    if let Some(user) = &user {
        request.extensions_mut().insert(CurrentUser(user.clone()));
    }

    if is_public(&path) {
        return next.run(request).await;
    }

    let Some(user) = user else {
        if is_api(&path) {
            return unauthorized(None).into_response();
        }
        return login_redirect(&original);
    };

    if let Some(required) = restricted_to(&path) {
        let actual = user.company_role();
        if actual != Some(required) {
            if is_api(&path) {
                let message = match required {
                    CompanyRole::Supplier => "Supplier account required",
                    CompanyRole::Buyer => "Buyer account required",
                };
                return forbidden(Some(message)).into_response();
            }
            // Send the user to their own section instead of an error page.
            let destination = match required {
                CompanyRole::Supplier => BUYER_SECTION,
                CompanyRole::Buyer => SUPPLIER_SECTION,
            };
            return Redirect::to(destination).into_response();
        }
    }

    tracing::debug!(user_id = %user.id, role = %user.role, %path, "Authenticated request");
    next.run(request).await
}

impl<S> FromRequestParts<S> for CurrentUser
where
    Arc<AppConfig>: FromRef<S>,
    S: Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| unauthorized(None))
    }
}

impl<S> FromRequestParts<S> for SupplierAuth
where
    Arc<AppConfig>: FromRef<S>,
    S: Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        match user.company_role() {
            Some(CompanyRole::Supplier) => Ok(SupplierAuth(user)),
            _ => Err(forbidden(Some("Supplier account required"))),
        }
    }
}

impl<S> FromRequestParts<S> for BuyerAuth
where
    Arc<AppConfig>: FromRef<S>,
    S: Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        match user.company_role() {
            Some(CompanyRole::Buyer) => Ok(BuyerAuth(user)),
            _ => Err(forbidden(Some("Buyer account required"))),
        }
    }
}
