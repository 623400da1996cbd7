//! # Account API Handlers
//!
//! This module contains handlers for registration, login, logout, and the
//! current-session endpoint. Login and registration both establish the
//! signed session cookie.

use axum::{extract::State, http::StatusCode, response::Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::error::{ApiError, unauthorized, validation_error};
use crate::models::company::{CompanyRole, Model as CompanyModel};
use crate::repositories::{CompanyRepository, RegisterCompanyRequest};
use crate::server::AppState;
use crate::session::{self, SessionUser};

/// Request payload for registering a company account
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequestDto {
    /// Company display name
    #[schema(example = "Nusantara Aroma")]
    pub name: String,
    /// Login email (unique)
    #[schema(example = "dewi@nusantara-aroma.co.id")]
    pub email: String,
    /// Password, at least 8 characters
    pub password: String,
    /// Account role: supplier|buyer
    #[schema(example = "supplier")]
    pub role: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
}

/// Request payload for logging in
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequestDto {
    pub email: String,
    pub password: String,
}

/// The account as returned by auth endpoints
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccountDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<&CompanyModel> for AccountDto {
    fn from(company: &CompanyModel) -> Self {
        Self {
            id: company.id,
            name: company.name.clone(),
            email: company.email.clone(),
            role: company.role.clone(),
        }
    }
}

fn session_for(company: &CompanyModel, ttl_seconds: u64) -> SessionUser {
    SessionUser {
        id: company.id,
        email: company.email.clone(),
        name: company.name.clone(),
        role: company.role.clone(),
        exp: Utc::now().timestamp() + ttl_seconds as i64,
    }
}

/// Register a new company account
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequestDto,
    responses(
        (status = 201, description = "Account created and session established", body = AccountDto),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 409, description = "Email already registered", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequestDto>,
) -> Result<(StatusCode, [(&'static str, String); 1], Json<AccountDto>), ApiError> {
    let Some(role) = CompanyRole::parse(&request.role) else {
        return Err(validation_error(
            "Invalid role",
            serde_json::json!({ "role": "Must be 'supplier' or 'buyer'" }),
        ));
    };

    let repo = CompanyRepository::new(&state.db);
    let company = repo
        .register(RegisterCompanyRequest {
            name: request.name,
            email: request.email,
            password: request.password,
            role,
            phone: request.phone,
            address: request.address,
            city: request.city,
            province: request.province,
        })
        .await?;

    tracing::info!(company_id = %company.id, role = %company.role, "Registered new account");

    let user = session_for(&company, state.config.session_ttl_seconds);
    let cookie = session::login_cookie(
        &user,
        &state.config.session_key(),
        state.config.session_ttl_seconds,
    );

    Ok((
        StatusCode::CREATED,
        [("Set-Cookie", cookie)],
        Json(AccountDto::from(&company)),
    ))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Session established", body = AccountDto),
        (status = 401, description = "Invalid credentials", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequestDto>,
) -> Result<([(&'static str, String); 1], Json<AccountDto>), ApiError> {
    let repo = CompanyRepository::new(&state.db);

    // Unknown email and wrong password produce the same response.
    let company = repo
        .authenticate(&request.email, &request.password)
        .await?
        .ok_or_else(|| unauthorized(Some("Invalid email or password")))?;

    tracing::info!(company_id = %company.id, "Login succeeded");

    let user = session_for(&company, state.config.session_ttl_seconds);
    let cookie = session::login_cookie(
        &user,
        &state.config.session_key(),
        state.config.session_ttl_seconds,
    );

    Ok(([("Set-Cookie", cookie)], Json(AccountDto::from(&company))))
}

/// Log out, clearing the session cookie
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses(
        (status = 204, description = "Session cleared")
    ),
    tag = "auth"
)]
pub async fn logout() -> (StatusCode, [(&'static str, String); 1]) {
    (
        StatusCode::NO_CONTENT,
        [("Set-Cookie", session::logout_cookie())],
    )
}

/// Current session user
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current session", body = AccountDto),
        (status = 401, description = "No active session", body = ApiError)
    ),
    tag = "auth"
)]
pub async fn me(CurrentUser(user): CurrentUser) -> Json<AccountDto> {
    Json(AccountDto {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
    })
}
