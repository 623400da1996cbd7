//! # Supplier API Handlers
//!
//! The public supplier directory and profile views, plus the supplier's own
//! dashboard profile and aggregate statistics. Public views never expose
//! login emails or credential material.

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::auth::SupplierAuth;
use crate::error::{ApiError, not_found};
use crate::models::company::{CompanyRole, Model as CompanyModel};
use crate::repositories::{
    CompanyRepository, InquiryRepository, ProductRepository, SupplierFilter, UpdateProfileRequest,
};
use crate::server::AppState;

/// A supplier as shown in the public directory
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SupplierDto {
    pub id: Uuid,
    #[schema(example = "Nusantara Aroma")]
    pub name: String,
    pub city: Option<String>,
    pub province: Option<String>,
    pub description: Option<String>,
    pub halal_certified: bool,
    pub has_coa: bool,
    pub has_msds: bool,
}

impl From<CompanyModel> for SupplierDto {
    fn from(company: CompanyModel) -> Self {
        Self {
            id: company.id,
            name: company.name,
            city: company.city,
            province: company.province,
            description: company.description,
            halal_certified: company.halal_certified,
            has_coa: company.has_coa,
            has_msds: company.has_msds,
        }
    }
}

/// The supplier's own profile as shown on the dashboard
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub description: Option<String>,
    pub halal_certified: bool,
    pub has_coa: bool,
    pub has_msds: bool,
}

impl From<CompanyModel> for ProfileDto {
    fn from(company: CompanyModel) -> Self {
        Self {
            id: company.id,
            name: company.name,
            email: company.email,
            phone: company.phone,
            address: company.address,
            city: company.city,
            province: company.province,
            description: company.description,
            halal_certified: company.halal_certified,
            has_coa: company.has_coa,
            has_msds: company.has_msds,
        }
    }
}

/// Partial update of the supplier profile. Email, role, and password are
/// not updatable through this endpoint.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateProfileDto {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub description: Option<String>,
    pub halal_certified: Option<bool>,
    pub has_coa: Option<bool>,
    pub has_msds: Option<bool>,
}

/// Per-status inquiry counts for the dashboard
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InquiryCountsDto {
    pub pending: u64,
    pub quoted: u64,
    pub accepted: u64,
    pub rejected: u64,
}

/// Aggregate dashboard statistics
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardStatsDto {
    pub product_count: u64,
    pub active_product_count: u64,
    pub inquiry_counts: InquiryCountsDto,
    pub total_inquiries: u64,
}

/// Query parameters for the supplier directory
#[derive(Debug, Deserialize, IntoParams)]
pub struct SupplierDirectoryQuery {
    /// Exact city filter
    pub city: Option<String>,
    /// Case-sensitive name substring filter
    pub q: Option<String>,
}

/// Public supplier directory
#[utoipa::path(
    get,
    path = "/api/v1/suppliers",
    params(SupplierDirectoryQuery),
    responses(
        (status = 200, description = "Suppliers ordered by name", body = [SupplierDto])
    ),
    tag = "suppliers"
)]
pub async fn list_suppliers(
    State(state): State<AppState>,
    Query(query): Query<SupplierDirectoryQuery>,
) -> Result<Json<Vec<SupplierDto>>, ApiError> {
    let repo = CompanyRepository::new(&state.db);
    let suppliers = repo
        .list_suppliers(SupplierFilter {
            city: query.city,
            q: query.q,
        })
        .await?;

    Ok(Json(suppliers.into_iter().map(SupplierDto::from).collect()))
}

/// Public supplier profile
#[utoipa::path(
    get,
    path = "/api/v1/suppliers/{id}",
    params(("id" = Uuid, Path, description = "Supplier UUID")),
    responses(
        (status = 200, description = "Supplier profile", body = SupplierDto),
        (status = 404, description = "No supplier with this id", body = ApiError)
    ),
    tag = "suppliers"
)]
pub async fn supplier_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SupplierDto>, ApiError> {
    let repo = CompanyRepository::new(&state.db);
    let supplier = repo
        .find_by_id(id)
        .await?
        .filter(|company| CompanyRole::parse(&company.role) == Some(CompanyRole::Supplier))
        .ok_or_else(|| not_found("Supplier not found"))?;

    Ok(Json(SupplierDto::from(supplier)))
}

/// The authenticated supplier's own profile
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/profile",
    responses(
        (status = 200, description = "Own profile", body = ProfileDto),
        (status = 401, description = "No active session", body = ApiError),
        (status = 403, description = "Supplier account required", body = ApiError)
    ),
    tag = "dashboard"
)]
pub async fn own_profile(
    State(state): State<AppState>,
    SupplierAuth(user): SupplierAuth,
) -> Result<Json<ProfileDto>, ApiError> {
    let repo = CompanyRepository::new(&state.db);
    let company = repo
        .find_by_id(user.id)
        .await?
        .ok_or_else(|| not_found("Account not found"))?;

    Ok(Json(ProfileDto::from(company)))
}

/// Update the authenticated supplier's profile
#[utoipa::path(
    put,
    path = "/api/v1/dashboard/profile",
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = ProfileDto),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "No active session", body = ApiError),
        (status = 403, description = "Supplier account required", body = ApiError)
    ),
    tag = "dashboard"
)]
pub async fn update_own_profile(
    State(state): State<AppState>,
    SupplierAuth(user): SupplierAuth,
    Json(request): Json<UpdateProfileDto>,
) -> Result<Json<ProfileDto>, ApiError> {
    let repo = CompanyRepository::new(&state.db);
    let company = repo
        .update_profile(
            user.id,
            UpdateProfileRequest {
                name: request.name,
                phone: request.phone,
                address: request.address,
                city: request.city,
                province: request.province,
                description: request.description,
                halal_certified: request.halal_certified,
                has_coa: request.has_coa,
                has_msds: request.has_msds,
            },
        )
        .await?;

    tracing::info!(supplier_id = %user.id, "Profile updated");

    Ok(Json(ProfileDto::from(company)))
}

/// Aggregate statistics for the supplier dashboard
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/stats",
    responses(
        (status = 200, description = "Product and inquiry counts", body = DashboardStatsDto),
        (status = 401, description = "No active session", body = ApiError),
        (status = 403, description = "Supplier account required", body = ApiError)
    ),
    tag = "dashboard"
)]
pub async fn dashboard_stats(
    State(state): State<AppState>,
    SupplierAuth(user): SupplierAuth,
) -> Result<Json<DashboardStatsDto>, ApiError> {
    let products = ProductRepository::new(&state.db);
    let (product_count, active_product_count) = products.count_for_supplier(user.id).await?;

    let inquiries = InquiryRepository::new(&state.db);
    let counts = inquiries.counts_for_supplier(user.id).await?;

    Ok(Json(DashboardStatsDto {
        product_count,
        active_product_count,
        inquiry_counts: InquiryCountsDto {
            pending: counts.pending,
            quoted: counts.quoted,
            accepted: counts.accepted,
            rejected: counts.rejected,
        },
        total_inquiries: counts.total(),
    }))
}
