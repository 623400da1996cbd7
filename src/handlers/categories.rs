//! # Category API Handlers
//!
//! Public category listing plus supplier-gated taxonomy management.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::SupplierAuth;
use crate::error::ApiError;
use crate::models::product_category::Model as CategoryModel;
use crate::repositories::CategoryRepository;
use crate::server::AppState;

/// A product category
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryDto {
    pub id: Uuid,
    #[schema(example = "Essential Oils")]
    pub name: String,
    #[schema(example = "essential-oils")]
    pub slug: String,
}

impl From<CategoryModel> for CategoryDto {
    fn from(category: CategoryModel) -> Self {
        Self {
            id: category.id,
            name: category.name,
            slug: category.slug,
        }
    }
}

/// Request payload for creating or renaming a category
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryRequestDto {
    #[schema(example = "Essential Oils")]
    pub name: String,
}

/// List all categories
#[utoipa::path(
    get,
    path = "/api/v1/categories",
    responses(
        (status = 200, description = "Categories ordered by name", body = [CategoryDto])
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryDto>>, ApiError> {
    let repo = CategoryRepository::new(&state.db);
    let categories = repo.list().await?;

    Ok(Json(categories.into_iter().map(CategoryDto::from).collect()))
}

/// Create a category
#[utoipa::path(
    post,
    path = "/api/v1/categories",
    request_body = CategoryRequestDto,
    responses(
        (status = 201, description = "Category created", body = CategoryDto, headers(
            ("Location", description = "URL of the created category")
        )),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "No active session", body = ApiError),
        (status = 403, description = "Supplier account required", body = ApiError),
        (status = 409, description = "Slug already exists", body = ApiError)
    ),
    tag = "categories"
)]
pub async fn create_category(
    State(state): State<AppState>,
    SupplierAuth(user): SupplierAuth,
    Json(request): Json<CategoryRequestDto>,
) -> Result<(StatusCode, [(&'static str, String); 1], Json<CategoryDto>), ApiError> {
    let repo = CategoryRepository::new(&state.db);
    let category = repo.create(&request.name).await?;

    tracing::info!(category = %category.slug, by = %user.id, "Category created");

    let location = format!("/api/v1/categories/{}", category.id);

    Ok((
        StatusCode::CREATED,
        [("Location", location)],
        Json(CategoryDto::from(category)),
    ))
}

/// Rename a category
#[utoipa::path(
    put,
    path = "/api/v1/categories/{id}",
    params(("id" = Uuid, Path, description = "Category UUID")),
    request_body = CategoryRequestDto,
    responses(
        (status = 200, description = "Category renamed", body = CategoryDto),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 404, description = "Category not found", body = ApiError),
        (status = 409, description = "Slug already exists", body = ApiError)
    ),
    tag = "categories"
)]
pub async fn update_category(
    State(state): State<AppState>,
    SupplierAuth(_user): SupplierAuth,
    Path(id): Path<Uuid>,
    Json(request): Json<CategoryRequestDto>,
) -> Result<Json<CategoryDto>, ApiError> {
    let repo = CategoryRepository::new(&state.db);
    let category = repo.rename(id, &request.name).await?;

    Ok(Json(CategoryDto::from(category)))
}

/// Delete a category, detaching its products
#[utoipa::path(
    delete,
    path = "/api/v1/categories/{id}",
    params(("id" = Uuid, Path, description = "Category UUID")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found", body = ApiError)
    ),
    tag = "categories"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    SupplierAuth(user): SupplierAuth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = CategoryRepository::new(&state.db);
    repo.delete(id).await?;

    tracing::info!(category_id = %id, by = %user.id, "Category deleted");

    Ok(StatusCode::NO_CONTENT)
}
