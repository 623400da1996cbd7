//! # Product API Handlers
//!
//! Public product browsing plus the supplier dashboard's product CRUD.
//! Browse and detail only ever expose active products; dashboard endpoints
//! are scoped to the authenticated supplier's own listings.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::auth::SupplierAuth;
use crate::error::{ApiError, not_found, validation_error};
use crate::models::product::Model as ProductModel;
use crate::repositories::{
    BrowseFilter, CreateProductRequest, ProductDetail, ProductListing, ProductRepository,
    UpdateProductRequest,
};
use crate::server::AppState;

use super::types::{PaginatedResponse, decode_cursor, double_option, encode_cursor};

/// Default number of products per browse page
const DEFAULT_PAGE_SIZE: u64 = 20;

/// Maximum number of products per browse page
const MAX_PAGE_SIZE: u64 = 100;

/// A product as shown in public browse results
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductListingDto {
    pub id: Uuid,
    #[schema(example = "Patchouli Oil (Dark)")]
    pub name: String,
    /// Unit price in integer rupiah
    #[schema(example = 850000)]
    pub price_idr: i64,
    #[schema(example = "kg")]
    pub unit: String,
    pub stock_qty: i32,
    pub min_order_qty: i32,
    pub category_slug: Option<String>,
    pub supplier_id: Uuid,
    pub supplier_name: String,
    pub primary_image_url: Option<String>,
}

impl From<ProductListing> for ProductListingDto {
    fn from(listing: ProductListing) -> Self {
        Self {
            id: listing.product.id,
            name: listing.product.name,
            price_idr: listing.product.price_idr,
            unit: listing.product.unit,
            stock_qty: listing.product.stock_qty,
            min_order_qty: listing.product.min_order_qty,
            category_slug: listing.category_slug,
            supplier_id: listing.product.supplier_id,
            supplier_name: listing.supplier_name,
            primary_image_url: listing.primary_image_url,
        }
    }
}

/// An image belonging to a product
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductImageDto {
    pub id: Uuid,
    pub url: String,
    pub is_primary: bool,
    pub sort_order: i32,
}

impl From<crate::models::product_image::Model> for ProductImageDto {
    fn from(image: crate::models::product_image::Model) -> Self {
        Self {
            id: image.id,
            url: image.url,
            is_primary: image.is_primary,
            sort_order: image.sort_order,
        }
    }
}

/// Supplier summary embedded in a product detail
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductSupplierDto {
    pub id: Uuid,
    pub name: String,
    pub city: Option<String>,
    pub province: Option<String>,
    pub halal_certified: bool,
    pub has_coa: bool,
    pub has_msds: bool,
}

/// Full public product detail
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductDetailDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price_idr: i64,
    pub unit: String,
    pub stock_qty: i32,
    pub min_order_qty: i32,
    pub category_slug: Option<String>,
    pub category_name: Option<String>,
    pub supplier: ProductSupplierDto,
    pub images: Vec<ProductImageDto>,
    pub created_at: DateTime<FixedOffset>,
}

impl From<ProductDetail> for ProductDetailDto {
    fn from(detail: ProductDetail) -> Self {
        Self {
            id: detail.product.id,
            name: detail.product.name,
            description: detail.product.description,
            price_idr: detail.product.price_idr,
            unit: detail.product.unit,
            stock_qty: detail.product.stock_qty,
            min_order_qty: detail.product.min_order_qty,
            category_slug: detail.category.as_ref().map(|c| c.slug.clone()),
            category_name: detail.category.map(|c| c.name),
            supplier: ProductSupplierDto {
                id: detail.supplier.id,
                name: detail.supplier.name,
                city: detail.supplier.city,
                province: detail.supplier.province,
                halal_certified: detail.supplier.halal_certified,
                has_coa: detail.supplier.has_coa,
                has_msds: detail.supplier.has_msds,
            },
            images: detail.images.into_iter().map(ProductImageDto::from).collect(),
            created_at: detail.product.created_at,
        }
    }
}

/// A product as shown on the owning supplier's dashboard
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OwnProductDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price_idr: i64,
    pub unit: String,
    pub stock_qty: i32,
    pub min_order_qty: i32,
    pub category_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<ProductModel> for OwnProductDto {
    fn from(product: ProductModel) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price_idr: product.price_idr,
            unit: product.unit,
            stock_qty: product.stock_qty,
            min_order_qty: product.min_order_qty,
            category_id: product.category_id,
            is_active: product.is_active,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

/// Query parameters for the public product browse
#[derive(Debug, Deserialize, IntoParams)]
pub struct BrowseQuery {
    /// Category slug filter
    pub category: Option<String>,
    /// Case-insensitive name substring filter
    pub q: Option<String>,
    /// Supplier UUID filter
    pub supplier: Option<Uuid>,
    /// Opaque page cursor from a previous response
    pub cursor: Option<String>,
    /// Page size (default 20, max 100)
    pub limit: Option<u64>,
}

/// Request payload for creating a product
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateProductDto {
    #[schema(example = "Patchouli Oil (Dark)")]
    pub name: String,
    pub description: Option<String>,
    /// Unit price in integer rupiah, greater than zero
    #[schema(example = 850000)]
    pub price_idr: i64,
    #[schema(example = "kg")]
    pub unit: String,
    pub stock_qty: i32,
    pub min_order_qty: i32,
    pub category_id: Option<Uuid>,
}

/// Partial update of a product. Omitted fields are left unchanged; an
/// explicit `null` clears the nullable fields.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateProductDto {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option::deserialize")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub price_idr: Option<i64>,
    pub unit: Option<String>,
    pub stock_qty: Option<i32>,
    pub min_order_qty: Option<i32>,
    #[serde(default, deserialize_with = "double_option::deserialize")]
    #[schema(value_type = Option<Uuid>)]
    pub category_id: Option<Option<Uuid>>,
    pub is_active: Option<bool>,
}

/// Browse active products
#[utoipa::path(
    get,
    path = "/api/v1/products",
    params(BrowseQuery),
    responses(
        (status = 200, description = "Page of active products", body = PaginatedResponse<ProductListingDto>),
        (status = 400, description = "Malformed cursor or limit", body = ApiError)
    ),
    tag = "products"
)]
pub async fn browse_products(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> Result<Json<PaginatedResponse<ProductListingDto>>, ApiError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let offset = match query.cursor.as_deref() {
        Some(cursor) => decode_cursor(cursor).ok_or_else(|| {
            validation_error(
                "Malformed page cursor",
                serde_json::json!({ "cursor": "Use the next_cursor value from a previous page" }),
            )
        })?,
        None => 0,
    };

    let repo = ProductRepository::new(&state.db);
    let (listings, has_more) = repo
        .browse(BrowseFilter {
            category_slug: query.category,
            q: query.q,
            supplier_id: query.supplier,
            offset,
            limit,
        })
        .await?;

    let data: Vec<ProductListingDto> = listings.into_iter().map(ProductListingDto::from).collect();
    let next_cursor = has_more.then(|| encode_cursor(offset + limit));

    Ok(Json(PaginatedResponse::new(data, next_cursor)))
}

/// Public product detail
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(("id" = Uuid, Path, description = "Product UUID")),
    responses(
        (status = 200, description = "Product detail", body = ProductDetailDto),
        (status = 404, description = "Unknown or inactive product", body = ApiError)
    ),
    tag = "products"
)]
pub async fn product_detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductDetailDto>, ApiError> {
    let repo = ProductRepository::new(&state.db);
    let detail = repo
        .detail(id)
        .await?
        .ok_or_else(|| not_found("Product not found"))?;

    Ok(Json(ProductDetailDto::from(detail)))
}

/// List the authenticated supplier's own products, including inactive ones
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/products",
    responses(
        (status = 200, description = "All products of the supplier", body = [OwnProductDto]),
        (status = 401, description = "No active session", body = ApiError),
        (status = 403, description = "Supplier account required", body = ApiError)
    ),
    tag = "dashboard"
)]
pub async fn list_own_products(
    State(state): State<AppState>,
    SupplierAuth(user): SupplierAuth,
) -> Result<Json<Vec<OwnProductDto>>, ApiError> {
    let repo = ProductRepository::new(&state.db);
    let products = repo.list_for_supplier(user.id).await?;

    Ok(Json(products.into_iter().map(OwnProductDto::from).collect()))
}

/// Create a product
#[utoipa::path(
    post,
    path = "/api/v1/dashboard/products",
    request_body = CreateProductDto,
    responses(
        (status = 201, description = "Product created", body = OwnProductDto, headers(
            ("Location", description = "URL of the created product")
        )),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "No active session", body = ApiError),
        (status = 403, description = "Supplier account required", body = ApiError)
    ),
    tag = "dashboard"
)]
pub async fn create_product(
    State(state): State<AppState>,
    SupplierAuth(user): SupplierAuth,
    Json(request): Json<CreateProductDto>,
) -> Result<(StatusCode, [(&'static str, String); 1], Json<OwnProductDto>), ApiError> {
    let repo = ProductRepository::new(&state.db);
    let product = repo
        .create(CreateProductRequest {
            supplier_id: user.id,
            category_id: request.category_id,
            name: request.name,
            description: request.description,
            price_idr: request.price_idr,
            unit: request.unit,
            stock_qty: request.stock_qty,
            min_order_qty: request.min_order_qty,
        })
        .await?;

    tracing::info!(product_id = %product.id, supplier_id = %user.id, "Product created");

    let location = format!("/api/v1/products/{}", product.id);

    Ok((
        StatusCode::CREATED,
        [("Location", location)],
        Json(OwnProductDto::from(product)),
    ))
}

/// Update a product
#[utoipa::path(
    put,
    path = "/api/v1/dashboard/products/{id}",
    params(("id" = Uuid, Path, description = "Product UUID")),
    request_body = UpdateProductDto,
    responses(
        (status = 200, description = "Product updated", body = OwnProductDto),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 404, description = "Product not found", body = ApiError)
    ),
    tag = "dashboard"
)]
pub async fn update_product(
    State(state): State<AppState>,
    SupplierAuth(user): SupplierAuth,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateProductDto>,
) -> Result<Json<OwnProductDto>, ApiError> {
    let repo = ProductRepository::new(&state.db);
    let product = repo
        .update_owned(
            user.id,
            id,
            UpdateProductRequest {
                category_id: request.category_id,
                name: request.name,
                description: request.description,
                price_idr: request.price_idr,
                unit: request.unit,
                stock_qty: request.stock_qty,
                min_order_qty: request.min_order_qty,
                is_active: request.is_active,
            },
        )
        .await?;

    Ok(Json(OwnProductDto::from(product)))
}

/// Delete a product together with its images
#[utoipa::path(
    delete,
    path = "/api/v1/dashboard/products/{id}",
    params(("id" = Uuid, Path, description = "Product UUID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found", body = ApiError)
    ),
    tag = "dashboard"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    SupplierAuth(user): SupplierAuth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = ProductRepository::new(&state.db);
    let image_urls = repo.delete_owned(user.id, id).await?;

    // Stored files are cleaned up best effort; a failed removal leaves an
    // orphaned file, not a broken listing.
    for url in image_urls {
        if let Err(err) = state.images.delete(&url).await {
            tracing::warn!(%url, error = %err, "Failed to remove stored image");
        }
    }

    tracing::info!(product_id = %id, supplier_id = %user.id, "Product deleted");

    Ok(StatusCode::NO_CONTENT)
}
