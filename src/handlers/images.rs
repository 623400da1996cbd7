//! # Product Image API Handlers
//!
//! Multipart image upload, primary selection, and deletion for a supplier's
//! own products. Files live in the [`crate::storage::ImageStore`]; rows live
//! in the product_images table and follow the gallery invariants enforced by
//! the repository.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Json,
};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::SupplierAuth;
use crate::error::{ApiError, not_found, validation_error};
use crate::repositories::{ProductImageRepository, ProductRepository};
use crate::server::AppState;
use crate::storage::StorageError;

use super::products::ProductImageDto;

/// Multipart field name carrying the image bytes.
const FILE_FIELD: &str = "file";

/// Multipart form for image uploads
#[derive(Debug, ToSchema)]
pub struct ImageUploadForm {
    /// Image bytes; accepted types are image/png, image/jpeg, image/webp
    #[schema(value_type = String, format = Binary)]
    pub file: String,
}

impl From<StorageError> for ApiError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::UnsupportedContentType(content_type) => validation_error(
                "Unsupported image type",
                serde_json::json!({
                    "content_type": content_type,
                    "accepted": ["image/png", "image/jpeg", "image/webp"],
                }),
            ),
            StorageError::TooLarge { max_bytes } => validation_error(
                "Image is too large",
                serde_json::json!({ "max_bytes": max_bytes }),
            ),
            StorageError::Empty => validation_error(
                "Image data is empty",
                serde_json::json!({ "field": FILE_FIELD }),
            ),
            StorageError::Io(err) => {
                tracing::error!(error = %err, "Image store I/O failure");
                anyhow::Error::from(err).into()
            }
        }
    }
}

/// Pull the image field out of the multipart body.
async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Vec<u8>), ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(|err| {
        validation_error(
            "Malformed multipart body",
            serde_json::json!({ "error": err.to_string() }),
        )
    })? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(|err| {
            validation_error(
                "Failed to read uploaded file",
                serde_json::json!({ "error": err.to_string() }),
            )
        })?;

        return Ok((content_type, data.to_vec()));
    }

    Err(validation_error(
        "Missing file field",
        serde_json::json!({ "field": FILE_FIELD }),
    ))
}

/// Upload an image for a product
#[utoipa::path(
    post,
    path = "/api/v1/dashboard/products/{id}/images",
    params(("id" = Uuid, Path, description = "Product UUID")),
    request_body(content = ImageUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Image stored", body = ProductImageDto),
        (status = 400, description = "Unsupported type, oversized, or malformed upload", body = ApiError),
        (status = 404, description = "Product not found", body = ApiError)
    ),
    tag = "dashboard"
)]
pub async fn upload_image(
    State(state): State<AppState>,
    SupplierAuth(user): SupplierAuth,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ProductImageDto>), ApiError> {
    let products = ProductRepository::new(&state.db);
    products
        .find_owned(user.id, id)
        .await?
        .ok_or_else(|| not_found("Product not found"))?;

    let (content_type, data) = read_file_field(&mut multipart).await?;

    let url = state.images.save(&content_type, &data).await?;

    let images = ProductImageRepository::new(&state.db);
    let image = match images.add(id, url.clone()).await {
        Ok(image) => image,
        Err(err) => {
            // The row failed after the file was written; remove the orphan.
            if let Err(cleanup) = state.images.delete(&url).await {
                tracing::warn!(%url, error = %cleanup, "Failed to remove orphaned upload");
            }
            return Err(err.into());
        }
    };

    tracing::info!(product_id = %id, image_id = %image.id, "Image uploaded");

    Ok((StatusCode::CREATED, Json(ProductImageDto::from(image))))
}

/// Make an image the product's primary
#[utoipa::path(
    put,
    path = "/api/v1/dashboard/products/{id}/images/{image_id}/primary",
    params(
        ("id" = Uuid, Path, description = "Product UUID"),
        ("image_id" = Uuid, Path, description = "Image UUID")
    ),
    responses(
        (status = 204, description = "Primary image updated"),
        (status = 404, description = "Product or image not found", body = ApiError)
    ),
    tag = "dashboard"
)]
pub async fn set_primary_image(
    State(state): State<AppState>,
    SupplierAuth(user): SupplierAuth,
    Path((id, image_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let products = ProductRepository::new(&state.db);
    products
        .find_owned(user.id, id)
        .await?
        .ok_or_else(|| not_found("Product not found"))?;

    let images = ProductImageRepository::new(&state.db);
    images.set_primary(id, image_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete an image
#[utoipa::path(
    delete,
    path = "/api/v1/dashboard/products/{id}/images/{image_id}",
    params(
        ("id" = Uuid, Path, description = "Product UUID"),
        ("image_id" = Uuid, Path, description = "Image UUID")
    ),
    responses(
        (status = 204, description = "Image deleted"),
        (status = 404, description = "Product or image not found", body = ApiError)
    ),
    tag = "dashboard"
)]
pub async fn delete_image(
    State(state): State<AppState>,
    SupplierAuth(user): SupplierAuth,
    Path((id, image_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let products = ProductRepository::new(&state.db);
    products
        .find_owned(user.id, id)
        .await?
        .ok_or_else(|| not_found("Product not found"))?;

    let images = ProductImageRepository::new(&state.db);
    let url = images.remove(id, image_id).await?;

    if let Err(err) = state.images.delete(&url).await {
        tracing::warn!(%url, error = %err, "Failed to remove stored image");
    }

    tracing::info!(product_id = %id, image_id = %image_id, "Image deleted");

    Ok(StatusCode::NO_CONTENT)
}
