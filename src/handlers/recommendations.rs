//! # Recommendation API Handlers
//!
//! Proxies a free-text buyer query to the configured generative-AI service
//! and returns a structured recommendation over the active catalog. The
//! endpoint is public: anonymous visitors can ask before registering.

use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{ApiError, validation_error};
use crate::recommend::{CatalogProduct, RecommendError};
use crate::repositories::ProductRepository;
use crate::server::AppState;

/// Longest accepted query, in characters.
const MAX_QUERY_CHARS: usize = 2000;

/// Request payload for a recommendation query
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecommendRequestDto {
    /// Free-text description of what the buyer is looking for
    #[schema(example = "An earthy base note for a natural soap line, halal certified")]
    pub query: String,
}

/// A recommended product, enriched with catalog data
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecommendedProductDto {
    pub product_id: Uuid,
    pub name: String,
    pub price_idr: i64,
    pub unit: String,
    pub supplier_name: String,
    /// The model's one-sentence reasoning for this pick
    pub reason: String,
}

/// Structured recommendation response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecommendResponseDto {
    pub recommendations: Vec<RecommendedProductDto>,
    pub summary: String,
}

/// Ask for product recommendations
#[utoipa::path(
    post,
    path = "/api/v1/recommendations",
    request_body = RecommendRequestDto,
    responses(
        (status = 200, description = "Structured recommendation", body = RecommendResponseDto),
        (status = 400, description = "Empty or oversized query", body = ApiError),
        (status = 502, description = "Generative-AI upstream failed", body = ApiError),
        (status = 503, description = "Recommendation service not configured", body = ApiError)
    ),
    tag = "recommendations"
)]
pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequestDto>,
) -> Result<Json<RecommendResponseDto>, ApiError> {
    let query = request.query.trim();
    if query.is_empty() {
        return Err(validation_error(
            "Query is required",
            serde_json::json!({ "query": "Describe what you are looking for" }),
        ));
    }
    if query.chars().count() > MAX_QUERY_CHARS {
        return Err(validation_error(
            "Query is too long",
            serde_json::json!({ "max_chars": MAX_QUERY_CHARS }),
        ));
    }

    // Reject before the catalog query when no provider key is configured.
    if !state.recommend.is_configured() {
        return Err(RecommendError::NotConfigured.into());
    }

    let products = ProductRepository::new(&state.db);
    let catalog = products
        .active_catalog(state.config.recommend.catalog_limit)
        .await?;

    let recommendation = state.recommend.recommend(query, &catalog).await?;

    tracing::info!(
        picks = recommendation.recommendations.len(),
        catalog_size = catalog.len(),
        "Recommendation served"
    );

    let recommendations = recommendation
        .recommendations
        .into_iter()
        .filter_map(|pick| {
            catalog
                .iter()
                .find(|product| product.id == pick.product_id)
                .map(|product| enrich(product, pick.reason))
        })
        .collect();

    Ok(Json(RecommendResponseDto {
        recommendations,
        summary: recommendation.summary,
    }))
}

fn enrich(product: &CatalogProduct, reason: String) -> RecommendedProductDto {
    RecommendedProductDto {
        product_id: product.id,
        name: product.name.clone(),
        price_idr: product.price_idr,
        unit: product.unit.clone(),
        supplier_name: product.supplier_name.clone(),
        reason,
    }
}
