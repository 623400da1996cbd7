//! Generative-AI product recommendations.
//!
//! This module proxies free-text buyer queries to a Gemini-style
//! `generateContent` HTTP API and turns the model's reply into a structured
//! recommendation over the live product catalog. The call is one-shot with a
//! configured timeout; there is no retry policy. The model is never trusted:
//! its reply is parsed strictly and any product id that is not part of the
//! catalog snapshot is dropped.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::RecommendConfig;
use crate::error::{ApiError, ErrorType, upstream_error};

/// Provider label used in logs and upstream error details.
const PROVIDER: &str = "gemini";

/// A catalog entry offered to the model for selection.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogProduct {
    pub id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub price_idr: i64,
    pub unit: String,
    pub min_order_qty: i32,
    pub supplier_name: String,
}

/// One product the model picked, with its reasoning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductPick {
    pub product_id: Uuid,
    pub reason: String,
}

/// Structured recommendation produced from the model reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub recommendations: Vec<ProductPick>,
    pub summary: String,
}

/// Errors raised by the recommendation proxy.
#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("recommendation service is not configured")]
    NotConfigured,
    #[error("upstream request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("upstream returned status {status}")]
    UpstreamStatus { status: u16, body: String },
    #[error("upstream reply could not be parsed: {0}")]
    MalformedReply(String),
}

impl From<RecommendError> for ApiError {
    fn from(error: RecommendError) -> Self {
        match error {
            RecommendError::NotConfigured => ErrorType::ServiceUnavailable.into(),
            RecommendError::Network(err) => {
                tracing::warn!(provider = PROVIDER, error = %err, "Upstream request failed");
                upstream_error(PROVIDER.to_string(), 0, Some(err.to_string()))
            }
            RecommendError::UpstreamStatus { status, body } => {
                upstream_error(PROVIDER.to_string(), status, Some(body))
            }
            RecommendError::MalformedReply(detail) => {
                tracing::warn!(provider = PROVIDER, %detail, "Unparseable upstream reply");
                upstream_error(PROVIDER.to_string(), 200, Some(detail))
            }
        }
    }
}

// Wire types for the generateContent API.

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Client for the generative-AI recommendation endpoint.
pub struct RecommendClient {
    http: reqwest::Client,
    config: RecommendConfig,
}

impl RecommendClient {
    /// Create a client sharing the application's HTTP connection pool.
    pub fn new(http: reqwest::Client, config: RecommendConfig) -> Self {
        Self { http, config }
    }

    /// Whether an API key is configured.
    pub fn is_configured(&self) -> bool {
        self.config.gemini_api_key.is_some()
    }

    /// Ask the model to pick catalog products matching the buyer's query.
    pub async fn recommend(
        &self,
        query: &str,
        catalog: &[CatalogProduct],
    ) -> Result<Recommendation, RecommendError> {
        let api_key = self
            .config
            .gemini_api_key
            .as_deref()
            .ok_or(RecommendError::NotConfigured)?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.gemini_api_base, self.config.gemini_model
        );

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_prompt(query, catalog),
                }],
            }],
        };

        let response = self
            .http
            .post(&url)
            .query(&[("key", api_key)])
            .json(&request)
            .timeout(Duration::from_millis(self.config.gemini_timeout_ms))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RecommendError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let reply: GenerateResponse = response
            .json()
            .await
            .map_err(|err| RecommendError::MalformedReply(err.to_string()))?;

        let text = reply
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or_else(|| RecommendError::MalformedReply("empty candidate list".to_string()))?;

        let mut recommendation = parse_reply(&text)?;

        // Drop hallucinated ids: only products from the snapshot survive.
        recommendation
            .recommendations
            .retain(|pick| catalog.iter().any(|product| product.id == pick.product_id));

        Ok(recommendation)
    }
}

/// Build the instruction prompt: the buyer query plus a catalog listing the
/// model must choose from, with a strict JSON reply contract.
fn build_prompt(query: &str, catalog: &[CatalogProduct]) -> String {
    let mut prompt = String::with_capacity(1024);
    prompt.push_str(
        "You are a sourcing assistant for an Indonesian fragrance-ingredient \
         marketplace. A buyer describes what they need; pick the best matching \
         products from the catalog below.\n\nReply with JSON only, using exactly \
         this shape:\n{\"recommendations\":[{\"product_id\":\"<uuid from the \
         catalog>\",\"reason\":\"<one sentence>\"}],\"summary\":\"<one or two \
         sentences>\"}\n\nRecommend at most 5 products. Only use product_id \
         values that appear in the catalog.\n\nBuyer query:\n",
    );
    prompt.push_str(query);
    prompt.push_str("\n\nCatalog:\n");

    for product in catalog {
        let category = product.category.as_deref().unwrap_or("uncategorized");
        prompt.push_str(&format!(
            "- {} | {} | {} | Rp{} per {} | MOQ {} {} | {}\n",
            product.id,
            product.name,
            category,
            product.price_idr,
            product.unit,
            product.min_order_qty,
            product.unit,
            product.supplier_name,
        ));
    }

    prompt
}

/// Parse the model's reply text into a [`Recommendation`].
///
/// Models frequently wrap JSON in markdown fences despite instructions;
/// fences are stripped before parsing.
fn parse_reply(text: &str) -> Result<Recommendation, RecommendError> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .map(|rest| rest.trim_end_matches("```").trim())
        .unwrap_or(trimmed);

    serde_json::from_str(body).map_err(|err| RecommendError::MalformedReply(err.to_string()))
}
