//! # Inquiry (RFQ) API Handlers
//!
//! Buyers submit requests for quotation to a single supplier; suppliers
//! answer with a quote or a rejection; buyers accept or reject the quote.
//! Every status change goes through the transition table enforced by the
//! repository, and an inquiry is only ever visible to its two parties.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::auth::{BuyerAuth, CurrentUser, SupplierAuth};
use crate::error::{ApiError, validation_error};
use crate::models::company::CompanyRole;
use crate::models::inquiry::{InquiryStatus, Model as InquiryModel};
use crate::repositories::{
    BuyerAction, CompanyRepository, CreateInquiryRequest, InquiryItemRequest, InquiryRepository,
    ItemWithProduct, SupplierAction,
};
use crate::server::AppState;

/// A line item in a new inquiry
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InquiryItemRequestDto {
    pub product_id: Uuid,
    /// Requested quantity; must meet the product's minimum order quantity
    #[schema(example = 10)]
    pub quantity: i32,
}

/// Request payload for submitting an inquiry
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateInquiryDto {
    /// Supplier the request is addressed to
    pub supplier_id: Uuid,
    /// Free-text message to the supplier (required)
    #[schema(example = "Need 10kg monthly for Q3 production, COA required.")]
    pub message: String,
    pub items: Vec<InquiryItemRequestDto>,
}

/// A line item as returned by inquiry endpoints
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InquiryItemDto {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
}

impl From<ItemWithProduct> for InquiryItemDto {
    fn from(item: ItemWithProduct) -> Self {
        Self {
            id: item.item.id,
            product_id: item.item.product_id,
            product_name: item.product_name,
            quantity: item.item.quantity,
        }
    }
}

/// An inquiry as returned by list endpoints
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InquiryDto {
    pub id: Uuid,
    pub buyer_id: Uuid,
    pub supplier_id: Uuid,
    pub message: String,
    #[schema(example = "pending")]
    pub status: String,
    pub quoted_price_idr: Option<i64>,
    pub quote_notes: Option<String>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<InquiryModel> for InquiryDto {
    fn from(inquiry: InquiryModel) -> Self {
        Self {
            id: inquiry.id,
            buyer_id: inquiry.buyer_id,
            supplier_id: inquiry.supplier_id,
            message: inquiry.message,
            status: inquiry.status,
            quoted_price_idr: inquiry.quoted_price_idr,
            quote_notes: inquiry.quote_notes,
            created_at: inquiry.created_at,
            updated_at: inquiry.updated_at,
        }
    }
}

/// An inquiry with its line items
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InquiryDetailDto {
    #[serde(flatten)]
    pub inquiry: InquiryDto,
    pub items: Vec<InquiryItemDto>,
}

/// Status filter for inquiry lists
#[derive(Debug, Deserialize, IntoParams)]
pub struct InquiryListQuery {
    /// Filter by status: pending|quoted|accepted|rejected
    pub status: Option<String>,
}

/// Supplier-side transition request: quote or reject
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SupplierTransitionDto {
    /// Target status: quoted|rejected
    #[schema(example = "quoted")]
    pub status: String,
    /// Quoted total in integer rupiah; required when quoting
    #[schema(example = 8200000)]
    pub quoted_price_idr: Option<i64>,
    pub quote_notes: Option<String>,
}

/// Buyer-side transition request: accept or reject a quote
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BuyerTransitionDto {
    /// Target status: accepted|rejected
    #[schema(example = "accepted")]
    pub status: String,
}

fn parse_status_filter(query: &InquiryListQuery) -> Result<Option<InquiryStatus>, ApiError> {
    match query.status.as_deref() {
        None => Ok(None),
        Some(raw) => InquiryStatus::parse(raw).map(Some).ok_or_else(|| {
            validation_error(
                "Unknown status filter",
                serde_json::json!({ "status": "Must be pending, quoted, accepted, or rejected" }),
            )
        }),
    }
}

/// Submit a new inquiry
#[utoipa::path(
    post,
    path = "/api/v1/inquiries",
    request_body = CreateInquiryDto,
    responses(
        (status = 201, description = "Inquiry created", body = InquiryDetailDto, headers(
            ("Location", description = "URL of the created inquiry")
        )),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "No active session", body = ApiError),
        (status = 403, description = "Buyer account required", body = ApiError)
    ),
    tag = "inquiries"
)]
pub async fn create_inquiry(
    State(state): State<AppState>,
    BuyerAuth(user): BuyerAuth,
    Json(request): Json<CreateInquiryDto>,
) -> Result<(StatusCode, [(&'static str, String); 1], Json<InquiryDetailDto>), ApiError> {
    // The addressee must be an existing supplier account.
    let companies = CompanyRepository::new(&state.db);
    let supplier_is_valid = companies
        .find_by_id(request.supplier_id)
        .await?
        .is_some_and(|company| CompanyRole::parse(&company.role) == Some(CompanyRole::Supplier));
    if !supplier_is_valid {
        return Err(validation_error(
            "Unknown supplier",
            serde_json::json!({ "supplier_id": "No supplier account with this id" }),
        ));
    }

    let repo = InquiryRepository::new(&state.db);
    let (inquiry, _) = repo
        .create(CreateInquiryRequest {
            buyer_id: user.id,
            supplier_id: request.supplier_id,
            message: request.message,
            items: request
                .items
                .into_iter()
                .map(|item| InquiryItemRequest {
                    product_id: item.product_id,
                    quantity: item.quantity,
                })
                .collect(),
        })
        .await?;

    tracing::info!(
        inquiry_id = %inquiry.id,
        buyer_id = %user.id,
        supplier_id = %inquiry.supplier_id,
        "Inquiry submitted"
    );

    // Re-read through the visibility path so items carry product names.
    let (inquiry, items) = repo
        .find_visible(inquiry.id, user.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("freshly created inquiry is missing"))?;

    let location = format!("/api/v1/inquiries/{}", inquiry.id);

    Ok((
        StatusCode::CREATED,
        [("Location", location)],
        Json(InquiryDetailDto {
            inquiry: InquiryDto::from(inquiry),
            items: items.into_iter().map(InquiryItemDto::from).collect(),
        }),
    ))
}

/// List the authenticated buyer's inquiries
#[utoipa::path(
    get,
    path = "/api/v1/account/inquiries",
    params(InquiryListQuery),
    responses(
        (status = 200, description = "Buyer's inquiries, newest first", body = [InquiryDto]),
        (status = 400, description = "Unknown status filter", body = ApiError),
        (status = 401, description = "No active session", body = ApiError),
        (status = 403, description = "Buyer account required", body = ApiError)
    ),
    tag = "inquiries"
)]
pub async fn list_buyer_inquiries(
    State(state): State<AppState>,
    BuyerAuth(user): BuyerAuth,
    Query(query): Query<InquiryListQuery>,
) -> Result<Json<Vec<InquiryDto>>, ApiError> {
    let status = parse_status_filter(&query)?;

    let repo = InquiryRepository::new(&state.db);
    let inquiries = repo.list_for_buyer(user.id, status).await?;

    Ok(Json(inquiries.into_iter().map(InquiryDto::from).collect()))
}

/// List inquiries addressed to the authenticated supplier
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/inquiries",
    params(InquiryListQuery),
    responses(
        (status = 200, description = "Supplier's incoming inquiries, newest first", body = [InquiryDto]),
        (status = 400, description = "Unknown status filter", body = ApiError),
        (status = 401, description = "No active session", body = ApiError),
        (status = 403, description = "Supplier account required", body = ApiError)
    ),
    tag = "inquiries"
)]
pub async fn list_supplier_inquiries(
    State(state): State<AppState>,
    SupplierAuth(user): SupplierAuth,
    Query(query): Query<InquiryListQuery>,
) -> Result<Json<Vec<InquiryDto>>, ApiError> {
    let status = parse_status_filter(&query)?;

    let repo = InquiryRepository::new(&state.db);
    let inquiries = repo.list_for_supplier(user.id, status).await?;

    Ok(Json(inquiries.into_iter().map(InquiryDto::from).collect()))
}

/// Inquiry detail, visible only to its buyer and supplier
#[utoipa::path(
    get,
    path = "/api/v1/inquiries/{id}",
    params(("id" = Uuid, Path, description = "Inquiry UUID")),
    responses(
        (status = 200, description = "Inquiry with line items", body = InquiryDetailDto),
        (status = 401, description = "No active session", body = ApiError),
        (status = 404, description = "Not found or belongs to other parties", body = ApiError)
    ),
    tag = "inquiries"
)]
pub async fn inquiry_detail(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<InquiryDetailDto>, ApiError> {
    let repo = InquiryRepository::new(&state.db);
    let (inquiry, items) = repo
        .find_visible(id, user.id)
        .await?
        .ok_or_else(|| crate::error::not_found("Inquiry not found"))?;

    Ok(Json(InquiryDetailDto {
        inquiry: InquiryDto::from(inquiry),
        items: items.into_iter().map(InquiryItemDto::from).collect(),
    }))
}

/// Quote or reject an inquiry as its supplier
#[utoipa::path(
    put,
    path = "/api/v1/dashboard/inquiries/{id}",
    params(("id" = Uuid, Path, description = "Inquiry UUID")),
    request_body = SupplierTransitionDto,
    responses(
        (status = 200, description = "Inquiry updated", body = InquiryDto),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 404, description = "Inquiry not found", body = ApiError),
        (status = 409, description = "Illegal status transition", body = ApiError)
    ),
    tag = "inquiries"
)]
pub async fn supplier_transition(
    State(state): State<AppState>,
    SupplierAuth(user): SupplierAuth,
    Path(id): Path<Uuid>,
    Json(request): Json<SupplierTransitionDto>,
) -> Result<Json<InquiryDto>, ApiError> {
    let action = match request.status.as_str() {
        "quoted" => {
            let price_idr = request.quoted_price_idr.ok_or_else(|| {
                validation_error(
                    "A quote needs a price",
                    serde_json::json!({ "quoted_price_idr": "Required when status is 'quoted'" }),
                )
            })?;
            SupplierAction::Quote {
                price_idr,
                notes: request.quote_notes,
            }
        }
        "rejected" => SupplierAction::Reject,
        _ => {
            return Err(validation_error(
                "Unknown supplier transition",
                serde_json::json!({ "status": "Must be 'quoted' or 'rejected'" }),
            ));
        }
    };

    let repo = InquiryRepository::new(&state.db);
    let inquiry = repo.supplier_transition(user.id, id, action).await?;

    tracing::info!(inquiry_id = %id, status = %inquiry.status, "Supplier updated inquiry");

    Ok(Json(InquiryDto::from(inquiry)))
}

/// Accept or reject a quoted inquiry as its buyer
#[utoipa::path(
    put,
    path = "/api/v1/account/inquiries/{id}",
    params(("id" = Uuid, Path, description = "Inquiry UUID")),
    request_body = BuyerTransitionDto,
    responses(
        (status = 200, description = "Inquiry updated", body = InquiryDto),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 404, description = "Inquiry not found", body = ApiError),
        (status = 409, description = "Illegal status transition", body = ApiError)
    ),
    tag = "inquiries"
)]
pub async fn buyer_transition(
    State(state): State<AppState>,
    BuyerAuth(user): BuyerAuth,
    Path(id): Path<Uuid>,
    Json(request): Json<BuyerTransitionDto>,
) -> Result<Json<InquiryDto>, ApiError> {
    let action = match request.status.as_str() {
        "accepted" => BuyerAction::Accept,
        "rejected" => BuyerAction::Reject,
        _ => {
            return Err(validation_error(
                "Unknown buyer transition",
                serde_json::json!({ "status": "Must be 'accepted' or 'rejected'" }),
            ));
        }
    };

    let repo = InquiryRepository::new(&state.db);
    let inquiry = repo.buyer_transition(user.id, id, action).await?;

    tracing::info!(inquiry_id = %id, status = %inquiry.status, "Buyer updated inquiry");

    Ok(Json(InquiryDto::from(inquiry)))
}
