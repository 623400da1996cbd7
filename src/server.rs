//! # Server Configuration
//!
//! This module contains the server setup and configuration for the Aromara
//! API: shared application state, router assembly with the session gate and
//! observability layers, and the OpenAPI document.

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post, put},
};
use sea_orm::DatabaseConnection;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth;
use crate::config::AppConfig;
use crate::handlers;
use crate::recommend::RecommendClient;
use crate::storage::ImageStore;
use crate::telemetry;

/// Headroom added to the body limit for multipart framing overhead.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DatabaseConnection,
    pub images: ImageStore,
    pub recommend: Arc<RecommendClient>,
}

impl AppState {
    /// Build the shared state from configuration and an established pool.
    pub fn new(config: AppConfig, db: DatabaseConnection) -> Self {
        let images = ImageStore::from_config(&config);
        let recommend = Arc::new(RecommendClient::new(
            reqwest::Client::new(),
            config.recommend.clone(),
        ));

        Self {
            config: Arc::new(config),
            db,
            images,
            recommend,
        }
    }
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    let body_limit = DefaultBodyLimit::max(state.config.upload_max_bytes + MULTIPART_OVERHEAD);

    Router::new()
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .route(
            "/api/v1/auth/register",
            post(handlers::accounts::register),
        )
        .route("/api/v1/auth/login", post(handlers::accounts::login))
        .route("/api/v1/auth/logout", post(handlers::accounts::logout))
        .route("/api/v1/auth/me", get(handlers::accounts::me))
        .route(
            "/api/v1/categories",
            get(handlers::categories::list_categories).post(handlers::categories::create_category),
        )
        .route(
            "/api/v1/categories/{id}",
            put(handlers::categories::update_category)
                .delete(handlers::categories::delete_category),
        )
        .route("/api/v1/products", get(handlers::products::browse_products))
        .route(
            "/api/v1/products/{id}",
            get(handlers::products::product_detail),
        )
        .route(
            "/api/v1/suppliers",
            get(handlers::suppliers::list_suppliers),
        )
        .route(
            "/api/v1/suppliers/{id}",
            get(handlers::suppliers::supplier_profile),
        )
        .route(
            "/api/v1/recommendations",
            post(handlers::recommendations::recommend),
        )
        .route(
            "/api/v1/inquiries",
            post(handlers::inquiries::create_inquiry),
        )
        .route(
            "/api/v1/inquiries/{id}",
            get(handlers::inquiries::inquiry_detail),
        )
        .route(
            "/api/v1/account/inquiries",
            get(handlers::inquiries::list_buyer_inquiries),
        )
        .route(
            "/api/v1/account/inquiries/{id}",
            put(handlers::inquiries::buyer_transition),
        )
        .route(
            "/api/v1/dashboard/products",
            get(handlers::products::list_own_products).post(handlers::products::create_product),
        )
        .route(
            "/api/v1/dashboard/products/{id}",
            put(handlers::products::update_product).delete(handlers::products::delete_product),
        )
        .route(
            "/api/v1/dashboard/products/{id}/images",
            post(handlers::images::upload_image),
        )
        .route(
            "/api/v1/dashboard/products/{id}/images/{image_id}",
            axum::routing::delete(handlers::images::delete_image),
        )
        .route(
            "/api/v1/dashboard/products/{id}/images/{image_id}/primary",
            put(handlers::images::set_primary_image),
        )
        .route(
            "/api/v1/dashboard/inquiries",
            get(handlers::inquiries::list_supplier_inquiries),
        )
        .route(
            "/api/v1/dashboard/inquiries/{id}",
            put(handlers::inquiries::supplier_transition),
        )
        .route(
            "/api/v1/dashboard/profile",
            get(handlers::suppliers::own_profile).put(handlers::suppliers::update_own_profile),
        )
        .route(
            "/api/v1/dashboard/stats",
            get(handlers::suppliers::dashboard_stats),
        )
        .nest_service("/uploads", ServeDir::new(state.images.root()))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state.config),
            auth::session_gate,
        ))
        .layer(middleware::from_fn(telemetry::trace_context_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(body_limit)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
}

/// CORS policy: locked to the configured origin when one is set (cookies
/// need credentials), permissive otherwise (local development).
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origin = config
        .cors_allowed_origin
        .as_deref()
        .and_then(|origin| origin.parse::<HeaderValue>().ok());

    match origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true),
        None => CorsLayer::permissive(),
    }
}

/// Starts the server with the given configuration
pub async fn run_server(
    config: AppConfig,
    db: DatabaseConnection,
) -> Result<(), Box<dyn std::error::Error>> {
    // Resolve the configured bind address before consuming the config
    let addr = config
        .bind_addr()
        .map_err(|e| format!("Invalid server address: {}", e))?;
    let profile = config.profile.clone();

    let state = AppState::new(config, db);
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, %profile, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::healthz,
        crate::handlers::accounts::register,
        crate::handlers::accounts::login,
        crate::handlers::accounts::logout,
        crate::handlers::accounts::me,
        crate::handlers::categories::list_categories,
        crate::handlers::categories::create_category,
        crate::handlers::categories::update_category,
        crate::handlers::categories::delete_category,
        crate::handlers::products::browse_products,
        crate::handlers::products::product_detail,
        crate::handlers::products::list_own_products,
        crate::handlers::products::create_product,
        crate::handlers::products::update_product,
        crate::handlers::products::delete_product,
        crate::handlers::images::upload_image,
        crate::handlers::images::set_primary_image,
        crate::handlers::images::delete_image,
        crate::handlers::inquiries::create_inquiry,
        crate::handlers::inquiries::list_buyer_inquiries,
        crate::handlers::inquiries::list_supplier_inquiries,
        crate::handlers::inquiries::inquiry_detail,
        crate::handlers::inquiries::supplier_transition,
        crate::handlers::inquiries::buyer_transition,
        crate::handlers::suppliers::list_suppliers,
        crate::handlers::suppliers::supplier_profile,
        crate::handlers::suppliers::own_profile,
        crate::handlers::suppliers::update_own_profile,
        crate::handlers::suppliers::dashboard_stats,
        crate::handlers::recommendations::recommend,
    ),
    components(
        schemas(
            crate::models::ServiceInfo,
            crate::handlers::HealthStatus,
            crate::error::ApiError,
            crate::error::UpstreamError,
            crate::session::SessionUser,
            crate::handlers::accounts::RegisterRequestDto,
            crate::handlers::accounts::LoginRequestDto,
            crate::handlers::accounts::AccountDto,
            crate::handlers::categories::CategoryDto,
            crate::handlers::categories::CategoryRequestDto,
            crate::handlers::products::ProductListingDto,
            crate::handlers::products::ProductImageDto,
            crate::handlers::products::ProductSupplierDto,
            crate::handlers::products::ProductDetailDto,
            crate::handlers::products::OwnProductDto,
            crate::handlers::products::CreateProductDto,
            crate::handlers::products::UpdateProductDto,
            crate::handlers::images::ImageUploadForm,
            crate::handlers::inquiries::InquiryItemRequestDto,
            crate::handlers::inquiries::CreateInquiryDto,
            crate::handlers::inquiries::InquiryItemDto,
            crate::handlers::inquiries::InquiryDto,
            crate::handlers::inquiries::InquiryDetailDto,
            crate::handlers::inquiries::SupplierTransitionDto,
            crate::handlers::inquiries::BuyerTransitionDto,
            crate::handlers::suppliers::SupplierDto,
            crate::handlers::suppliers::ProfileDto,
            crate::handlers::suppliers::UpdateProfileDto,
            crate::handlers::suppliers::InquiryCountsDto,
            crate::handlers::suppliers::DashboardStatsDto,
            crate::handlers::recommendations::RecommendRequestDto,
            crate::handlers::recommendations::RecommendedProductDto,
            crate::handlers::recommendations::RecommendResponseDto,
            crate::handlers::types::PaginatedResponse<crate::handlers::products::ProductListingDto>,
        )
    ),
    info(
        title = "Aromara API",
        description = "B2B marketplace API for Indonesian fragrance ingredients",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
