// Thin namespace wrapper for API-layer components
pub mod handlers {
    pub use crate::handlers::*;
}

pub mod openapi {
    pub use crate::openapi::*;
}

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::AppState;
use crate::openapi::ApiDoc;

/// Maximum accepted request body.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Builds the application router with all routes and middleware.
pub fn router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/generate", post(crate::handlers::generate_analysis))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES));

    Router::new()
        .route("/health", get(crate::handlers::health))
        .merge(api_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}
