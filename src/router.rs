use crate::handlers::{
    auth::{login, signup},
    health::health_check,
    items::{create_item, delete_item, get_item, get_items, update_item},
    orders::{
        create_order, delete_order, get_order, get_orders, patch_order_status, update_order,
    },
    users::{create_user, delete_user, get_user, get_users, update_user},
};
use crate::schemas::{ApiDoc, AppState, ErrorResponse};
use axum::{
    http::StatusCode,
    response::Json,
    routing::{delete, get, patch, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware.
///
/// The Prometheus metric pair is not built here: its recorder is
/// process-global and installable only once, so `serve` wires it around
/// the returned router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Auth routes
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/signup", post(signup))
        // Item CRUD routes
        .route("/api/v1/items", get(get_items))
        .route("/api/v1/items", post(create_item))
        .route("/api/v1/items/:item_id", get(get_item))
        .route("/api/v1/items/:item_id", put(update_item))
        .route("/api/v1/items/:item_id", delete(delete_item))
        // User CRUD routes
        .route("/api/v1/users", get(get_users))
        .route("/api/v1/users", post(create_user))
        .route("/api/v1/users/:user_id", get(get_user))
        .route("/api/v1/users/:user_id", put(update_user))
        .route("/api/v1/users/:user_id", delete(delete_user))
        // Order CRUD routes
        .route("/api/v1/orders", get(get_orders))
        .route("/api/v1/orders", post(create_order))
        .route("/api/v1/orders/:order_id", get(get_order))
        .route("/api/v1/orders/:order_id", put(update_order))
        .route("/api/v1/orders/:order_id", patch(patch_order_status))
        .route("/api/v1/orders/:order_id", delete(delete_order))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Catch-all for unmatched paths
        .fallback(not_found)
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Not Found 404".to_string(),
        }),
    )
}
