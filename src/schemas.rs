use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::auth::jwt::TokenService;

/// Shared state for the application
#[derive(Clone, Debug)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub tokens: TokenService,
}

/// Query parameters for the paginated list endpoints.
///
/// `page` and `limit` are accepted as raw strings: values that do not
/// parse as positive integers fall back to the defaults instead of
/// rejecting the request.
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct ListQuery {
    /// Case-insensitive substring filter
    pub q: Option<String>,
    /// 1-based page number (default: 1)
    pub page: Option<String>,
    /// Page size (default: 10)
    pub limit: Option<String>,
}

impl ListQuery {
    pub fn page(&self) -> u64 {
        parse_positive(self.page.as_deref()).unwrap_or(1)
    }

    pub fn limit(&self) -> u64 {
        parse_positive(self.limit.as_deref()).unwrap_or(10)
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
}

/// Standard error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::auth::login,
        crate::handlers::auth::signup,
        crate::handlers::users::get_users,
        crate::handlers::users::create_user,
        crate::handlers::users::get_user,
        crate::handlers::users::update_user,
        crate::handlers::users::delete_user,
        crate::handlers::items::get_items,
        crate::handlers::items::create_item,
        crate::handlers::items::get_item,
        crate::handlers::items::update_item,
        crate::handlers::items::delete_item,
        crate::handlers::orders::get_orders,
        crate::handlers::orders::create_order,
        crate::handlers::orders::get_order,
        crate::handlers::orders::update_order,
        crate::handlers::orders::patch_order_status,
        crate::handlers::orders::delete_order,
    ),
    components(schemas(
        ErrorResponse,
        HealthResponse,
        ListQuery,
        crate::handlers::auth::LoginRequest,
        crate::handlers::auth::TokenResponse,
        crate::handlers::auth::AuthFailure,
        crate::handlers::auth::SignupRequest,
        crate::handlers::auth::SignupResponse,
        crate::handlers::users::UserResponse,
        crate::handlers::users::UserListResponse,
        crate::handlers::users::CreateUserRequest,
        crate::handlers::users::UpdateUserRequest,
        crate::handlers::items::ItemResponse,
        crate::handlers::items::ItemListResponse,
        crate::handlers::items::CreateItemRequest,
        crate::handlers::items::UpdateItemRequest,
        crate::handlers::orders::OrderResponse,
        crate::handlers::orders::OrderWithClientResponse,
        crate::handlers::orders::OrderLine,
        crate::handlers::orders::OrderLineRequest,
        crate::handlers::orders::CreateOrderRequest,
        crate::handlers::orders::UpdateOrderRequest,
        crate::handlers::orders::PatchOrderStatusRequest,
    )),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Login and signup endpoints"),
        (name = "users", description = "User management endpoints (admin only)"),
        (name = "items", description = "Item catalogue endpoints"),
        (name = "orders", description = "Order management endpoints"),
    ),
    info(
        title = "ShopRust API",
        description = "Role-based shop API managing users, items and orders behind JWT authentication",
        version = "0.1.0",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;
