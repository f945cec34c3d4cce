use axum::{extract::State, http::StatusCode, response::Json};
use chrono::{DateTime, Utc};
use model::entities::order::{self, OrderStatus};
use model::entities::order_item;
use model::entities::prelude::*;
use model::entities::user::Role;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, EntityTrait, LoaderTrait, ModelTrait, QueryFilter,
    Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;

use crate::auth::extract::AuthUser;
use crate::auth::policy::require_role;
use crate::error::{ApiError, IdPath};
use crate::handlers::users::{user_with_orders, UserResponse};
use crate::schemas::{AppState, ErrorResponse};

/// One requested order line: an item id plus the ordered quantity
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct OrderLineRequest {
    pub item: i32,
    pub quantity: i32,
}

/// Request body for placing an order
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    /// Defaults to the current time
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: String,
    /// "Created" or "Cancelled", defaults to "Created"
    pub status: Option<String>,
    /// Order total as a decimal string, defaults to zero
    pub total: Option<Decimal>,
    #[serde(default)]
    pub items_order: Vec<OrderLineRequest>,
}

/// Request body for replacing the mutable parts of an order
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    pub description: Option<String>,
    pub status: Option<String>,
    pub total: Option<Decimal>,
    /// Replaces all existing lines when present
    pub items_order: Option<Vec<OrderLineRequest>>,
}

/// Request body for changing just the order status
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PatchOrderStatusRequest {
    pub status: Option<String>,
}

/// One stored order line
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderLine {
    pub item: i32,
    pub quantity: i32,
}

impl From<order_item::Model> for OrderLine {
    fn from(model: order_item::Model) -> Self {
        Self {
            item: model.item_id,
            quantity: model.quantity,
        }
    }
}

/// Order response model, client referenced by id
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: i32,
    pub date: DateTime<Utc>,
    pub description: String,
    /// "Created" or "Cancelled"
    pub status: String,
    /// Id of the user who placed the order
    pub client: i32,
    pub total: Decimal,
    pub items_order: Vec<OrderLine>,
}

impl OrderResponse {
    fn new(model: order::Model, lines: Vec<order_item::Model>) -> Self {
        Self {
            id: model.id,
            date: model.date,
            description: model.description,
            status: model.status.to_value(),
            client: model.client_id,
            total: model.total,
            items_order: lines.into_iter().map(OrderLine::from).collect(),
        }
    }
}

/// Order response model with the client embedded
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithClientResponse {
    pub id: i32,
    pub date: DateTime<Utc>,
    pub description: String,
    /// "Created" or "Cancelled"
    pub status: String,
    /// The user who placed the order, or null if it cannot be loaded
    pub client: Option<UserResponse>,
    pub total: Decimal,
    pub items_order: Vec<OrderLine>,
}

impl OrderWithClientResponse {
    fn new(
        model: order::Model,
        lines: Vec<order_item::Model>,
        client: Option<UserResponse>,
    ) -> Self {
        Self {
            id: model.id,
            date: model.date,
            description: model.description,
            status: model.status.to_value(),
            client,
            total: model.total,
            items_order: lines.into_iter().map(OrderLine::from).collect(),
        }
    }
}

fn parse_order_status(raw: &str) -> Result<OrderStatus, ApiError> {
    match raw {
        "Created" => Ok(OrderStatus::Created),
        "Cancelled" => Ok(OrderStatus::Cancelled),
        other => {
            warn!("Rejecting unknown order status: {}", other);
            Err(ApiError::InvalidRequest)
        }
    }
}

/// Place a new order as the calling client
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    tag = "orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created successfully", body = OrderResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not a client", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn create_order(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    trace!("Entering create_order function");
    require_role(&claims, &[Role::Client])?;
    debug!("Creating order for client {}", claims.sub);

    let status = match request.status.as_deref() {
        Some(raw) => parse_order_status(raw)?,
        None => OrderStatus::Created,
    };

    // Order and lines land together or not at all.
    let txn = state.db.begin().await?;

    let new_order = order::ActiveModel {
        date: Set(request.date.unwrap_or_else(Utc::now)),
        description: Set(request.description),
        status: Set(status),
        client_id: Set(claims.sub),
        total: Set(request.total.unwrap_or(Decimal::ZERO)),
        ..Default::default()
    };

    let order_model = match new_order.insert(&txn).await {
        Ok(model) => model,
        Err(db_error) => {
            warn!("Failed to create order: {}", db_error);
            return Err(ApiError::InvalidRequest);
        }
    };

    let mut lines = Vec::with_capacity(request.items_order.len());
    for line in request.items_order {
        let inserted = order_item::ActiveModel {
            order_id: Set(order_model.id),
            item_id: Set(line.item),
            quantity: Set(line.quantity),
            ..Default::default()
        }
        .insert(&txn)
        .await;

        match inserted {
            Ok(model) => lines.push(model),
            Err(db_error) => {
                // Dropping the transaction rolls the order back too.
                warn!("Failed to create order line: {}", db_error);
                return Err(ApiError::InvalidRequest);
            }
        }
    }

    txn.commit().await?;

    info!(
        "Order created with id: {} for client {}",
        order_model.id, claims.sub
    );
    Ok((
        StatusCode::CREATED,
        Json(OrderResponse::new(order_model, lines)),
    ))
}

/// List all orders with their clients embedded
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    tag = "orders",
    responses(
        (status = 200, description = "Orders retrieved successfully", body = [OrderWithClientResponse]),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_orders(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<Vec<OrderWithClientResponse>>, ApiError> {
    trace!("Entering get_orders function");
    require_role(&claims, &[Role::Admin])?;

    let orders = Order::find().all(&state.db).await?;
    let lines = orders.load_many(OrderItem, &state.db).await?;
    let clients = orders.load_one(User, &state.db).await?;

    let mut responses = Vec::with_capacity(orders.len());
    for ((order_model, order_lines), client) in orders.into_iter().zip(lines).zip(clients) {
        let client = match client {
            Some(user_model) => Some(user_with_orders(&state.db, user_model).await?),
            None => None,
        };
        responses.push(OrderWithClientResponse::new(order_model, order_lines, client));
    }

    info!("Retrieved {} orders", responses.len());
    Ok(Json(responses))
}

/// Get a specific order by ID with the client embedded
#[utoipa::path(
    get,
    path = "/api/v1/orders/{order_id}",
    tag = "orders",
    params(
        ("order_id" = i32, Path, description = "Order ID"),
    ),
    responses(
        (status = 200, description = "Order retrieved successfully", body = OrderWithClientResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_order(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    IdPath(order_id): IdPath,
) -> Result<Json<OrderWithClientResponse>, ApiError> {
    trace!("Entering get_order function for order_id: {}", order_id);
    require_role(&claims, &[Role::Admin])?;

    let order_model = Order::find_by_id(order_id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound("Order"))?;

    let lines = order_model.find_related(OrderItem).all(&state.db).await?;
    let client = match order_model.find_related(User).one(&state.db).await? {
        Some(user_model) => Some(user_with_orders(&state.db, user_model).await?),
        None => None,
    };

    debug!("Found order {} with {} lines", order_id, lines.len());
    Ok(Json(OrderWithClientResponse::new(order_model, lines, client)))
}

/// Update an order
#[utoipa::path(
    put,
    path = "/api/v1/orders/{order_id}",
    tag = "orders",
    params(
        ("order_id" = i32, Path, description = "Order ID"),
    ),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Order updated successfully", body = OrderResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn update_order(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    IdPath(order_id): IdPath,
    Json(request): Json<UpdateOrderRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    trace!("Entering update_order function for order_id: {}", order_id);
    require_role(&claims, &[Role::Admin])?;

    let existing = Order::find_by_id(order_id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound("Order"))?;

    let status = match request.status.as_deref() {
        Some(raw) => Some(parse_order_status(raw)?),
        None => None,
    };

    let txn = state.db.begin().await?;

    let updated = if request.description.is_none() && status.is_none() && request.total.is_none() {
        debug!("No order fields to update for order {}", order_id);
        existing
    } else {
        let mut order_active: order::ActiveModel = existing.into();
        if let Some(description) = request.description {
            order_active.description = Set(description);
        }
        if let Some(status) = status {
            order_active.status = Set(status);
        }
        if let Some(total) = request.total {
            order_active.total = Set(total);
        }

        match order_active.update(&txn).await {
            Ok(model) => model,
            Err(db_error) => {
                warn!("Failed to update order {}: {}", order_id, db_error);
                return Err(ApiError::InvalidRequest);
            }
        }
    };

    let lines = if let Some(new_lines) = request.items_order {
        // Wholesale replacement of the lines.
        OrderItem::delete_many()
            .filter(order_item::Column::OrderId.eq(order_id))
            .exec(&txn)
            .await?;

        let mut inserted_lines = Vec::with_capacity(new_lines.len());
        for line in new_lines {
            let inserted = order_item::ActiveModel {
                order_id: Set(order_id),
                item_id: Set(line.item),
                quantity: Set(line.quantity),
                ..Default::default()
            }
            .insert(&txn)
            .await;

            match inserted {
                Ok(model) => inserted_lines.push(model),
                Err(db_error) => {
                    warn!("Failed to replace order line: {}", db_error);
                    return Err(ApiError::InvalidRequest);
                }
            }
        }
        inserted_lines
    } else {
        updated.find_related(OrderItem).all(&txn).await?
    };

    txn.commit().await?;

    info!("Order {} updated", order_id);
    Ok(Json(OrderResponse::new(updated, lines)))
}

/// Change the status of an order
#[utoipa::path(
    patch,
    path = "/api/v1/orders/{order_id}",
    tag = "orders",
    params(
        ("order_id" = i32, Path, description = "Order ID"),
    ),
    request_body = PatchOrderStatusRequest,
    responses(
        (status = 200, description = "Order status updated", body = OrderResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn patch_order_status(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    IdPath(order_id): IdPath,
    Json(request): Json<PatchOrderStatusRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    trace!(
        "Entering patch_order_status function for order_id: {}",
        order_id
    );
    require_role(&claims, &[Role::Admin])?;

    let existing = Order::find_by_id(order_id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound("Order"))?;

    let updated = match request.status.as_deref() {
        Some(raw) => {
            let status = parse_order_status(raw)?;
            let mut order_active: order::ActiveModel = existing.into();
            order_active.status = Set(status);
            match order_active.update(&state.db).await {
                Ok(model) => model,
                Err(db_error) => {
                    warn!("Failed to patch order {}: {}", order_id, db_error);
                    return Err(ApiError::InvalidRequest);
                }
            }
        }
        // Absent status leaves the order untouched.
        None => existing,
    };

    let lines = updated.find_related(OrderItem).all(&state.db).await?;

    info!("Order {} status is now {:?}", order_id, updated.status);
    Ok(Json(OrderResponse::new(updated, lines)))
}

/// Delete an order
#[utoipa::path(
    delete,
    path = "/api/v1/orders/{order_id}",
    tag = "orders",
    params(
        ("order_id" = i32, Path, description = "Order ID"),
    ),
    responses(
        (status = 204, description = "Order deleted successfully"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_order(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    IdPath(order_id): IdPath,
) -> Result<StatusCode, ApiError> {
    trace!("Entering delete_order function for order_id: {}", order_id);
    require_role(&claims, &[Role::Admin])?;

    let delete_result = Order::delete_by_id(order_id).exec(&state.db).await?;
    if delete_result.rows_affected == 0 {
        warn!("Order {} not found for deletion", order_id);
        return Err(ApiError::NotFound("Order"));
    }

    info!("Order {} deleted", order_id);
    Ok(StatusCode::NO_CONTENT)
}
