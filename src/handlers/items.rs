use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use model::entities::item;
use model::entities::prelude::*;
use model::entities::user::Role;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set, TryIntoModel,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::auth::extract::AuthUser;
use crate::auth::policy::{require_item_owner, require_role};
use crate::error::{ApiError, IdPath};
use crate::helpers::paging::{contains_ci, fetch_page};
use crate::schemas::{AppState, ErrorResponse, ListQuery};

/// Request body for listing a new item
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateItemRequest {
    #[serde(default)]
    pub name: String,
    /// Unit price, sent as a decimal string
    #[serde(default)]
    #[validate(custom(function = "validate_price", message = "Price must not be negative"))]
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    #[validate(range(min = 0, message = "Quantity must not be negative"))]
    pub quantity: i32,
    #[serde(default)]
    pub image: String,
}

/// Request body for updating an item. Absent fields keep their value.
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    #[validate(custom(function = "validate_price", message = "Price must not be negative"))]
    pub price: Option<Decimal>,
    pub description: Option<String>,
    #[validate(range(min = 0, message = "Quantity must not be negative"))]
    pub quantity: Option<i32>,
    pub image: Option<String>,
}

/// Item response model
#[derive(Debug, Serialize, ToSchema)]
pub struct ItemResponse {
    pub id: i32,
    pub name: String,
    /// Unit price as a decimal string
    pub price: Decimal,
    pub description: String,
    pub quantity: i32,
    pub image: String,
    /// Id of the owning user
    pub owner: i32,
}

impl From<item::Model> for ItemResponse {
    fn from(model: item::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            price: model.price,
            description: model.description,
            quantity: model.quantity,
            image: model.image,
            owner: model.owner_id,
        }
    }
}

/// Paginated item listing
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemListResponse {
    pub items: Vec<ItemResponse>,
    pub current_page: u64,
    pub total_pages: u64,
    pub total_count: u64,
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() {
        return Err(ValidationError::new("price"));
    }
    Ok(())
}

/// List items, filtered and paginated
#[utoipa::path(
    get,
    path = "/api/v1/items",
    tag = "items",
    params(ListQuery),
    responses(
        (status = 200, description = "Items retrieved successfully", body = ItemListResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_items(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ItemListResponse>, ApiError> {
    trace!("Entering get_items function");
    debug!("Listing items with query: {:?}", query);

    let mut select = Item::find().order_by_asc(item::Column::Id);
    if let Some(q) = query.q.as_deref().filter(|q| !q.is_empty()) {
        select = select.filter(contains_ci(item::Column::Name, q));
    }

    let page = fetch_page(&state.db, select, &query).await?;

    let items: Vec<ItemResponse> = page.rows.into_iter().map(ItemResponse::from).collect();
    info!("Retrieved {} of {} items", items.len(), page.total_count);

    Ok(Json(ItemListResponse {
        items,
        current_page: page.current_page,
        total_pages: page.total_pages,
        total_count: page.total_count,
    }))
}

/// Create a new item owned by the caller
#[utoipa::path(
    post,
    path = "/api/v1/items",
    tag = "items",
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item created successfully", body = ItemResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is neither admin nor owner", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn create_item(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Valid(Json(request)): Valid<Json<CreateItemRequest>>,
) -> Result<(StatusCode, Json<ItemResponse>), ApiError> {
    trace!("Entering create_item function");
    require_role(&claims, &[Role::Admin, Role::Owner])?;
    debug!("Creating item '{}' for user {}", request.name, claims.sub);

    // Ownership comes from the token, not the payload.
    let new_item = item::ActiveModel {
        name: Set(request.name),
        price: Set(request.price),
        description: Set(request.description),
        quantity: Set(request.quantity),
        image: Set(request.image),
        owner_id: Set(claims.sub),
        ..Default::default()
    };

    let item_model = match new_item.insert(&state.db).await {
        Ok(model) => model,
        Err(db_error) => {
            warn!("Failed to create item: {}", db_error);
            return Err(ApiError::InvalidRequest);
        }
    };

    info!(
        "Item created with id: {}, owner: {}",
        item_model.id, item_model.owner_id
    );
    Ok((StatusCode::CREATED, Json(ItemResponse::from(item_model))))
}

/// Get a specific item by ID
#[utoipa::path(
    get,
    path = "/api/v1/items/{item_id}",
    tag = "items",
    params(
        ("item_id" = i32, Path, description = "Item ID"),
    ),
    responses(
        (status = 200, description = "Item retrieved successfully", body = ItemResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_item(
    State(state): State<AppState>,
    IdPath(item_id): IdPath,
) -> Result<Json<ItemResponse>, ApiError> {
    trace!("Entering get_item function for item_id: {}", item_id);

    let item_model = Item::find_by_id(item_id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound("Item"))?;

    debug!("Found item: {}", item_model.name);
    Ok(Json(ItemResponse::from(item_model)))
}

/// Update an item owned by the caller
#[utoipa::path(
    put,
    path = "/api/v1/items/{item_id}",
    tag = "items",
    params(
        ("item_id" = i32, Path, description = "Item ID"),
    ),
    request_body = UpdateItemRequest,
    responses(
        (status = 203, description = "Item updated successfully", body = ItemResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller does not own this item", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn update_item(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    IdPath(item_id): IdPath,
    Valid(Json(request)): Valid<Json<UpdateItemRequest>>,
) -> Result<(StatusCode, Json<ItemResponse>), ApiError> {
    trace!("Entering update_item function for item_id: {}", item_id);

    let item_model = require_item_owner(&state.db, &claims, item_id).await?;

    let mut item_active: item::ActiveModel = item_model.into();
    let mut changed = false;
    if let Some(name) = request.name {
        item_active.name = Set(name);
        changed = true;
    }
    if let Some(price) = request.price {
        item_active.price = Set(price);
        changed = true;
    }
    if let Some(description) = request.description {
        item_active.description = Set(description);
        changed = true;
    }
    if let Some(quantity) = request.quantity {
        item_active.quantity = Set(quantity);
        changed = true;
    }
    if let Some(image) = request.image {
        item_active.image = Set(image);
        changed = true;
    }

    let updated = if changed {
        match item_active.update(&state.db).await {
            Ok(model) => model,
            Err(db_error) => {
                warn!("Failed to update item {}: {}", item_id, db_error);
                return Err(ApiError::InvalidRequest);
            }
        }
    } else {
        debug!("No fields to update for item {}", item_id);
        item_active.try_into_model()?
    };

    info!("Item {} updated by owner {}", item_id, claims.sub);
    // 203 on update is long-standing observable behavior, kept as is.
    Ok((
        StatusCode::NON_AUTHORITATIVE_INFORMATION,
        Json(ItemResponse::from(updated)),
    ))
}

/// Delete an item owned by the caller
#[utoipa::path(
    delete,
    path = "/api/v1/items/{item_id}",
    tag = "items",
    params(
        ("item_id" = i32, Path, description = "Item ID"),
    ),
    responses(
        (status = 204, description = "Item deleted successfully"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller does not own this item", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_item(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    IdPath(item_id): IdPath,
) -> Result<StatusCode, ApiError> {
    trace!("Entering delete_item function for item_id: {}", item_id);

    let item_model = require_item_owner(&state.db, &claims, item_id).await?;
    item_model.delete(&state.db).await?;

    info!("Item {} deleted by owner {}", item_id, claims.sub);
    Ok(StatusCode::NO_CONTENT)
}
