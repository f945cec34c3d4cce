use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{DateTime, Utc};
use model::entities::prelude::*;
use model::entities::user::{self, Role};
use sea_orm::{
    ActiveEnum, ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, LoaderTrait, ModelTrait,
    QueryFilter, QueryOrder, Set, TryIntoModel,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::auth::extract::AuthUser;
use crate::auth::password;
use crate::auth::policy::require_role;
use crate::error::{ApiError, IdPath};
use crate::helpers::paging::{contains_ci, fetch_page};
use crate::schemas::{AppState, ErrorResponse, ListQuery};

/// Request body for creating a new user
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// Username (must be unique)
    #[serde(default)]
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "fullname is required"))]
    pub fullname: String,
    #[serde(default)]
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Plaintext password, stored only as an Argon2id hash
    #[serde(default)]
    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    pub password: String,
    /// Role name: Admin, Owner or Client
    #[serde(default)]
    #[validate(custom(function = "validate_role", message = "Invalid role"))]
    pub role: String,
    #[validate(required(message = "isActive must be a boolean value"))]
    pub is_active: Option<bool>,
}

/// Request body for updating a user. Absent fields keep their value.
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: Option<String>,
    #[validate(length(min = 1, message = "fullname is required"))]
    pub fullname: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    /// Replacement plaintext password, re-hashed before storage
    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    pub password: Option<String>,
    #[validate(custom(function = "validate_role", message = "Invalid role"))]
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

/// User response model (never includes the password hash)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub fullname: String,
    pub email: String,
    /// Role name: Admin, Owner or Client
    pub role: String,
    pub is_active: bool,
    pub joined_at: DateTime<Utc>,
    /// Ids of the orders placed by this user
    pub orders: Vec<i32>,
}

impl UserResponse {
    pub(crate) fn new(model: user::Model, orders: Vec<i32>) -> Self {
        Self {
            id: model.id,
            username: model.username,
            fullname: model.fullname,
            email: model.email,
            role: model.role.to_value(),
            is_active: model.is_active,
            joined_at: model.joined_at,
            orders,
        }
    }
}

/// Paginated user listing
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
    pub current_page: u64,
    pub total_pages: u64,
    pub total_count: u64,
}

pub(crate) fn parse_role(raw: &str) -> Option<Role> {
    match raw {
        "Admin" => Some(Role::Admin),
        "Owner" => Some(Role::Owner),
        "Client" => Some(Role::Client),
        _ => None,
    }
}

pub(crate) fn validate_role(role: &str) -> Result<(), ValidationError> {
    parse_role(role)
        .map(|_| ())
        .ok_or_else(|| ValidationError::new("role"))
}

/// Build the response for one user, including the ids of their orders.
pub(crate) async fn user_with_orders(
    db: &DatabaseConnection,
    model: user::Model,
) -> Result<UserResponse, DbErr> {
    let orders = model.find_related(Order).all(db).await?;
    Ok(UserResponse::new(
        model,
        orders.into_iter().map(|order| order.id).collect(),
    ))
}

/// List users, filtered and paginated
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    params(ListQuery),
    responses(
        (status = 200, description = "Users retrieved successfully", body = UserListResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_users(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<UserListResponse>, ApiError> {
    trace!("Entering get_users function");
    require_role(&claims, &[Role::Admin])?;
    debug!("Listing users with query: {:?}", query);

    let mut select = User::find().order_by_asc(user::Column::Id);
    if let Some(q) = query.q.as_deref().filter(|q| !q.is_empty()) {
        select = select.filter(contains_ci(user::Column::Username, q));
    }

    let page = fetch_page(&state.db, select, &query).await?;
    let related_orders = page.rows.load_many(Order, &state.db).await?;

    let users: Vec<UserResponse> = page
        .rows
        .into_iter()
        .zip(related_orders)
        .map(|(user, orders)| {
            UserResponse::new(user, orders.into_iter().map(|order| order.id).collect())
        })
        .collect();

    info!("Retrieved {} of {} users", users.len(), page.total_count);
    Ok(Json(UserListResponse {
        users,
        current_page: page.current_page,
        total_pages: page.total_pages,
        total_count: page.total_count,
    }))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(request))]
pub async fn create_user(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Valid(Json(request)): Valid<Json<CreateUserRequest>>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    trace!("Entering create_user function");
    require_role(&claims, &[Role::Admin])?;
    debug!("Creating user with username: {}", request.username);

    let role = parse_role(&request.role).ok_or(ApiError::InvalidRequest)?;
    let new_user = user::ActiveModel {
        username: Set(request.username),
        fullname: Set(request.fullname),
        email: Set(request.email),
        password: Set(password::hash(&request.password)?),
        role: Set(role),
        is_active: Set(request.is_active.unwrap_or(true)),
        joined_at: Set(Utc::now()),
        ..Default::default()
    };

    let user_model = match new_user.insert(&state.db).await {
        Ok(model) => model,
        Err(db_error) => {
            warn!("Failed to create user: {}", db_error);
            return Err(ApiError::InvalidRequest);
        }
    };

    info!(
        "User created with id: {}, username: {}",
        user_model.id, user_model.username
    );
    Ok((
        StatusCode::CREATED,
        Json(UserResponse::new(user_model, Vec::new())),
    ))
}

/// Get a specific user by ID
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "User retrieved successfully", body = UserResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    IdPath(user_id): IdPath,
) -> Result<Json<UserResponse>, ApiError> {
    trace!("Entering get_user function for user_id: {}", user_id);
    require_role(&claims, &[Role::Admin])?;

    let user_model = User::find_by_id(user_id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    debug!("Found user: {}", user_model.username);
    let response = user_with_orders(&state.db, user_model).await?;
    Ok(Json(response))
}

/// Update a user
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated successfully", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(request))]
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    IdPath(user_id): IdPath,
    Valid(Json(request)): Valid<Json<UpdateUserRequest>>,
) -> Result<Json<UserResponse>, ApiError> {
    trace!("Entering update_user function for user_id: {}", user_id);
    require_role(&claims, &[Role::Admin])?;

    let existing = User::find_by_id(user_id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    let mut user_active: user::ActiveModel = existing.into();
    let mut changed = false;
    if let Some(username) = request.username {
        user_active.username = Set(username);
        changed = true;
    }
    if let Some(fullname) = request.fullname {
        user_active.fullname = Set(fullname);
        changed = true;
    }
    if let Some(email) = request.email {
        user_active.email = Set(email);
        changed = true;
    }
    if let Some(password) = request.password {
        // The plaintext never reaches the users table.
        user_active.password = Set(password::hash(&password)?);
        changed = true;
    }
    if let Some(role) = request.role.as_deref() {
        user_active.role = Set(parse_role(role).ok_or(ApiError::InvalidRequest)?);
        changed = true;
    }
    if let Some(is_active) = request.is_active {
        user_active.is_active = Set(is_active);
        changed = true;
    }

    let updated = if changed {
        match user_active.update(&state.db).await {
            Ok(model) => model,
            Err(db_error) => {
                warn!("Failed to update user {}: {}", user_id, db_error);
                return Err(ApiError::InvalidRequest);
            }
        }
    } else {
        debug!("No fields to update for user {}", user_id);
        user_active.try_into_model()?
    };

    info!("User {} updated", user_id);
    let response = user_with_orders(&state.db, updated).await?;
    Ok(Json(response))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 204, description = "User deleted successfully"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_user(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    IdPath(user_id): IdPath,
) -> Result<StatusCode, ApiError> {
    trace!("Entering delete_user function for user_id: {}", user_id);
    require_role(&claims, &[Role::Admin])?;

    let delete_result = User::delete_by_id(user_id).exec(&state.db).await?;
    if delete_result.rows_affected == 0 {
        warn!("User {} not found for deletion", user_id);
        return Err(ApiError::NotFound("User"));
    }

    info!("User {} deleted", user_id);
    Ok(StatusCode::NO_CONTENT)
}
