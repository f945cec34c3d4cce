use axum::{extract::State, http::StatusCode, response::Json};
use axum_valid::Valid;
use chrono::Utc;
use model::entities::prelude::*;
use model::entities::user;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::password;
use crate::handlers::users::{parse_role, validate_role, UserResponse};
use crate::schemas::AppState;

/// Request body for logging in
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    pub password: String,
}

/// Successful login response
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// Bearer token, valid for one hour
    pub token: String,
}

/// Login or signup failure body
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthFailure {
    pub err: String,
}

/// Request body for signing up
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
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

/// Signup response wraps the created user
#[derive(Debug, Serialize, ToSchema)]
pub struct SignupResponse {
    pub user: UserResponse,
}

fn auth_failure(message: &str) -> (StatusCode, Json<AuthFailure>) {
    (
        StatusCode::BAD_REQUEST,
        Json(AuthFailure {
            err: message.to_string(),
        }),
    )
}

/// Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Validation failed or credentials rejected", body = AuthFailure)
    )
)]
#[instrument(skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<LoginRequest>>,
) -> Result<Json<TokenResponse>, (StatusCode, Json<AuthFailure>)> {
    trace!("Entering login function");
    debug!("Login attempt for username: {}", request.username);

    let lookup = User::find()
        .filter(user::Column::Username.eq(&request.username))
        .one(&state.db)
        .await;

    let user_model = match lookup {
        Ok(Some(model)) => model,
        Ok(None) => {
            warn!("Login failed, no such user: {}", request.username);
            return Err(auth_failure("user not found"));
        }
        Err(db_error) => {
            error!("Login lookup failed: {}", db_error);
            return Err(auth_failure("400 Not Found"));
        }
    };

    match password::verify(&request.password, &user_model.password) {
        Ok(true) => {}
        Ok(false) => {
            warn!("Login failed, wrong password for: {}", request.username);
            return Err(auth_failure("invalid password"));
        }
        Err(hash_error) => {
            error!(
                "Stored hash for {} is unreadable: {}",
                request.username, hash_error
            );
            return Err(auth_failure("400 Not Found"));
        }
    }

    let token = match state.tokens.issue(&user_model) {
        Ok(token) => token,
        Err(jwt_error) => {
            error!("Token signing failed for {}: {}", request.username, jwt_error);
            return Err(auth_failure("400 Not Found"));
        }
    };

    info!("User {} logged in", user_model.username);
    Ok(Json(TokenResponse { token }))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    tag = "auth",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User registered successfully", body = SignupResponse),
        (status = 400, description = "Validation failed or username taken", body = AuthFailure)
    )
)]
#[instrument(skip(state, request))]
pub async fn signup(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<SignupRequest>>,
) -> Result<(StatusCode, Json<SignupResponse>), (StatusCode, Json<AuthFailure>)> {
    trace!("Entering signup function");
    debug!("Signup attempt for username: {}", request.username);

    let existing = User::find()
        .filter(user::Column::Username.eq(&request.username))
        .one(&state.db)
        .await;

    match existing {
        Ok(Some(_)) => {
            warn!("Signup rejected, username taken: {}", request.username);
            return Err(auth_failure("User with this username exists!!"));
        }
        Ok(None) => {}
        Err(db_error) => {
            error!("Signup lookup failed: {}", db_error);
            return Err(auth_failure("Invalid request"));
        }
    }

    let Some(role) = parse_role(&request.role) else {
        // Unreachable past validation, kept as a guard for the insert below.
        return Err(auth_failure("Invalid role"));
    };

    let hashed = match password::hash(&request.password) {
        Ok(hashed) => hashed,
        Err(hash_error) => {
            error!("Password hashing failed during signup: {}", hash_error);
            return Err(auth_failure("Invalid request"));
        }
    };

    let new_user = user::ActiveModel {
        username: Set(request.username),
        fullname: Set(request.fullname),
        email: Set(request.email),
        password: Set(hashed),
        role: Set(role),
        is_active: Set(request.is_active.unwrap_or(true)),
        joined_at: Set(Utc::now()),
        ..Default::default()
    };

    let user_model = match new_user.insert(&state.db).await {
        Ok(model) => model,
        Err(db_error) => {
            warn!("Signup insert failed: {}", db_error);
            return Err(auth_failure("Invalid request"));
        }
    };

    info!(
        "User registered with id: {}, username: {}",
        user_model.id, user_model.username
    );
    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            user: UserResponse::new(user_model, Vec::new()),
        }),
    ))
}
