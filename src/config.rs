use anyhow::{Context, Result};
use sea_orm::Database;

use crate::auth::jwt::TokenService;
use crate::schemas::AppState;

/// Initialize application state against the given database URL.
///
/// `JWT_SECRET` is read from the environment and has no fallback: the
/// process refuses to start rather than sign tokens with a known key.
pub async fn initialize_app_state_with_url(database_url: &str) -> Result<AppState> {
    // Load configuration
    dotenvy::dotenv().ok();
    let jwt_secret = std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?;

    // Connect to database
    tracing::info!("Connecting to database: {}", database_url);
    let db = Database::connect(database_url).await?;

    Ok(AppState {
        db,
        tokens: TokenService::new(&jwt_secret),
    })
}
