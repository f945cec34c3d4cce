use model::entities::item;
use model::entities::prelude::*;
use model::entities::user::Role;
use sea_orm::{DatabaseConnection, EntityTrait};
use tracing::{debug, trace, warn};

use crate::auth::jwt::Claims;
use crate::error::ApiError;

/// Allow the request only if the caller's role is in the allow-list.
///
/// Pure predicate over already-verified claims; routes compose it with
/// [`require_item_owner`] explicitly instead of relying on middleware
/// ordering.
pub fn require_role(claims: &Claims, allowed: &[Role]) -> Result<(), ApiError> {
    trace!("Checking role {:?} against allow-list {:?}", claims.role, allowed);
    if allowed.contains(&claims.role) {
        Ok(())
    } else {
        warn!(
            "User {} with role {:?} denied, requires one of {:?}",
            claims.sub, claims.role, allowed
        );
        Err(ApiError::Forbidden)
    }
}

/// Load the addressed item and allow the request only if the caller owns
/// it. Returns the loaded item so the handler does not fetch it twice.
///
/// Ownership gating exists for items only; orders are role-gated.
pub async fn require_item_owner(
    db: &DatabaseConnection,
    claims: &Claims,
    item_id: i32,
) -> Result<item::Model, ApiError> {
    trace!("Loading item {} for ownership check", item_id);
    let item = Item::find_by_id(item_id)
        .one(db)
        .await?
        .ok_or(ApiError::NotFound("Item"))?;

    if item.owner_id != claims.sub {
        warn!(
            "User {} is not the owner of item {} (owner is {})",
            claims.sub, item_id, item.owner_id
        );
        return Err(ApiError::Forbidden);
    }

    debug!("User {} authorized as owner of item {}", claims.sub, item_id);
    Ok(item)
}
