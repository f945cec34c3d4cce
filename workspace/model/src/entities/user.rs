use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Access level of an account. Stored as text so the column stays
/// readable in plain SQL and in exported dumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum Role {
    /// Full access to every resource, including user administration.
    #[sea_orm(string_value = "Admin")]
    Admin,
    /// May list items for sale and manage the items they own.
    #[sea_orm(string_value = "Owner")]
    Owner,
    /// May place orders.
    #[sea_orm(string_value = "Client")]
    Client,
}

/// Represents an account holder of the shop.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    pub fullname: String,
    #[sea_orm(unique)]
    pub email: String,
    /// Argon2id PHC string, never the plaintext.
    pub password: String,
    pub role: Role,
    #[sea_orm(default_value = "true")]
    pub is_active: bool,
    /// Set server-side when the account is created.
    pub joined_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Items listed by this user (Owner or Admin accounts).
    #[sea_orm(has_many = "super::item::Entity")]
    Item,
    /// Orders placed by this user (Client accounts).
    #[sea_orm(has_many = "super::order::Entity")]
    Order,
}

impl Related<super::item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Item.def()
    }
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
