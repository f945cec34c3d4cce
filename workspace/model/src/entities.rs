//! This file serves as the root for all SeaORM entity modules.
//! The data model covers the shop's three resources (users, items,
//! orders) plus the order line join table, adapted for Rust's type
//! system and the SeaORM framework.

pub mod item;
pub mod order;
pub mod order_item;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::item::Entity as Item;
    pub use super::order::Entity as Order;
    pub use super::order_item::Entity as OrderItem;
    pub use super::user::Entity as User;
}
