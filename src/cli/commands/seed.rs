use anyhow::Result;
use chrono::Utc;
use migration::{Migrator, MigratorTrait};
use model::entities::prelude::*;
use model::entities::user::Role;
use model::entities::{item, order, order_item, user};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, EntityTrait, Set};
use tracing::{debug, error, info, trace};

use crate::auth::password;

pub async fn seed_database(database_url: &str) -> Result<()> {
    trace!("Entering seed_database function");
    info!("Seeding database with demo data");
    debug!("Database URL: {}", database_url);

    let db: DatabaseConnection = match Database::connect(database_url).await {
        Ok(connection) => {
            info!("Successfully connected to database");
            connection
        }
        Err(e) => {
            error!("Failed to connect to database '{}': {}", database_url, e);
            return Err(e.into());
        }
    };

    info!("Running database migrations");
    Migrator::up(&db, None).await?;

    // Wipe child tables first so no cascade has to fire.
    info!("Removing existing data");
    OrderItem::delete_many().exec(&db).await?;
    Order::delete_many().exec(&db).await?;
    Item::delete_many().exec(&db).await?;
    User::delete_many().exec(&db).await?;

    info!("Creating demo users");
    let admin = user::ActiveModel {
        username: Set("user1".to_string()),
        fullname: Set("User One".to_string()),
        email: Set("user1@example.com".to_string()),
        password: Set(password::hash("password1")?),
        role: Set(Role::Admin),
        is_active: Set(true),
        joined_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    let owner = user::ActiveModel {
        username: Set("user2".to_string()),
        fullname: Set("User Two".to_string()),
        email: Set("user2@example.com".to_string()),
        password: Set(password::hash("password2")?),
        role: Set(Role::Owner),
        is_active: Set(true),
        joined_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    info!("Creating demo items");
    let item_rows = [
        ("Item 1", Decimal::new(999, 2), "Description for Item 1", 10),
        ("Item 2", Decimal::new(1999, 2), "Description for Item 2", 5),
    ];
    let mut created_items = Vec::with_capacity(item_rows.len());
    for (name, price, description, quantity) in item_rows {
        let created = item::ActiveModel {
            name: Set(name.to_string()),
            price: Set(price),
            description: Set(description.to_string()),
            quantity: Set(quantity),
            image: Set(String::new()),
            owner_id: Set(owner.id),
            ..Default::default()
        }
        .insert(&db)
        .await?;
        created_items.push(created);
    }

    info!("Creating demo order");
    let quantities = [2, 1];
    let total: Decimal = created_items
        .iter()
        .zip(quantities)
        .map(|(item_model, quantity)| item_model.price * Decimal::from(quantity))
        .sum();

    let order_model = order::ActiveModel {
        date: Set(Utc::now()),
        description: Set("Demo order".to_string()),
        status: Set(order::OrderStatus::Created),
        client_id: Set(admin.id),
        total: Set(total),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    for (item_model, quantity) in created_items.iter().zip(quantities) {
        order_item::ActiveModel {
            order_id: Set(order_model.id),
            item_id: Set(item_model.id),
            quantity: Set(quantity),
            ..Default::default()
        }
        .insert(&db)
        .await?;
    }

    info!("Database seeding completed");
    Ok(())
}
