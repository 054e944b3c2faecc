use std::time::Duration;

use anyhow::Result;
use bson::{Document, doc, oid::ObjectId};
use mongodb::{
    Client, Collection, Database, IndexModel,
    options::{ClientOptions, IndexOptions},
};

use crate::{
    config::AppConfig,
    error::{AppError, AppResult},
    models::{Cart, Category, Order, Product, User},
};

/// Connect to MongoDB and ping it, so a bad `MONGO_URI` fails at startup
/// instead of on the first request.
pub async fn connect(config: &AppConfig) -> Result<Database> {
    let mut options = ClientOptions::parse(&config.mongo_uri).await?;
    options.app_name = Some("storefront-api".to_string());
    options.server_selection_timeout = Some(Duration::from_secs(5));
    options.connect_timeout = Some(Duration::from_secs(10));

    let client = Client::with_options(options)?;
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await?;
    tracing::info!(db = %config.db_name, "connected to MongoDB");

    Ok(client.database(&config.db_name))
}

/// Index bootstrap, run once at startup. The unique email index is what
/// backs the duplicate-registration check under concurrency.
pub async fn ensure_indexes(db: &Database) -> Result<()> {
    users(db).create_index(unique_index(doc! { "email": 1 })).await?;
    carts(db)
        .create_index(unique_index(doc! { "user_id": 1 }))
        .await?;
    categories(db)
        .create_index(unique_index(doc! { "slug": 1 }))
        .await?;
    orders(db)
        .create_index(IndexModel::builder().keys(doc! { "user_id": 1 }).build())
        .await?;
    Ok(())
}

fn unique_index(keys: Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

pub fn users(db: &Database) -> Collection<User> {
    db.collection("users")
}

pub fn products(db: &Database) -> Collection<Product> {
    db.collection("products")
}

pub fn carts(db: &Database) -> Collection<Cart> {
    db.collection("carts")
}

pub fn orders(db: &Database) -> Collection<Order> {
    db.collection("orders")
}

pub fn categories(db: &Database) -> Collection<Category> {
    db.collection("categories")
}

pub fn parse_object_id(value: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(value).map_err(|_| AppError::Validation(format!("invalid id: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_ids_are_a_validation_error() {
        assert!(matches!(
            parse_object_id("not-a-hex-id"),
            Err(AppError::Validation(_))
        ));

        let id = ObjectId::new();
        assert_eq!(parse_object_id(&id.to_hex()).unwrap(), id);
    }
}
