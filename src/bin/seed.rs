use bson::{doc, oid::ObjectId};
use chrono::Utc;
use storefront_api::{
    config::AppConfig,
    db,
    models::{Category, Product, Role, User},
    services::auth_service::hash_password,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let database = db::connect(&config).await?;
    db::ensure_indexes(&database).await?;

    let admin_id = ensure_admin(&database, "admin@ecommerce.com", "admin123").await?;
    seed_categories(&database).await?;
    seed_products(&database).await?;

    println!("Seed completed. Admin ID: {admin_id}");
    Ok(())
}

async fn ensure_admin(
    database: &mongodb::Database,
    email: &str,
    password: &str,
) -> anyhow::Result<ObjectId> {
    let users = db::users(database);
    if let Some(existing) = users.find_one(doc! { "email": email }).await? {
        println!("Admin {email} already present");
        return Ok(existing.id);
    }

    let now = Utc::now();
    let admin = User {
        id: ObjectId::new(),
        name: "Admin User".to_string(),
        email: email.to_string(),
        password_hash: hash_password(password)?,
        role: Role::Admin,
        phone: None,
        address: None,
        created_at: now,
        updated_at: now,
    };
    users.insert_one(&admin).await?;

    println!("Ensured admin {email}");
    Ok(admin.id)
}

async fn seed_categories(database: &mongodb::Database) -> anyhow::Result<()> {
    let categories = db::categories(database);
    if categories.count_documents(doc! {}).await? > 0 {
        return Ok(());
    }

    let seeded: Vec<Category> = [
        ("Smartphones", "smartphones"),
        ("Laptops", "laptops"),
        ("Accessories", "accessories"),
    ]
    .into_iter()
    .map(|(name, slug)| Category {
        id: ObjectId::new(),
        name: name.to_string(),
        slug: slug.to_string(),
        is_active: true,
    })
    .collect();

    categories.insert_many(&seeded).await?;
    println!("Seeded categories");
    Ok(())
}

async fn seed_products(database: &mongodb::Database) -> anyhow::Result<()> {
    let products = db::products(database);
    if products.count_documents(doc! {}).await? > 0 {
        return Ok(());
    }

    let catalog = vec![
        (
            "iPhone 15 Pro Max",
            "6.7-inch Super Retina XDR display, Titanium design, A17 Pro chip",
            1199.99,
            doc! {
                "storage": "256GB",
                "color": "Natural Titanium",
                "screen": "6.7 inch",
                "camera": "48MP Main",
            },
        ),
        (
            "Samsung Galaxy S24 Ultra",
            "Galaxy AI, Snapdragon 8 Gen 3, 200MP camera",
            1299.99,
            doc! {
                "storage": "512GB",
                "color": "Titanium Black",
                "screen": "6.8 inch",
                "camera": "200MP",
            },
        ),
        (
            "Google Pixel 8 Pro",
            "Google AI, Tensor G3 chip, Best-in-class camera",
            999.99,
            doc! {
                "storage": "128GB",
                "color": "Obsidian",
                "screen": "6.7 inch",
                "camera": "50MP",
            },
        ),
        (
            "OnePlus 12",
            "Snapdragon 8 Gen 3, Hasselblad camera, 100W charging",
            799.99,
            doc! {
                "storage": "256GB",
                "color": "Silky Black",
                "screen": "6.82 inch",
                "camera": "50MP",
            },
        ),
        (
            "Xiaomi 14 Pro",
            "Leica camera system, Snapdragon 8 Gen 3, HyperOS",
            899.99,
            doc! {
                "storage": "512GB",
                "color": "Black",
                "screen": "6.73 inch",
                "camera": "50MP Leica",
            },
        ),
        (
            "Nothing Phone 2",
            "Glyph interface, Snapdragon 8+ Gen 1, transparent design",
            599.99,
            doc! {
                "storage": "256GB",
                "color": "White",
                "screen": "6.7 inch",
                "camera": "50MP",
            },
        ),
    ];

    let now = Utc::now();
    let seeded: Vec<Product> = catalog
        .into_iter()
        .map(|(name, description, price, specifications)| Product {
            id: ObjectId::new(),
            name: name.to_string(),
            description: Some(description.to_string()),
            price,
            category: "Smartphones".to_string(),
            images: Vec::new(),
            specifications,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
        .collect();

    products.insert_many(&seeded).await?;
    println!("Seeded products");
    Ok(())
}
