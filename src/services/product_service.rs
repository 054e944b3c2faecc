use bson::{Document, doc, oid::ObjectId};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::options::ReturnDocument;

use crate::{
    db,
    dto::products::{
        CreateProductRequest, ProductListResponse, ProductQuery, ProductResponse,
        UpdateProductRequest,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Product,
    state::AppState,
};

/// Public catalog listing. Only active products are visible; category and
/// name-search filters narrow the result, and pagination kicks in only when
/// the caller asks for a page or a limit.
pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ProductListResponse> {
    let products = db::products(&state.db);
    let filter = build_filter(&query);

    let Some((page, limit, skip)) = query.window() else {
        let all: Vec<Product> = products
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .await?
            .try_collect()
            .await?;
        let total = all.len() as i64;
        return Ok(ProductListResponse {
            products: all.into_iter().map(Into::into).collect(),
            total,
            page: 1,
            pages: 1,
        });
    };

    let total = products.count_documents(filter.clone()).await? as i64;
    let page_items: Vec<Product> = products
        .find(filter)
        .sort(doc! { "created_at": -1 })
        .skip(skip)
        .limit(limit)
        .await?
        .try_collect()
        .await?;

    Ok(ProductListResponse {
        products: page_items.into_iter().map(Into::into).collect(),
        total,
        page,
        pages: (total + limit - 1) / limit,
    })
}

pub async fn get_product(state: &AppState, id: &str) -> AppResult<ProductResponse> {
    let oid = db::parse_object_id(id)?;
    let product = db::products(&state.db)
        .find_one(doc! { "_id": oid })
        .await?
        .ok_or(AppError::NotFound("Product not found"))?;

    Ok(ProductResponse {
        product: product.into(),
    })
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ProductResponse> {
    ensure_admin(user)?;

    let CreateProductRequest {
        name,
        description,
        price,
        category,
        images,
        specifications,
    } = payload;

    if name.is_empty() || category.is_empty() {
        return Err(AppError::Validation(
            "name and category are required".to_string(),
        ));
    }
    if price < 0.0 {
        return Err(AppError::Validation(
            "price must be non-negative".to_string(),
        ));
    }

    let now = Utc::now();
    let product = Product {
        id: ObjectId::new(),
        name,
        description: Some(description),
        price,
        category,
        images,
        specifications,
        is_active: true,
        created_at: now,
        updated_at: now,
    };

    db::products(&state.db).insert_one(&product).await?;
    tracing::info!(product_id = %product.id, "product created");

    Ok(ProductResponse {
        product: product.into(),
    })
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: &str,
    payload: UpdateProductRequest,
) -> AppResult<ProductResponse> {
    ensure_admin(user)?;

    let oid = db::parse_object_id(id)?;

    if let Some(price) = payload.price {
        if price < 0.0 {
            return Err(AppError::Validation(
                "price must be non-negative".to_string(),
            ));
        }
    }

    let mut changes = doc! { "updated_at": bson::DateTime::from_chrono(Utc::now()) };
    if let Some(name) = payload.name {
        changes.insert("name", name);
    }
    if let Some(description) = payload.description {
        changes.insert("description", description);
    }
    if let Some(price) = payload.price {
        changes.insert("price", price);
    }
    if let Some(category) = payload.category {
        changes.insert("category", category);
    }
    if let Some(images) = payload.images {
        changes.insert("images", images);
    }
    if let Some(specifications) = payload.specifications {
        changes.insert("specifications", specifications);
    }
    if let Some(is_active) = payload.is_active {
        changes.insert("is_active", is_active);
    }

    let updated = db::products(&state.db)
        .find_one_and_update(doc! { "_id": oid }, doc! { "$set": changes })
        .return_document(ReturnDocument::After)
        .await?
        .ok_or(AppError::NotFound("Product not found"))?;

    tracing::info!(product_id = %updated.id, "product updated");

    Ok(ProductResponse {
        product: updated.into(),
    })
}

fn build_filter(query: &ProductQuery) -> Document {
    let mut filter = doc! { "is_active": true };
    if let Some(category) = query.category.as_deref().filter(|c| !c.is_empty()) {
        filter.insert("category", category);
    }
    if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
        let regex = doc! { "$regex": search, "$options": "i" };
        filter.insert(
            "$or",
            vec![doc! { "name": regex.clone() }, doc! { "description": regex }],
        );
    }
    filter
}
