use std::collections::HashMap;

use bson::{doc, oid::ObjectId};
use chrono::Utc;
use futures::TryStreamExt;

use crate::{
    db,
    dto::cart::{AddToCartRequest, CartItemView, CartResponse, CartView},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Cart, Product},
    state::AppState,
};

pub async fn view_cart(state: &AppState, user: &AuthUser) -> AppResult<CartResponse> {
    let cart = db::carts(&state.db)
        .find_one(doc! { "user_id": user.user_id })
        .await?;

    let view = match cart {
        Some(cart) => joined_view(state, &cart).await?,
        None => CartView {
            items: Vec::new(),
            total: 0.0,
        },
    };

    Ok(CartResponse { cart: view })
}

pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<CartResponse> {
    let product_id = db::parse_object_id(&payload.product_id)?;
    if payload.quantity < 1 {
        return Err(AppError::Validation(
            "quantity must be at least 1".to_string(),
        ));
    }

    let product = db::products(&state.db)
        .find_one(doc! { "_id": product_id })
        .await?
        .ok_or(AppError::NotFound("Product not found"))?;

    let mut cart = db::carts(&state.db)
        .find_one(doc! { "user_id": user.user_id })
        .await?
        .unwrap_or_else(|| Cart::empty(user.user_id));

    cart.add_item(product_id, payload.quantity, product.price);
    cart.updated_at = Utc::now();
    save_cart(state, user, &cart).await?;

    tracing::debug!(
        user_id = %user.user_id,
        product_id = %product_id,
        quantity = payload.quantity,
        "item added to cart"
    );

    Ok(CartResponse {
        cart: joined_view(state, &cart).await?,
    })
}

/// Removing a product that is not in the cart is a no-op; removing the last
/// line deletes the cart document itself.
pub async fn remove_from_cart(
    state: &AppState,
    user: &AuthUser,
    product_id: &str,
) -> AppResult<CartResponse> {
    let product_id = db::parse_object_id(product_id)?;

    let Some(mut cart) = db::carts(&state.db)
        .find_one(doc! { "user_id": user.user_id })
        .await?
    else {
        return Ok(CartResponse {
            cart: CartView {
                items: Vec::new(),
                total: 0.0,
            },
        });
    };

    cart.remove_item(product_id);

    if cart.is_empty() {
        db::carts(&state.db)
            .delete_one(doc! { "user_id": user.user_id })
            .await?;
        return Ok(CartResponse {
            cart: CartView {
                items: Vec::new(),
                total: 0.0,
            },
        });
    }

    cart.updated_at = Utc::now();
    save_cart(state, user, &cart).await?;

    Ok(CartResponse {
        cart: joined_view(state, &cart).await?,
    })
}

// Whole-document replace keyed on user_id: concurrent writers race and the
// last one wins, which is the accepted behavior for a single-owner cart.
async fn save_cart(state: &AppState, user: &AuthUser, cart: &Cart) -> AppResult<()> {
    db::carts(&state.db)
        .replace_one(doc! { "user_id": user.user_id }, cart)
        .upsert(true)
        .await?;
    Ok(())
}

/// Joins cart lines with the current catalog records so the client can render
/// names and images. Totals still come from the stored snapshots.
async fn joined_view(state: &AppState, cart: &Cart) -> AppResult<CartView> {
    if cart.items.is_empty() {
        return Ok(CartView {
            items: Vec::new(),
            total: cart.total,
        });
    }

    let ids: Vec<ObjectId> = cart.items.iter().map(|i| i.product_id).collect();
    let mut by_id: HashMap<ObjectId, Product> = HashMap::new();
    let mut cursor = db::products(&state.db)
        .find(doc! { "_id": { "$in": ids } })
        .await?;
    while let Some(product) = cursor.try_next().await? {
        by_id.insert(product.id, product);
    }

    let items = cart
        .items
        .iter()
        .map(|item| CartItemView {
            product_id: item.product_id.to_hex(),
            quantity: item.quantity,
            price: item.price,
            product: by_id.remove(&item.product_id).map(Into::into),
        })
        .collect();

    Ok(CartView {
        items,
        total: cart.total,
    })
}
