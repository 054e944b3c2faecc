use bson::{doc, oid::ObjectId};
use chrono::Utc;
use futures::TryStreamExt;

use crate::{
    db,
    dto::orders::{OrderListResponse, OrderResponse},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, OrderItem, OrderStatus},
    state::AppState,
};

/// Freezes the cart into an immutable order, then clears the cart. The order
/// copies the snapshot prices, so later catalog edits never touch it.
pub async fn checkout(state: &AppState, user: &AuthUser) -> AppResult<OrderResponse> {
    let cart = db::carts(&state.db)
        .find_one(doc! { "user_id": user.user_id })
        .await?
        .ok_or(AppError::EmptyCart)?;

    if cart.is_empty() {
        return Err(AppError::EmptyCart);
    }

    let order = Order {
        id: ObjectId::new(),
        user_id: user.user_id,
        items: cart.items.into_iter().map(OrderItem::from).collect(),
        total: cart.total,
        status: OrderStatus::Pending,
        created_at: Utc::now(),
    };

    db::orders(&state.db).insert_one(&order).await?;
    db::carts(&state.db)
        .delete_one(doc! { "user_id": user.user_id })
        .await?;

    tracing::info!(
        user_id = %user.user_id,
        order_id = %order.id,
        total = order.total,
        "order placed"
    );

    Ok(OrderResponse {
        order: order.into(),
    })
}

/// The caller's own orders, newest first.
pub async fn list_orders(state: &AppState, user: &AuthUser) -> AppResult<OrderListResponse> {
    let orders: Vec<Order> = db::orders(&state.db)
        .find(doc! { "user_id": user.user_id })
        .sort(doc! { "created_at": -1 })
        .await?
        .try_collect()
        .await?;

    Ok(OrderListResponse {
        orders: orders.into_iter().map(Into::into).collect(),
    })
}

/// Fetch one order, scoped to the caller so users cannot read each other's
/// history.
pub async fn get_order(state: &AppState, user: &AuthUser, id: &str) -> AppResult<OrderResponse> {
    let oid = db::parse_object_id(id)?;
    let order = db::orders(&state.db)
        .find_one(doc! { "_id": oid, "user_id": user.user_id })
        .await?
        .ok_or(AppError::NotFound("Order not found"))?;

    Ok(OrderResponse {
        order: order.into(),
    })
}
