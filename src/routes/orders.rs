use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::orders::{OrderListResponse, OrderResponse},
    error::AppResult,
    middleware::auth::AuthUser,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(checkout))
        .route("/{id}", get(get_order))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    responses(
        (status = 201, description = "Order placed from cart", body = OrderResponse),
        (status = 422, description = "Cart is empty"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn checkout(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<(StatusCode, Json<OrderResponse>)> {
    let resp = order_service::checkout(&state, &user).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(get, path = "/api/orders", security(("bearer_auth" = [])), tag = "Orders")]
pub async fn list_orders(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<OrderListResponse>> {
    let resp = order_service::list_orders(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(get, path = "/api/orders/{id}", security(("bearer_auth" = [])), tag = "Orders")]
pub async fn get_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<OrderResponse>> {
    let resp = order_service::get_order(&state, &user, &id).await?;
    Ok(Json(resp))
}
