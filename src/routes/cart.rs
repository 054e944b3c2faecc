use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post},
};

use crate::{
    dto::cart::{AddToCartRequest, CartResponse},
    error::AppResult,
    extract::AppJson,
    middleware::auth::AuthUser,
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(view_cart))
        .route("/add", post(add_to_cart))
        .route("/remove/{product_id}", delete(remove_from_cart))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart with product details", body = CartResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn view_cart(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<CartResponse>> {
    let resp = cart_service::view_cart(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/cart/add",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Updated cart", body = CartResponse),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<AddToCartRequest>,
) -> AppResult<Json<CartResponse>> {
    let resp = cart_service::add_to_cart(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/cart/remove/{product_id}",
    params(("product_id" = String, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Updated cart", body = CartResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Path(product_id): Path<String>,
) -> AppResult<Json<CartResponse>> {
    let resp = cart_service::remove_from_cart(&state, &user, &product_id).await?;
    Ok(Json(resp))
}
