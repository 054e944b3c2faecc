use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::products::{
        CreateProductRequest, ProductListResponse, ProductQuery, ProductResponse,
        UpdateProductRequest,
    },
    error::AppResult,
    extract::AppJson,
    middleware::auth::AuthUser,
    services::product_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/{id}", get(get_product).put(update_product))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("limit" = Option<i64>, Query, description = "Items per page, default 12"),
        ("category" = Option<String>, Query, description = "Filter by category"),
        ("search" = Option<String>, Query, description = "Match against name or description"),
    ),
    responses(
        (status = 200, description = "Active products", body = ProductListResponse)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<ProductListResponse>> {
    let resp = product_service::list_products(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product", body = ProductResponse),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ProductResponse>> {
    let resp = product_service::get_product(&state, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 403, description = "Admin access required"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<ProductResponse>)> {
    let resp = product_service::create_product(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(("id" = String, Path, description = "Product ID")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Updated product", body = ProductResponse),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateProductRequest>,
) -> AppResult<Json<ProductResponse>> {
    let resp = product_service::update_product(&state, &user, &id, payload).await?;
    Ok(Json(resp))
}
