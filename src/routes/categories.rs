use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::categories::CategoryListResponse, error::AppResult, services::category_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_categories))
}

#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "Active categories", body = CategoryListResponse)
    ),
    tag = "Categories"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<CategoryListResponse>> {
    let resp = category_service::list_categories(&state).await?;
    Ok(Json(resp))
}
