use bson::doc;
use futures::TryStreamExt;

use crate::{
    db,
    dto::categories::CategoryListResponse,
    error::AppResult,
    models::Category,
    state::AppState,
};

pub async fn list_categories(state: &AppState) -> AppResult<CategoryListResponse> {
    let categories: Vec<Category> = db::categories(&state.db)
        .find(doc! { "is_active": true })
        .sort(doc! { "name": 1 })
        .await?
        .try_collect()
        .await?;

    Ok(CategoryListResponse {
        categories: categories.into_iter().map(Into::into).collect(),
    })
}
