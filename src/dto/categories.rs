use serde::Serialize;
use utoipa::ToSchema;

use crate::models::Category;

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryPublic {
    pub id: String,
    pub name: String,
    pub slug: String,
}

impl From<Category> for CategoryPublic {
    fn from(category: Category) -> Self {
        Self {
            id: category.id.to_hex(),
            name: category.name,
            slug: category.slug,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryListResponse {
    pub categories: Vec<CategoryPublic>,
}
