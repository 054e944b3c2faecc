use bson::Document;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Product;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub specifications: Document,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub images: Option<Vec<String>>,
    #[schema(value_type = Option<Object>)]
    pub specifications: Option<Document>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ProductQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub category: Option<String>,
    pub search: Option<String>,
}

impl ProductQuery {
    /// `Some((page, limit, skip))` when the caller asked for pagination,
    /// `None` for the full listing. The skip saturates so absurd page
    /// numbers yield an empty page instead of wrapping.
    pub fn window(&self) -> Option<(i64, i64, u64)> {
        if self.page.is_none() && self.limit.is_none() {
            return None;
        }
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(12).clamp(1, 100);
        Some((page, limit, (page - 1).saturating_mul(limit) as u64))
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductPublic {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: String,
    pub images: Vec<String>,
    #[schema(value_type = Object)]
    pub specifications: Document,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductPublic {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.to_hex(),
            name: product.name,
            description: product.description,
            price: product.price,
            category: product.category,
            images: product.images,
            specifications: product.specifications,
            is_active: product.is_active,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub product: ProductPublic,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductListResponse {
    pub products: Vec<ProductPublic>,
    pub total: i64,
    pub page: i64,
    pub pages: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_absent_until_pagination_is_requested() {
        assert!(ProductQuery::default().window().is_none());

        let query = ProductQuery {
            limit: Some(5),
            ..Default::default()
        };
        assert_eq!(query.window(), Some((1, 5, 0)));

        let query = ProductQuery {
            page: Some(3),
            limit: Some(10),
            ..Default::default()
        };
        assert_eq!(query.window(), Some((3, 10, 20)));
    }

    #[test]
    fn window_clamps_out_of_range_values() {
        let query = ProductQuery {
            page: Some(-4),
            limit: Some(10_000),
            ..Default::default()
        };
        assert_eq!(query.window(), Some((1, 100, 0)));
    }

    #[test]
    fn window_saturates_for_extreme_page_numbers() {
        let query = ProductQuery {
            page: Some(i64::MAX),
            limit: Some(100),
            ..Default::default()
        };

        let (page, limit, skip) = query.window().expect("window");
        assert_eq!(page, i64::MAX);
        assert_eq!(limit, 100);
        assert_eq!(skip, i64::MAX as u64);
    }
}
