use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dto::products::ProductPublic;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

/// Cart line joined with the current product record for display. `price` is
/// the add-time snapshot, which is what the total is computed from; the
/// embedded product carries whatever the catalog says today. Products that
/// have since disappeared render without details.
#[derive(Debug, Serialize, ToSchema)]
pub struct CartItemView {
    pub product_id: String,
    pub quantity: i64,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductPublic>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartResponse {
    pub cart: CartView,
}
