use bson::{Document, oid::ObjectId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Customer,
    Admin,
}

impl Role {
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zipcode: String,
    #[serde(default)]
    pub country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: String,
    #[serde(default)]
    pub images: Vec<String>,
    // Free-form display attributes (storage, color, ...), opaque to the API.
    #[serde(default)]
    pub specifications: Document,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub slug: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ObjectId,
    pub quantity: i64,
    // Price snapshot taken when the item was first added.
    pub price: f64,
}

// One cart document per user; `_id` stays server-assigned so replace-upserts
// never fight over it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub items: Vec<CartItem>,
    pub total: f64,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    pub fn empty(user_id: ObjectId) -> Self {
        Self {
            id: None,
            user_id,
            items: Vec::new(),
            total: 0.0,
            updated_at: Utc::now(),
        }
    }

    /// Accumulates quantity onto an existing line or appends a new one with
    /// the given price snapshot, then refreshes the stored total. The sum
    /// saturates so repeated adds can never wrap a line negative.
    pub fn add_item(&mut self, product_id: ObjectId, quantity: i64, price: f64) {
        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            item.quantity = item.quantity.saturating_add(quantity);
        } else {
            self.items.push(CartItem {
                product_id,
                quantity,
                price,
            });
        }
        self.recompute_total();
    }

    /// Drops the line for `product_id` if present; a miss leaves the cart
    /// untouched.
    pub fn remove_item(&mut self, product_id: ObjectId) {
        self.items.retain(|i| i.product_id != product_id);
        self.recompute_total();
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn recompute_total(&mut self) {
        self.total = self
            .items
            .iter()
            .map(|i| i.price * i.quantity as f64)
            .sum();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Shipped,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ObjectId,
    pub quantity: i64,
    pub price: f64,
}

impl From<CartItem> for OrderItem {
    fn from(item: CartItem) -> Self {
        Self {
            product_id: item.product_id,
            quantity: item.quantity,
            price: item.price,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: ObjectId,
    pub items: Vec<OrderItem>,
    pub total: f64,
    pub status: OrderStatus,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_item_accumulates_quantity_and_keeps_first_price() {
        let product_id = ObjectId::new();
        let mut cart = Cart::empty(ObjectId::new());

        cart.add_item(product_id, 2, 10.0);
        cart.add_item(product_id, 3, 99.0);

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 5);
        assert_eq!(cart.items[0].price, 10.0);
        assert_eq!(cart.total, 50.0);
    }

    #[test]
    fn add_item_saturates_instead_of_wrapping() {
        let product_id = ObjectId::new();
        let mut cart = Cart::empty(ObjectId::new());

        cart.add_item(product_id, i64::MAX, 10.0);
        cart.add_item(product_id, 1, 10.0);

        assert_eq!(cart.items[0].quantity, i64::MAX);
        assert!(cart.items[0].quantity >= 1);
        assert!(cart.total > 0.0);
    }

    #[test]
    fn remove_item_is_a_noop_for_unknown_products() {
        let mut cart = Cart::empty(ObjectId::new());
        cart.add_item(ObjectId::new(), 1, 5.0);

        cart.remove_item(ObjectId::new());

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.total, 5.0);
    }

    #[test]
    fn removing_the_last_item_leaves_an_empty_cart() {
        let product_id = ObjectId::new();
        let mut cart = Cart::empty(ObjectId::new());
        cart.add_item(product_id, 4, 2.5);

        cart.remove_item(product_id);

        assert!(cart.is_empty());
        assert_eq!(cart.total, 0.0);
    }

    #[test]
    fn total_spans_multiple_lines() {
        let mut cart = Cart::empty(ObjectId::new());
        cart.add_item(ObjectId::new(), 2, 10.0);
        cart.add_item(ObjectId::new(), 1, 7.5);

        assert_eq!(cart.total, 27.5);
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(
            serde_json::to_string(&Role::Customer).unwrap(),
            "\"customer\""
        );
    }
}
