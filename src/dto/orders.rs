use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{Order, OrderItem, OrderStatus};

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderLine {
    pub product_id: String,
    pub quantity: i64,
    pub price: f64,
}

impl From<OrderItem> for OrderLine {
    fn from(item: OrderItem) -> Self {
        Self {
            product_id: item.product_id.to_hex(),
            quantity: item.quantity,
            price: item.price,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderPublic {
    pub id: String,
    pub user_id: String,
    pub items: Vec<OrderLine>,
    pub total: f64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Order> for OrderPublic {
    fn from(order: Order) -> Self {
        Self {
            id: order.id.to_hex(),
            user_id: order.user_id.to_hex(),
            items: order.items.into_iter().map(OrderLine::from).collect(),
            total: order.total,
            status: order.status,
            created_at: order.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub order: OrderPublic,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderListResponse {
    pub orders: Vec<OrderPublic>,
}
