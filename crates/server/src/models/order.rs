//! Order domain types.
//!
//! Orders are immutable snapshots of a cart at checkout time. Stock was
//! already adjusted when the items were put in the cart, so order creation
//! touches no product rows.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use clementine_core::{OrderId, OrderItemId, OrderStatus, PhoneNumber, ProductId, UserId};

/// An order row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub order_date: DateTime<Utc>,
    pub delivery_date: DateTime<Utc>,
    pub shipping_address: String,
    pub phone_number: PhoneNumber,
    pub status: OrderStatus,
    /// Sum of item line prices, frozen at creation.
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An order item row. Quantity and line price are frozen at purchase time.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for inserting an order row.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: UserId,
    pub order_date: DateTime<Utc>,
    pub delivery_date: DateTime<Utc>,
    pub shipping_address: String,
    pub phone_number: PhoneNumber,
    pub total: Decimal,
}

/// Order item response payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDto {
    pub id: OrderItemId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub price: Decimal,
}

impl From<OrderItem> for OrderItemDto {
    fn from(item: OrderItem) -> Self {
        Self {
            id: item.id,
            product_id: item.product_id,
            quantity: item.quantity,
            price: item.price,
        }
    }
}

/// Order response payload with its items.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDto {
    pub id: OrderId,
    pub order_items: Vec<OrderItemDto>,
    pub total: Decimal,
    pub order_date: DateTime<Utc>,
    pub delivery_date: DateTime<Utc>,
    pub shipping_address: String,
    pub phone_number: PhoneNumber,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl OrderDto {
    /// Assemble the payload from an order row and its item rows.
    #[must_use]
    pub fn from_parts(order: Order, items: Vec<OrderItem>) -> Self {
        Self {
            id: order.id,
            order_items: items.into_iter().map(OrderItemDto::from).collect(),
            total: order.total,
            order_date: order.order_date,
            delivery_date: order.delivery_date,
            shipping_address: order.shipping_address,
            phone_number: order.phone_number,
            status: order.status,
            created_at: order.created_at,
        }
    }
}
