//! Cart aggregate domain types.
//!
//! A cart's `size` and `total_price` are denormalized sums over its items.
//! Every mutation path updates them in the same transaction as the item
//! change, so they never drift from the item sum.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use clementine_core::{CartId, CartItemId, ProductId};

/// A cart row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Cart {
    pub id: CartId,
    /// Sum of item quantities.
    pub size: i32,
    /// Sum of item line prices.
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A cart item row.
///
/// `price` is the line price snapshot taken at add/update time
/// (product unit price x quantity); later product price changes do not
/// affect it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CartItem {
    pub id: CartItemId,
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Cart response payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartDto {
    pub id: CartId,
    pub size: i32,
    pub total_price: Decimal,
}

impl From<Cart> for CartDto {
    fn from(cart: Cart) -> Self {
        Self {
            id: cart.id,
            size: cart.size,
            total_price: cart.total_price,
        }
    }
}

/// Cart response payload with timestamps.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartInfoDto {
    pub id: CartId,
    pub size: i32,
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Cart> for CartInfoDto {
    fn from(cart: Cart) -> Self {
        Self {
            id: cart.id,
            size: cart.size,
            total_price: cart.total_price,
            created_at: cart.created_at,
            updated_at: cart.updated_at,
        }
    }
}

/// Cart item response payload, with the product name joined in for display.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CartItemDto {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i32,
    pub price: Decimal,
}
