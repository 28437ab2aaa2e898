//! Product domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use clementine_core::{CategoryId, ProductId, UserId};

/// A product row.
///
/// `stock` is the available inventory count: decremented when an item is
/// added to any cart, restored when an unbought item is removed. It never
/// goes negative (validated in the service layer and enforced by a CHECK
/// constraint).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub size: i32,
    pub color: String,
    pub image_url: String,
    /// None once the owning category was deleted out from under a retired
    /// product.
    pub category_id: Option<CategoryId>,
    /// The personnel account that manages this product. None once that
    /// account was deleted.
    pub owner_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for inserting a product row.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub size: i32,
    pub color: String,
    pub image_url: String,
    pub category_id: CategoryId,
    pub owner_id: UserId,
}

/// Product response payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub size: i32,
    pub color: String,
    pub image_url: String,
    pub category_id: Option<CategoryId>,
    pub owner_id: Option<UserId>,
}

impl From<Product> for ProductDto {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            stock: product.stock,
            size: product.size,
            color: product.color,
            image_url: product.image_url,
            category_id: product.category_id,
            owner_id: product.owner_id,
        }
    }
}
