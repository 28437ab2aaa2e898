//! Cart and cart item repositories.
//!
//! Cart mutations always happen inside a transaction together with the
//! product stock they touch, so `get_for_update` variants are provided to
//! lock the rows first.

use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};

use clementine_core::{CartId, CartItemId, PaginationQuery, ProductId};

use super::RepositoryError;
use crate::models::{Cart, CartItem, CartItemDto};

const CART_COLUMNS: &str = "id, size, total_price, created_at, updated_at";
const ITEM_COLUMNS: &str = "id, cart_id, product_id, quantity, price, created_at, updated_at";

/// Repository for cart rows.
pub struct CartRepository;

impl CartRepository {
    /// Insert an empty cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn insert(conn: impl PgExecutor<'_>) -> Result<Cart, RepositoryError> {
        let cart = sqlx::query_as::<_, Cart>(&format!(
            "INSERT INTO carts DEFAULT VALUES RETURNING {CART_COLUMNS}"
        ))
        .fetch_one(conn)
        .await?;

        Ok(cart)
    }

    /// Get a cart by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        conn: impl PgExecutor<'_>,
        id: CartId,
    ) -> Result<Option<Cart>, RepositoryError> {
        let cart = sqlx::query_as::<_, Cart>(&format!(
            "SELECT {CART_COLUMNS} FROM carts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(cart)
    }

    /// Get a cart by ID, locking the row for the current transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_for_update(
        conn: impl PgExecutor<'_>,
        id: CartId,
    ) -> Result<Option<Cart>, RepositoryError> {
        let cart = sqlx::query_as::<_, Cart>(&format!(
            "SELECT {CART_COLUMNS} FROM carts WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(cart)
    }

    /// Adjust the cart's item count and running total by the given deltas.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the cart doesn't exist.
    pub async fn apply_delta(
        conn: impl PgExecutor<'_>,
        id: CartId,
        size_delta: i32,
        price_delta: Decimal,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE carts \
             SET size = size + $2, total_price = total_price + $3, updated_at = now() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(size_delta)
        .bind(price_delta)
        .execute(conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete a cart row.
    ///
    /// Returns `true` if the row existed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(conn: impl PgExecutor<'_>, id: CartId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM carts WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Repository for cart item rows.
pub struct CartItemRepository;

impl CartItemRepository {
    /// Get a cart item by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        conn: impl PgExecutor<'_>,
        id: CartItemId,
    ) -> Result<Option<CartItem>, RepositoryError> {
        let item = sqlx::query_as::<_, CartItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM cart_items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(item)
    }

    /// Find the item holding a given product within a cart, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_product(
        conn: impl PgExecutor<'_>,
        cart_id: CartId,
        product_id: ProductId,
    ) -> Result<Option<CartItem>, RepositoryError> {
        let item = sqlx::query_as::<_, CartItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM cart_items WHERE cart_id = $1 AND product_id = $2"
        ))
        .bind(cart_id)
        .bind(product_id)
        .fetch_optional(conn)
        .await?;

        Ok(item)
    }

    /// List all items in a cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_cart(
        conn: impl PgExecutor<'_>,
        cart_id: CartId,
    ) -> Result<Vec<CartItem>, RepositoryError> {
        let items = sqlx::query_as::<_, CartItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM cart_items WHERE cart_id = $1 ORDER BY id"
        ))
        .bind(cart_id)
        .fetch_all(conn)
        .await?;

        Ok(items)
    }

    /// List the items holding a given product across all carts.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_product(
        conn: impl PgExecutor<'_>,
        product_id: ProductId,
    ) -> Result<Vec<CartItem>, RepositoryError> {
        let items = sqlx::query_as::<_, CartItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM cart_items WHERE product_id = $1 ORDER BY id"
        ))
        .bind(product_id)
        .fetch_all(conn)
        .await?;

        Ok(items)
    }

    /// Page the items of a cart joined with their product names, optionally
    /// filtered by a product name search.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn page_for_cart(
        pool: &PgPool,
        cart_id: CartId,
        query: &PaginationQuery,
    ) -> Result<(Vec<CartItemDto>, i64), RepositoryError> {
        let search = query.search.as_deref().map(super::escape_like);

        let items = sqlx::query_as::<_, CartItemDto>(
            "SELECT ci.id, ci.product_id, p.name AS product_name, ci.quantity, ci.price \
             FROM cart_items ci \
             JOIN products p ON p.id = ci.product_id \
             WHERE ci.cart_id = $1 \
               AND ($2::text IS NULL OR p.name ILIKE '%' || $2 || '%') \
             ORDER BY ci.id \
             LIMIT $3 OFFSET $4",
        )
        .bind(cart_id)
        .bind(search.as_deref())
        .bind(query.limit())
        .bind(query.offset())
        .fetch_all(pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) \
             FROM cart_items ci \
             JOIN products p ON p.id = ci.product_id \
             WHERE ci.cart_id = $1 \
               AND ($2::text IS NULL OR p.name ILIKE '%' || $2 || '%')",
        )
        .bind(cart_id)
        .bind(search.as_deref())
        .fetch_one(pool)
        .await?;

        Ok((items, total))
    }

    /// Insert a cart item with its price snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the cart already holds the
    /// product.
    pub async fn insert(
        conn: impl PgExecutor<'_>,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
        price: Decimal,
    ) -> Result<CartItem, RepositoryError> {
        let item = sqlx::query_as::<_, CartItem>(&format!(
            "INSERT INTO cart_items (cart_id, product_id, quantity, price) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {ITEM_COLUMNS}"
        ))
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .bind(price)
        .fetch_one(conn)
        .await
        .map_err(|e| RepositoryError::from_unique_violation(e, "cart item"))?;

        Ok(item)
    }

    /// Replace an item's quantity and price snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item doesn't exist.
    pub async fn set_quantity_and_price(
        conn: impl PgExecutor<'_>,
        id: CartItemId,
        quantity: i32,
        price: Decimal,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE cart_items SET quantity = $2, price = $3, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(quantity)
        .bind(price)
        .execute(conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete a cart item row.
    ///
    /// Returns `true` if the row existed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(
        conn: impl PgExecutor<'_>,
        id: CartItemId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
