//! Order and order item repositories.

use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};

use clementine_core::{OrderId, PaginationQuery, ProductId, UserId};

use super::RepositoryError;
use crate::models::{NewOrder, Order, OrderItem};

const ORDER_COLUMNS: &str = "id, user_id, order_date, delivery_date, shipping_address, \
                             phone_number, status, total, created_at, updated_at";
const ITEM_COLUMNS: &str = "id, order_id, product_id, quantity, price, created_at, updated_at";

/// Repository for order rows.
pub struct OrderRepository;

impl OrderRepository {
    /// Insert a new order in the pending state.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn insert(
        conn: impl PgExecutor<'_>,
        new_order: &NewOrder,
    ) -> Result<Order, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "INSERT INTO orders \
                 (user_id, order_date, delivery_date, shipping_address, phone_number, total) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(new_order.user_id)
        .bind(new_order.order_date)
        .bind(new_order.delivery_date)
        .bind(&new_order.shipping_address)
        .bind(&new_order.phone_number)
        .bind(new_order.total)
        .fetch_one(conn)
        .await?;

        Ok(order)
    }

    /// Insert a line item snapshot for an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn insert_item(
        conn: impl PgExecutor<'_>,
        order_id: OrderId,
        product_id: ProductId,
        quantity: i32,
        price: Decimal,
    ) -> Result<OrderItem, RepositoryError> {
        let item = sqlx::query_as::<_, OrderItem>(&format!(
            "INSERT INTO order_items (order_id, product_id, quantity, price) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {ITEM_COLUMNS}"
        ))
        .bind(order_id)
        .bind(product_id)
        .bind(quantity)
        .bind(price)
        .fetch_one(conn)
        .await?;

        Ok(item)
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        conn: impl PgExecutor<'_>,
        id: OrderId,
    ) -> Result<Option<Order>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(order)
    }

    /// List the line items of an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items(
        conn: impl PgExecutor<'_>,
        order_id: OrderId,
    ) -> Result<Vec<OrderItem>, RepositoryError> {
        let items = sqlx::query_as::<_, OrderItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = $1 ORDER BY id"
        ))
        .bind(order_id)
        .fetch_all(conn)
        .await?;

        Ok(items)
    }

    /// Count order item rows referencing a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_items_for_product(
        conn: impl PgExecutor<'_>,
        product_id: ProductId,
    ) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM order_items WHERE product_id = $1",
        )
        .bind(product_id)
        .fetch_one(conn)
        .await?;

        Ok(count)
    }

    /// Page a user's orders, newest first, optionally filtered by shipping
    /// address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn page_for_user(
        pool: &PgPool,
        user_id: UserId,
        query: &PaginationQuery,
    ) -> Result<(Vec<Order>, i64), RepositoryError> {
        let search = query.search.as_deref().map(super::escape_like);

        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE user_id = $1 \
               AND ($2::text IS NULL OR shipping_address ILIKE '%' || $2 || '%') \
             ORDER BY order_date DESC, id DESC \
             LIMIT $3 OFFSET $4"
        ))
        .bind(user_id)
        .bind(search.as_deref())
        .bind(query.limit())
        .bind(query.offset())
        .fetch_all(pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM orders \
             WHERE user_id = $1 \
               AND ($2::text IS NULL OR shipping_address ILIKE '%' || $2 || '%')",
        )
        .bind(user_id)
        .bind(search.as_deref())
        .fetch_one(pool)
        .await?;

        Ok((orders, total))
    }

    /// Mark a user's overdue orders as delivered.
    ///
    /// Idempotent: already delivered orders are left alone, so `updated_at`
    /// only moves on the actual transition.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn sweep_delivered(
        conn: impl PgExecutor<'_>,
        user_id: UserId,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            "UPDATE orders \
             SET status = 'delivered', updated_at = now() \
             WHERE user_id = $1 AND status <> 'delivered' AND delivery_date <= now()",
        )
        .bind(user_id)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Delete all line items belonging to a user's orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_items_for_user(
        conn: impl PgExecutor<'_>,
        user_id: UserId,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            "DELETE FROM order_items \
             WHERE order_id IN (SELECT id FROM orders WHERE user_id = $1)",
        )
        .bind(user_id)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Delete all of a user's orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_for_user(
        conn: impl PgExecutor<'_>,
        user_id: UserId,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM orders WHERE user_id = $1")
            .bind(user_id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }
}
