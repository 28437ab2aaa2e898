//! Product repository.

use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};

use clementine_core::{CategoryId, PaginationQuery, ProductId, UserId};

use super::RepositoryError;
use crate::models::{NewProduct, Product};

const COLUMNS: &str = "id, name, description, price, stock, size, color, image_url, \
                       category_id, owner_id, created_at, updated_at";

/// Repository for product rows.
pub struct ProductRepository;

impl ProductRepository {
    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        conn: impl PgExecutor<'_>,
        id: ProductId,
    ) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(product)
    }

    /// Get a product by ID, locking the row for the current transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_for_update(
        conn: impl PgExecutor<'_>,
        id: ProductId,
    ) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {COLUMNS} FROM products WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(product)
    }

    /// Find a product with the same name, size and color, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_duplicate(
        conn: impl PgExecutor<'_>,
        name: &str,
        size: i32,
        color: &str,
    ) -> Result<Option<ProductId>, RepositoryError> {
        let id = sqlx::query_scalar::<_, ProductId>(
            "SELECT id FROM products WHERE name = $1 AND size = $2 AND color = $3",
        )
        .bind(name)
        .bind(size)
        .bind(color)
        .fetch_optional(conn)
        .await?;

        Ok(id)
    }

    /// Insert a new product row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a product with the same name,
    /// size and color already exists.
    pub async fn insert(
        conn: impl PgExecutor<'_>,
        new_product: &NewProduct,
    ) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products \
                 (name, description, price, stock, size, color, image_url, category_id, owner_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        ))
        .bind(&new_product.name)
        .bind(&new_product.description)
        .bind(new_product.price)
        .bind(new_product.stock)
        .bind(new_product.size)
        .bind(&new_product.color)
        .bind(&new_product.image_url)
        .bind(new_product.category_id)
        .bind(new_product.owner_id)
        .fetch_one(conn)
        .await
        .map_err(|e| RepositoryError::from_unique_violation(e, "product"))?;

        Ok(product)
    }

    /// Update a product's mutable fields. Absent fields keep their current
    /// value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn update(
        conn: impl PgExecutor<'_>,
        id: ProductId,
        description: Option<&str>,
        price: Option<Decimal>,
        stock: Option<i32>,
        image_url: Option<&str>,
    ) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "UPDATE products \
             SET description = COALESCE($2, description), \
                 price = COALESCE($3, price), \
                 stock = COALESCE($4, stock), \
                 image_url = COALESCE($5, image_url), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(description)
        .bind(price)
        .bind(stock)
        .bind(image_url)
        .fetch_optional(conn)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(product)
    }

    /// Adjust a product's stock by a delta (positive restocks, negative
    /// reserves).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn adjust_stock(
        conn: impl PgExecutor<'_>,
        id: ProductId,
        delta: i32,
    ) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE products SET stock = stock + $2, updated_at = now() WHERE id = $1")
                .bind(id)
                .bind(delta)
                .execute(conn)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Zero a product's stock, optionally detaching it from its category.
    ///
    /// Used when a product (or its category) is retired but order or cart
    /// history still references the row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn retire(
        conn: impl PgExecutor<'_>,
        id: ProductId,
        detach_category: bool,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE products \
             SET stock = 0, \
                 category_id = CASE WHEN $2 THEN NULL ELSE category_id END, \
                 updated_at = now() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(detach_category)
        .execute(conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Clear the owner reference on every product a user still owns.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn detach_owner(
        conn: impl PgExecutor<'_>,
        owner_id: UserId,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            "UPDATE products SET owner_id = NULL, updated_at = now() WHERE owner_id = $1",
        )
        .bind(owner_id)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Delete a product row.
    ///
    /// Returns `true` if the row existed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(conn: impl PgExecutor<'_>, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List all products in a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_category(
        conn: impl PgExecutor<'_>,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {COLUMNS} FROM products WHERE category_id = $1 ORDER BY id"
        ))
        .bind(category_id)
        .fetch_all(conn)
        .await?;

        Ok(products)
    }

    /// List all products owned by a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_owner(
        conn: impl PgExecutor<'_>,
        owner_id: UserId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {COLUMNS} FROM products WHERE owner_id = $1 ORDER BY id"
        ))
        .bind(owner_id)
        .fetch_all(conn)
        .await?;

        Ok(products)
    }

    /// Page products, optionally filtered by a name search.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn page(
        pool: &PgPool,
        query: &PaginationQuery,
    ) -> Result<(Vec<Product>, i64), RepositoryError> {
        let search = query.search.as_deref().map(super::escape_like);

        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {COLUMNS} FROM products \
             WHERE $1::text IS NULL OR name ILIKE '%' || $1 || '%' \
             ORDER BY id \
             LIMIT $2 OFFSET $3"
        ))
        .bind(search.as_deref())
        .bind(query.limit())
        .bind(query.offset())
        .fetch_all(pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM products WHERE $1::text IS NULL OR name ILIKE '%' || $1 || '%'",
        )
        .bind(search.as_deref())
        .fetch_one(pool)
        .await?;

        Ok((products, total))
    }
}
