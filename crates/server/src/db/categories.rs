//! Category repository.

use sqlx::{PgExecutor, PgPool};

use clementine_core::{CategoryId, PaginationQuery};

use super::RepositoryError;
use crate::models::Category;

const COLUMNS: &str = "id, name, description, created_at, updated_at";

/// Repository for category rows.
pub struct CategoryRepository;

impl CategoryRepository {
    /// Get a category by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        conn: impl PgExecutor<'_>,
        id: CategoryId,
    ) -> Result<Option<Category>, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(&format!(
            "SELECT {COLUMNS} FROM categories WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(category)
    }

    /// Get a category by its unique name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_name(
        conn: impl PgExecutor<'_>,
        name: &str,
    ) -> Result<Option<Category>, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(&format!(
            "SELECT {COLUMNS} FROM categories WHERE name = $1"
        ))
        .bind(name)
        .fetch_optional(conn)
        .await?;

        Ok(category)
    }

    /// Insert a new category row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name is already taken.
    pub async fn insert(
        conn: impl PgExecutor<'_>,
        name: &str,
        description: &str,
    ) -> Result<Category, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(&format!(
            "INSERT INTO categories (name, description) VALUES ($1, $2) RETURNING {COLUMNS}"
        ))
        .bind(name)
        .bind(description)
        .fetch_one(conn)
        .await
        .map_err(|e| RepositoryError::from_unique_violation(e, "category"))?;

        Ok(category)
    }

    /// Update a category's name and/or description. Absent fields keep their
    /// current value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category doesn't exist and
    /// `RepositoryError::Conflict` if the new name is taken.
    pub async fn update(
        conn: impl PgExecutor<'_>,
        id: CategoryId,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Category, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(&format!(
            "UPDATE categories \
             SET name = COALESCE($2, name), \
                 description = COALESCE($3, description), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(name)
        .bind(description)
        .fetch_optional(conn)
        .await
        .map_err(|e| RepositoryError::from_unique_violation(e, "category"))?
        .ok_or(RepositoryError::NotFound)?;

        Ok(category)
    }

    /// Delete a category row.
    ///
    /// Returns `true` if the row existed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(
        conn: impl PgExecutor<'_>,
        id: CategoryId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Page categories, optionally filtered by a name search.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn page(
        pool: &PgPool,
        query: &PaginationQuery,
    ) -> Result<(Vec<Category>, i64), RepositoryError> {
        let search = query.search.as_deref().map(super::escape_like);

        let categories = sqlx::query_as::<_, Category>(&format!(
            "SELECT {COLUMNS} FROM categories \
             WHERE $1::text IS NULL OR name ILIKE '%' || $1 || '%' \
             ORDER BY name \
             LIMIT $2 OFFSET $3"
        ))
        .bind(search.as_deref())
        .bind(query.limit())
        .bind(query.offset())
        .fetch_all(pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM categories WHERE $1::text IS NULL OR name ILIKE '%' || $1 || '%'",
        )
        .bind(search.as_deref())
        .fetch_one(pool)
        .await?;

        Ok((categories, total))
    }
}
