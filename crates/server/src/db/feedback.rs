//! Feedback form repository.

use sqlx::{PgExecutor, PgPool};

use clementine_core::{FeedbackFormId, PaginationQuery};

use super::RepositoryError;
use crate::models::FeedbackForm;

const COLUMNS: &str = "id, feedback, overall_rating, delivery_rating, favorite_features, \
                       created_at, updated_at";

/// Repository for feedback form rows.
pub struct FeedbackFormRepository;

impl FeedbackFormRepository {
    /// Get a feedback form by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        conn: impl PgExecutor<'_>,
        id: FeedbackFormId,
    ) -> Result<Option<FeedbackForm>, RepositoryError> {
        let form = sqlx::query_as::<_, FeedbackForm>(&format!(
            "SELECT {COLUMNS} FROM feedback_forms WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(form)
    }

    /// Insert a new feedback form row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn insert(
        conn: impl PgExecutor<'_>,
        feedback: &str,
        overall_rating: i32,
        delivery_rating: i32,
        favorite_features: &str,
    ) -> Result<FeedbackForm, RepositoryError> {
        let form = sqlx::query_as::<_, FeedbackForm>(&format!(
            "INSERT INTO feedback_forms \
                 (feedback, overall_rating, delivery_rating, favorite_features) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        ))
        .bind(feedback)
        .bind(overall_rating)
        .bind(delivery_rating)
        .bind(favorite_features)
        .fetch_one(conn)
        .await?;

        Ok(form)
    }

    /// Delete a feedback form row.
    ///
    /// Returns `true` if the row existed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(
        conn: impl PgExecutor<'_>,
        id: FeedbackFormId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM feedback_forms WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Page feedback forms, optionally filtered by a text search over the
    /// feedback body.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn page(
        pool: &PgPool,
        query: &PaginationQuery,
    ) -> Result<(Vec<FeedbackForm>, i64), RepositoryError> {
        let search = query.search.as_deref().map(super::escape_like);

        let forms = sqlx::query_as::<_, FeedbackForm>(&format!(
            "SELECT {COLUMNS} FROM feedback_forms \
             WHERE $1::text IS NULL OR feedback ILIKE '%' || $1 || '%' \
             ORDER BY id DESC \
             LIMIT $2 OFFSET $3"
        ))
        .bind(search.as_deref())
        .bind(query.limit())
        .bind(query.offset())
        .fetch_all(pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM feedback_forms \
             WHERE $1::text IS NULL OR feedback ILIKE '%' || $1 || '%'",
        )
        .bind(search.as_deref())
        .fetch_one(pool)
        .await?;

        Ok((forms, total))
    }
}
