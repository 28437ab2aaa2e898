//! User repository.

use sqlx::{PgExecutor, PgPool};

use clementine_core::{Email, FeedbackFormId, PaginationQuery, UserId};

use super::RepositoryError;
use crate::models::{NewUser, User};

const COLUMNS: &str =
    "id, email, name, password_hash, role, cart_id, feedback_form_id, created_at, updated_at";

/// Repository for user rows.
pub struct UserRepository;

impl UserRepository {
    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        conn: impl PgExecutor<'_>,
        id: UserId,
    ) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(user)
    }

    /// Get a user by email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(
        conn: impl PgExecutor<'_>,
        email: &Email,
    ) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(conn)
        .await?;

        Ok(user)
    }

    /// Insert a new user row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already taken.
    pub async fn insert(
        conn: impl PgExecutor<'_>,
        new_user: &NewUser,
    ) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, name, password_hash, role, cart_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        ))
        .bind(&new_user.email)
        .bind(&new_user.name)
        .bind(&new_user.password_hash)
        .bind(new_user.role)
        .bind(new_user.cart_id)
        .fetch_one(conn)
        .await
        .map_err(|e| RepositoryError::from_unique_violation(e, "user"))?;

        Ok(user)
    }

    /// Update a user's name and/or password hash. Absent fields keep their
    /// current value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    pub async fn update_profile(
        conn: impl PgExecutor<'_>,
        id: UserId,
        name: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users \
             SET name = COALESCE($2, name), \
                 password_hash = COALESCE($3, password_hash), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(name)
        .bind(password_hash)
        .fetch_optional(conn)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(user)
    }

    /// Link a feedback form onto the user row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    pub async fn set_feedback_form(
        conn: impl PgExecutor<'_>,
        id: UserId,
        form_id: FeedbackFormId,
    ) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE users SET feedback_form_id = $2, updated_at = now() WHERE id = $1")
                .bind(id)
                .bind(form_id)
                .execute(conn)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete a user row.
    ///
    /// Returns `true` if the row existed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(conn: impl PgExecutor<'_>, id: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count all user rows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(conn: impl PgExecutor<'_>) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(conn)
            .await?;

        Ok(count)
    }

    /// Page users, optionally filtered by a name/email search.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn page(
        pool: &PgPool,
        query: &PaginationQuery,
    ) -> Result<(Vec<User>, i64), RepositoryError> {
        let search = query.search.as_deref().map(super::escape_like);

        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {COLUMNS} FROM users \
             WHERE $1::text IS NULL OR name ILIKE '%' || $1 || '%' OR email ILIKE '%' || $1 || '%' \
             ORDER BY id \
             LIMIT $2 OFFSET $3"
        ))
        .bind(search.as_deref())
        .bind(query.limit())
        .bind(query.offset())
        .fetch_all(pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users \
             WHERE $1::text IS NULL OR name ILIKE '%' || $1 || '%' OR email ILIKE '%' || $1 || '%'",
        )
        .bind(search.as_deref())
        .fetch_one(pool)
        .await?;

        Ok((users, total))
    }
}
