//! Database access layer.
//!
//! One repository module per entity. Repositories are unit structs whose
//! methods take any Postgres executor, so a service can run a single query
//! against the pool or group several mutations on one transaction. The
//! cart/order hot path additionally uses `SELECT ... FOR UPDATE` variants to
//! lock the cart and product rows it is about to adjust.
//!
//! # Tables
//!
//! - `users`, `carts`, `cart_items` - accounts and the cart aggregate
//! - `categories`, `products` - catalog
//! - `orders`, `order_items` - immutable purchase snapshots
//! - `feedback_forms` - one per client user
//!
//! Migrations live in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p clementine-cli -- migrate
//! ```

pub mod carts;
pub mod categories;
pub mod feedback;
pub mod orders;
pub mod products;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use carts::{CartItemRepository, CartRepository};
pub use categories::CategoryRepository;
pub use feedback::FeedbackFormRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map a unique-constraint violation to [`RepositoryError::Conflict`].
    pub(crate) fn from_unique_violation(err: sqlx::Error, what: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.is_unique_violation()
        {
            return Self::Conflict(format!("{what} already exists"));
        }
        Self::Database(err)
    }
}

/// Escape `LIKE`/`ILIKE` pattern metacharacters in a user-supplied search
/// term, so `%` and `_` match themselves instead of everything.
pub(crate) fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_neutralizes_wildcards() {
        assert_eq!(escape_like("100%_cotton"), "100\\%\\_cotton");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn test_escape_like_leaves_plain_terms_alone() {
        assert_eq!(escape_like("sneakers"), "sneakers");
        assert_eq!(escape_like(""), "");
    }
}
