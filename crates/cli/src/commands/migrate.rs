//! Database migration command.
//!
//! Applies the migrations shipped with the server crate. Migrations are
//! never run automatically on server startup; this command is the only
//! place they execute.

use clementine_server::db::create_pool;

use super::CommandError;

/// Run the database migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let database_url = super::database_url()?;

    tracing::info!("Connecting to database...");
    let pool = create_pool(&database_url).await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
