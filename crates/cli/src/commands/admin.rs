//! Admin user management commands.
//!
//! # Usage
//!
//! ```bash
//! clementine admin create -e admin@example.com -n "Admin Name" -p "a strong password"
//! ```

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};

use clementine_core::{Email, UserId, UserRole};
use clementine_server::db::{CartRepository, UserRepository, create_pool};
use clementine_server::models::NewUser;

use super::CommandError;

/// Create a new admin user with its own cart.
///
/// # Errors
///
/// Returns an error if the email is invalid or already taken, or if the
/// database is unreachable.
pub async fn create_user(email: &str, name: &str, password: &str) -> Result<UserId, CommandError> {
    let email = Email::parse(email).map_err(|_| CommandError::InvalidEmail(email.to_owned()))?;

    let database_url = super::database_url()?;

    tracing::info!("Connecting to database...");
    let pool = create_pool(&database_url).await?;

    if UserRepository::get_by_email(&pool, &email).await?.is_some() {
        return Err(CommandError::UserExists(email.to_string()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| CommandError::PasswordHash)?;

    let mut tx = pool.begin().await?;
    let cart = CartRepository::insert(&mut *tx).await?;
    let user = UserRepository::insert(
        &mut *tx,
        &NewUser {
            email,
            name: name.to_owned(),
            password_hash,
            role: UserRole::Admin,
            cart_id: Some(cart.id),
        },
    )
    .await?;
    tx.commit().await?;

    tracing::info!(
        "Admin user created successfully! ID: {}, Email: {}",
        user.id,
        user.email
    );

    Ok(user.id)
}
