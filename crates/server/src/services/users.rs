//! User accounts: registration, login, administration and the deletion
//! cascade.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use clementine_core::{Email, PagedResponse, PaginationQuery, UserId, UserRole};

use super::{cart_items, carts, products, EmailService, ServiceError};
use crate::db::{
    CartRepository, FeedbackFormRepository, OrderRepository, RepositoryError, UserRepository,
};
use crate::models::{CurrentUser, NewUser, User, UserDto};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Service for user accounts.
pub struct UserService;

impl UserService {
    /// Register a client account with a fresh cart.
    ///
    /// A welcome email is sent in the background when an email service is
    /// configured; delivery failures are logged and never fail the
    /// registration.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidEmail` or `WeakPassword` for bad input and
    /// `AlreadyExists` when the email is taken.
    pub async fn register(
        pool: &PgPool,
        email_service: Option<&EmailService>,
        email: &str,
        name: &str,
        password: &str,
    ) -> Result<UserDto, ServiceError> {
        let email = Email::parse(email).map_err(|_| ServiceError::InvalidEmail)?;
        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(ServiceError::WeakPassword(MIN_PASSWORD_LENGTH));
        }

        let password_hash = hash_password(password)?;

        let mut tx = pool.begin().await.map_err(RepositoryError::from)?;

        if UserRepository::get_by_email(&mut *tx, &email).await?.is_some() {
            return Err(ServiceError::AlreadyExists("user"));
        }

        let cart = CartRepository::insert(&mut *tx).await?;
        let user = UserRepository::insert(
            &mut *tx,
            &NewUser {
                email,
                name: name.to_string(),
                password_hash,
                role: UserRole::Client,
                cart_id: Some(cart.id),
            },
        )
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => ServiceError::AlreadyExists("user"),
            other => other.into(),
        })?;

        tx.commit().await.map_err(RepositoryError::from)?;

        if let Some(email_service) = email_service {
            let email_service = email_service.clone();
            let to = user.email.to_string();
            let name = user.name.clone();
            tokio::spawn(async move {
                if let Err(error) = email_service.send_welcome_email(&to, &name).await {
                    tracing::warn!(%error, "Failed to send welcome email");
                }
            });
        }

        Ok(UserDto::from(user))
    }

    /// Check a user's credentials and return the account on success.
    ///
    /// # Errors
    ///
    /// Fails with `WrongPassword` for unknown emails and bad passwords
    /// alike.
    pub async fn login(pool: &PgPool, email: &str, password: &str) -> Result<User, ServiceError> {
        let email = Email::parse(email).map_err(|_| ServiceError::WrongPassword)?;

        let user = UserRepository::get_by_email(pool, &email)
            .await?
            .ok_or(ServiceError::WrongPassword)?;

        verify_password(password, &user.password_hash)?;

        Ok(user)
    }

    /// Create an account with an arbitrary role. Admin only.
    ///
    /// # Errors
    ///
    /// Fails with `UserPermission` unless the caller is an admin, plus the
    /// same input errors as [`register`](Self::register).
    pub async fn add_user(
        pool: &PgPool,
        current: &CurrentUser,
        email: &str,
        name: &str,
        password: &str,
        role: UserRole,
    ) -> Result<UserDto, ServiceError> {
        if current.role != UserRole::Admin {
            return Err(ServiceError::UserPermission);
        }

        let email = Email::parse(email).map_err(|_| ServiceError::InvalidEmail)?;
        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(ServiceError::WeakPassword(MIN_PASSWORD_LENGTH));
        }

        let password_hash = hash_password(password)?;

        let mut tx = pool.begin().await.map_err(RepositoryError::from)?;

        if UserRepository::get_by_email(&mut *tx, &email).await?.is_some() {
            return Err(ServiceError::AlreadyExists("user"));
        }

        let cart = CartRepository::insert(&mut *tx).await?;
        let user = UserRepository::insert(
            &mut *tx,
            &NewUser {
                email,
                name: name.to_string(),
                password_hash,
                role,
                cart_id: Some(cart.id),
            },
        )
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => ServiceError::AlreadyExists("user"),
            other => other.into(),
        })?;

        tx.commit().await.map_err(RepositoryError::from)?;

        Ok(UserDto::from(user))
    }

    /// Get an account. Admins can read anyone, others only themselves.
    ///
    /// # Errors
    ///
    /// Fails with `UserPermission` for foreign accounts and
    /// `EntityNotFound` for missing ones.
    pub async fn get_user(
        pool: &PgPool,
        current: &CurrentUser,
        id: UserId,
    ) -> Result<UserDto, ServiceError> {
        if current.role != UserRole::Admin && current.id != id {
            return Err(ServiceError::UserPermission);
        }

        let user = UserRepository::get(pool, id)
            .await?
            .ok_or(ServiceError::EntityNotFound("user"))?;

        Ok(UserDto::from(user))
    }

    /// Page accounts, optionally filtered by name or email. Admin only.
    ///
    /// # Errors
    ///
    /// Fails with `UserPermission` unless the caller is an admin and
    /// `InvalidSearchQuery` for oversized search strings.
    pub async fn get_users(
        pool: &PgPool,
        current: &CurrentUser,
        query: &PaginationQuery,
    ) -> Result<PagedResponse<UserDto>, ServiceError> {
        if current.role != UserRole::Admin {
            return Err(ServiceError::UserPermission);
        }

        let query = carts::validate_query(query)?;

        let (users, total) = UserRepository::page(pool, &query).await?;
        let data = users.into_iter().map(UserDto::from).collect();

        Ok(PagedResponse::new(&query, total, data))
    }

    /// Count all accounts. Admin only.
    ///
    /// # Errors
    ///
    /// Fails with `UserPermission` unless the caller is an admin.
    pub async fn count_users(pool: &PgPool, current: &CurrentUser) -> Result<i64, ServiceError> {
        if current.role != UserRole::Admin {
            return Err(ServiceError::UserPermission);
        }

        Ok(UserRepository::count(pool).await?)
    }

    /// Update an account's name and/or password. Admins can update anyone,
    /// others only themselves.
    ///
    /// # Errors
    ///
    /// Fails with `CannotUpdate` for foreign accounts and `WeakPassword`
    /// for short passwords.
    pub async fn update_user(
        pool: &PgPool,
        current: &CurrentUser,
        id: UserId,
        name: Option<&str>,
        password: Option<&str>,
    ) -> Result<UserDto, ServiceError> {
        if current.role != UserRole::Admin && current.id != id {
            return Err(ServiceError::CannotUpdate("user"));
        }

        if password.is_some_and(|p| p.len() < MIN_PASSWORD_LENGTH) {
            return Err(ServiceError::WeakPassword(MIN_PASSWORD_LENGTH));
        }
        let password_hash = password.map(hash_password).transpose()?;

        let user = UserRepository::update_profile(pool, id, name, password_hash.as_deref())
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => ServiceError::EntityNotFound("user"),
                other => other.into(),
            })?;

        Ok(UserDto::from(user))
    }

    /// Delete an account and everything hanging off it: the cart is emptied
    /// with its stock released, owned products are deleted or retired, and
    /// the order history and feedback form are removed. Admins can delete
    /// anyone, others only themselves. One transaction.
    ///
    /// # Errors
    ///
    /// Fails with `CannotDelete` for foreign accounts and `EntityNotFound`
    /// for missing ones.
    pub async fn delete_user(
        pool: &PgPool,
        current: &CurrentUser,
        id: UserId,
    ) -> Result<(), ServiceError> {
        if current.role != UserRole::Admin && current.id != id {
            return Err(ServiceError::CannotDelete("user"));
        }

        let mut tx = pool.begin().await.map_err(RepositoryError::from)?;

        let user = UserRepository::get(&mut *tx, id)
            .await?
            .ok_or(ServiceError::EntityNotFound("user"))?;

        let cart = match user.cart_id {
            Some(cart_id) => {
                let cart = CartRepository::get_for_update(&mut *tx, cart_id)
                    .await?
                    .ok_or(ServiceError::EntityNotFound("cart"))?;
                cart_items::clear_locked(&mut tx, &cart, false).await?;
                Some(cart)
            }
            None => None,
        };

        OrderRepository::delete_items_for_user(&mut *tx, user.id).await?;
        OrderRepository::delete_for_user(&mut *tx, user.id).await?;

        products::delete_owned_locked(&mut tx, user.id).await?;

        UserRepository::delete(&mut *tx, user.id).await?;

        if let Some(cart) = cart {
            CartRepository::delete(&mut *tx, cart.id).await?;
        }
        if let Some(form_id) = user.feedback_form_id {
            FeedbackFormRepository::delete(&mut *tx, form_id).await?;
        }

        tx.commit().await.map_err(RepositoryError::from)?;

        Ok(())
    }
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| ServiceError::PasswordHash)
}

/// Verify a password against a stored hash.
fn verify_password(password: &str, hash: &str) -> Result<(), ServiceError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| ServiceError::WrongPassword)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| ServiceError::WrongPassword)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify_roundtrip() {
        let hash = hash_password("correct horse battery").expect("hashing succeeds");
        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(verify_password("wrong password", &hash).is_err());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same input").expect("hashing succeeds");
        let b = hash_password("same input").expect("hashing succeeds");
        assert_ne!(a, b);
    }
}
