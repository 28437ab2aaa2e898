//! Error type shared by the service layer.

use crate::db::RepositoryError;

/// Errors produced by business operations.
///
/// Routes map these onto HTTP statuses; the service layer itself stays
/// transport-agnostic.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0} not found")]
    EntityNotFound(&'static str),

    #[error("you do not own this {0}")]
    NotOwner(&'static str),

    #[error("your role does not permit this operation")]
    UserPermission,

    #[error("{0} already exists")]
    AlreadyExists(&'static str),

    #[error("quantity must be positive")]
    InvalidQuantity,

    #[error("stock cannot be negative")]
    InvalidStock,

    #[error("price cannot be negative")]
    InvalidPrice,

    #[error("size cannot be negative")]
    InvalidSize,

    #[error("phone number must be exactly 10 digits")]
    InvalidPhoneNumber,

    #[error("invalid email address")]
    InvalidEmail,

    #[error("password must be at least {0} characters")]
    WeakPassword(usize),

    #[error("search query is too long")]
    InvalidSearchQuery,

    #[error("not enough stock available")]
    NotEnoughStock,

    #[error("cart is empty")]
    CartEmpty,

    #[error("you cannot add this {0}")]
    CannotAdd(&'static str),

    #[error("you cannot update this {0}")]
    CannotUpdate(&'static str),

    #[error("you cannot delete this {0}")]
    CannotDelete(&'static str),

    #[error("wrong email or password")]
    WrongPassword,

    #[error("failed to hash password")]
    PasswordHash,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
