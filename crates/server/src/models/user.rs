//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use clementine_core::{CartId, Email, FeedbackFormId, UserId, UserRole};

/// A user account row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub name: String,
    /// Argon2 PHC-format hash, never exposed.
    pub password_hash: String,
    pub role: UserRole,
    /// Every account gets a cart at creation. Nullable only for the window
    /// inside the account deletion transaction.
    pub cart_id: Option<CartId>,
    /// Set once the user has submitted their (single) feedback form.
    pub feedback_form_id: Option<FeedbackFormId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for inserting a user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub name: String,
    pub password_hash: String,
    pub role: UserRole,
    pub cart_id: Option<CartId>,
}

/// Per-request caller identity, resolved from the session by the
/// `RequireAuth` extractor and passed explicitly into every service call.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: Email,
    pub name: String,
    pub role: UserRole,
    pub cart_id: Option<CartId>,
    pub feedback_form_id: Option<FeedbackFormId>,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            cart_id: user.cart_id,
            feedback_form_id: user.feedback_form_id,
        }
    }
}

/// User response payload. Omits the password hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: UserId,
    pub email: Email,
    pub name: String,
    pub role: UserRole,
    pub cart_id: Option<CartId>,
    pub feedback_form_id: Option<FeedbackFormId>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            cart_id: user.cart_id,
            feedback_form_id: user.feedback_form_id,
            created_at: user.created_at,
        }
    }
}
