//! Authentication extractors.
//!
//! The session stores only the user ID; the account row is reloaded on
//! every request so role changes and deletions take effect immediately.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use clementine_core::UserId;

use crate::db::UserRepository;
use crate::error::AppError;
use crate::models::CurrentUser;
use crate::state::AppState;

/// Session key holding the authenticated user's ID.
pub const SESSION_USER_ID: &str = "user_id";

/// Extractor that requires an authenticated user.
///
/// Rejects with 401 when there is no session or the account no longer
/// exists.
pub struct RequireAuth(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AppError::Unauthorized)?;

        let user_id: UserId = session
            .get(SESSION_USER_ID)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let user = UserRepository::get(state.pool(), user_id)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::Unauthorized)?;

        Ok(Self(CurrentUser::from(user)))
    }
}

/// Bind the session to a user after successful login.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn sign_in(session: &Session, user_id: UserId) -> Result<(), AppError> {
    // Fresh session ID on privilege change
    session.cycle_id().await?;
    session.insert(SESSION_USER_ID, user_id).await?;
    Ok(())
}

/// Destroy the session on logout.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn sign_out(session: &Session) -> Result<(), AppError> {
    session.flush().await?;
    Ok(())
}
