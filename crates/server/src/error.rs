//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. Errors are rendered into
//! the uniform response envelope; server-side failures are captured to
//! Sentry before the details are hidden from the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::ServiceError;

/// Uniform response envelope. Success payloads fill `response`, failures
/// fill `error_message`, never both.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Wrap a success payload.
    pub const fn ok(payload: T) -> Self {
        Self {
            response: Some(payload),
            error_message: None,
        }
    }

    /// An empty success envelope.
    pub const fn empty() -> Self {
        Self {
            response: None,
            error_message: None,
        }
    }

    /// Wrap an error message.
    pub const fn error(message: String) -> Self {
        Self {
            response: None,
            error_message: Some(message),
        }
    }
}

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Business operation failed.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Database operation failed outside the service layer.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Caller is not authenticated.
    #[error("Unauthorized")]
    Unauthorized,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Service(err) => match err {
                ServiceError::EntityNotFound(_) => StatusCode::NOT_FOUND,
                ServiceError::NotOwner(_)
                | ServiceError::UserPermission
                | ServiceError::CannotAdd(_)
                | ServiceError::CannotUpdate(_)
                | ServiceError::CannotDelete(_) => StatusCode::FORBIDDEN,
                ServiceError::AlreadyExists(_) => StatusCode::CONFLICT,
                ServiceError::InvalidQuantity
                | ServiceError::InvalidStock
                | ServiceError::InvalidPrice
                | ServiceError::InvalidSize
                | ServiceError::InvalidPhoneNumber
                | ServiceError::InvalidEmail
                | ServiceError::WeakPassword(_)
                | ServiceError::InvalidSearchQuery
                | ServiceError::NotEnoughStock
                | ServiceError::CartEmpty
                | ServiceError::WrongPassword => StatusCode::BAD_REQUEST,
                ServiceError::PasswordHash | ServiceError::Repository(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Database(_) | Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry, and hide their details
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_statuses() {
        let cases = [
            (ServiceError::EntityNotFound("cart"), StatusCode::NOT_FOUND),
            (ServiceError::NotOwner("order"), StatusCode::FORBIDDEN),
            (ServiceError::UserPermission, StatusCode::FORBIDDEN),
            (ServiceError::CannotAdd("cart"), StatusCode::FORBIDDEN),
            (
                ServiceError::AlreadyExists("product"),
                StatusCode::CONFLICT,
            ),
            (ServiceError::NotEnoughStock, StatusCode::BAD_REQUEST),
            (ServiceError::CartEmpty, StatusCode::BAD_REQUEST),
            (ServiceError::WrongPassword, StatusCode::BAD_REQUEST),
            (
                ServiceError::PasswordHash,
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(AppError::Service(err).status(), expected);
        }
    }

    #[test]
    fn test_envelope_shape() {
        let ok = serde_json::to_value(ApiResponse::ok(1)).expect("serializes");
        assert_eq!(ok, serde_json::json!({ "response": 1 }));

        let err = serde_json::to_value(ApiResponse::<()>::error("nope".into())).expect("serializes");
        assert_eq!(err, serde_json::json!({ "errorMessage": "nope" }));

        let empty = serde_json::to_value(ApiResponse::<()>::empty()).expect("serializes");
        assert_eq!(empty, serde_json::json!({}));
    }
}
