//! Feedback form operations.

use sqlx::PgPool;

use clementine_core::{PagedResponse, PaginationQuery, UserRole};

use super::{carts, ServiceError};
use crate::db::{FeedbackFormRepository, RepositoryError, UserRepository};
use crate::models::{CurrentUser, FeedbackFormDto};

/// Input for submitting a feedback form.
#[derive(Debug, Clone)]
pub struct SubmitFeedback {
    pub feedback: String,
    pub overall_rating: i32,
    pub delivery_rating: i32,
    pub favorite_features: String,
}

/// Service for customer feedback forms.
pub struct FeedbackFormService;

impl FeedbackFormService {
    /// Submit the current user's feedback form. Clients only, one per
    /// account; the form is linked onto the user row in the same
    /// transaction.
    ///
    /// # Errors
    ///
    /// Fails with `UserPermission` for non-client callers and
    /// `AlreadyExists` when the user already submitted one.
    pub async fn submit(
        pool: &PgPool,
        user: &CurrentUser,
        input: SubmitFeedback,
    ) -> Result<FeedbackFormDto, ServiceError> {
        if user.role != UserRole::Client {
            return Err(ServiceError::UserPermission);
        }
        if user.feedback_form_id.is_some() {
            return Err(ServiceError::AlreadyExists("feedback form"));
        }

        let mut tx = pool.begin().await.map_err(RepositoryError::from)?;

        let form = FeedbackFormRepository::insert(
            &mut *tx,
            &input.feedback,
            input.overall_rating,
            input.delivery_rating,
            &input.favorite_features,
        )
        .await?;
        UserRepository::set_feedback_form(&mut *tx, user.id, form.id).await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        Ok(FeedbackFormDto::from(form))
    }

    /// Get the current user's own feedback form.
    ///
    /// # Errors
    ///
    /// Fails with `EntityNotFound` if none was submitted.
    pub async fn get_own(pool: &PgPool, user: &CurrentUser) -> Result<FeedbackFormDto, ServiceError> {
        let form_id = user
            .feedback_form_id
            .ok_or(ServiceError::EntityNotFound("feedback form"))?;

        let form = FeedbackFormRepository::get(pool, form_id)
            .await?
            .ok_or(ServiceError::EntityNotFound("feedback form"))?;

        Ok(FeedbackFormDto::from(form))
    }

    /// Page all submitted feedback forms. Admin only.
    ///
    /// # Errors
    ///
    /// Fails with `UserPermission` unless the caller is an admin and
    /// `InvalidSearchQuery` for oversized search strings.
    pub async fn get_forms(
        pool: &PgPool,
        user: &CurrentUser,
        query: &PaginationQuery,
    ) -> Result<PagedResponse<FeedbackFormDto>, ServiceError> {
        if user.role != UserRole::Admin {
            return Err(ServiceError::UserPermission);
        }

        let query = carts::validate_query(query)?;

        let (forms, total) = FeedbackFormRepository::page(pool, &query).await?;
        let data = forms.into_iter().map(FeedbackFormDto::from).collect();

        Ok(PagedResponse::new(&query, total, data))
    }
}
