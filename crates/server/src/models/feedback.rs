//! Feedback form domain types.
//!
//! At most one form per client user; immutable after creation.

use chrono::{DateTime, Utc};
use serde::Serialize;

use clementine_core::FeedbackFormId;

/// A feedback form row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FeedbackForm {
    pub id: FeedbackFormId,
    pub feedback: String,
    pub overall_rating: i32,
    pub delivery_rating: i32,
    pub favorite_features: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Feedback form response payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackFormDto {
    pub id: FeedbackFormId,
    pub feedback: String,
    pub overall_rating: i32,
    pub delivery_rating: i32,
    pub favorite_features: String,
    pub created_at: DateTime<Utc>,
}

impl From<FeedbackForm> for FeedbackFormDto {
    fn from(form: FeedbackForm) -> Self {
        Self {
            id: form.id,
            feedback: form.feedback,
            overall_rating: form.overall_rating,
            delivery_rating: form.delivery_rating,
            favorite_features: form.favorite_features,
            created_at: form.created_at,
        }
    }
}
