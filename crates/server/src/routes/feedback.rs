//! Feedback form route handlers.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use clementine_core::{PagedResponse, PaginationQuery};

use crate::error::{ApiResponse, Result};
use crate::middleware::RequireAuth;
use crate::models::FeedbackFormDto;
use crate::services::{FeedbackFormService, SubmitFeedback};
use crate::state::AppState;

/// Feedback submission request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFeedbackRequest {
    pub feedback: String,
    pub overall_rating: i32,
    pub delivery_rating: i32,
    #[serde(default)]
    pub favorite_features: String,
}

/// `POST /api/feedback`
pub async fn submit(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<SubmitFeedbackRequest>,
) -> Result<(StatusCode, Json<ApiResponse<FeedbackFormDto>>)> {
    let form = FeedbackFormService::submit(
        state.pool(),
        &user,
        SubmitFeedback {
            feedback: req.feedback,
            overall_rating: req.overall_rating,
            delivery_rating: req.delivery_rating,
            favorite_features: req.favorite_features,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(form))))
}

/// `GET /api/feedback`
pub async fn get_own(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<ApiResponse<FeedbackFormDto>>> {
    let form = FeedbackFormService::get_own(state.pool(), &user).await?;

    Ok(Json(ApiResponse::ok(form)))
}

/// `GET /api/feedback/all`
pub async fn get_forms(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<PagedResponse<FeedbackFormDto>>>> {
    let page = FeedbackFormService::get_forms(state.pool(), &user, &query).await?;

    Ok(Json(ApiResponse::ok(page)))
}
