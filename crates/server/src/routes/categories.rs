//! Category route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use clementine_core::{CategoryId, PagedResponse, PaginationQuery};

use crate::error::{ApiResponse, Result};
use crate::middleware::RequireAuth;
use crate::models::CategoryDto;
use crate::services::CategoryService;
use crate::state::AppState;

/// Category creation request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCategoryRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Category update request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// `POST /api/categories`
pub async fn add_category(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<AddCategoryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryDto>>)> {
    let category =
        CategoryService::add_category(state.pool(), &user, &req.name, &req.description).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(category))))
}

/// `GET /api/categories`
pub async fn get_categories(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<PagedResponse<CategoryDto>>>> {
    let page = CategoryService::get_categories(state.pool(), &query).await?;

    Ok(Json(ApiResponse::ok(page)))
}

/// `GET /api/categories/{id}`
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> Result<Json<ApiResponse<CategoryDto>>> {
    let category = CategoryService::get_category(state.pool(), id).await?;

    Ok(Json(ApiResponse::ok(category)))
}

/// `PATCH /api/categories/{id}`
pub async fn update_category(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<CategoryId>,
    Json(req): Json<UpdateCategoryRequest>,
) -> Result<Json<ApiResponse<CategoryDto>>> {
    let category = CategoryService::update_category(
        state.pool(),
        &user,
        id,
        req.name.as_deref(),
        req.description.as_deref(),
    )
    .await?;

    Ok(Json(ApiResponse::ok(category)))
}

/// `DELETE /api/categories/{id}`
pub async fn delete_category(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<CategoryId>,
) -> Result<Json<ApiResponse<()>>> {
    CategoryService::delete_category(state.pool(), &user, id).await?;

    Ok(Json(ApiResponse::empty()))
}
