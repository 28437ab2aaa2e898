//! Authentication and user management route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tower_sessions::Session;

use clementine_core::{PagedResponse, PaginationQuery, UserId, UserRole};

use crate::error::{ApiResponse, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireAuth, sign_in, sign_out};
use crate::models::UserDto;
use crate::services::UserService;
use crate::state::AppState;

/// Registration request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Admin user creation request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddUserRequest {
    pub email: String,
    pub name: String,
    pub password: String,
    pub role: UserRole,
}

/// User update request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub password: Option<String>,
}

/// `POST /api/auth/register`
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>)> {
    let user = UserService::register(
        state.pool(),
        state.email(),
        &req.email,
        &req.name,
        &req.password,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(user))))
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<UserDto>>> {
    let user = UserService::login(state.pool(), &req.email, &req.password).await?;

    sign_in(&session, user.id).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));

    Ok(Json(ApiResponse::ok(UserDto::from(user))))
}

/// `POST /api/auth/logout`
pub async fn logout(session: Session) -> Result<Json<ApiResponse<()>>> {
    sign_out(&session).await?;
    clear_sentry_user();

    Ok(Json(ApiResponse::empty()))
}

/// `GET /api/users/me`
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<ApiResponse<UserDto>>> {
    let dto = UserService::get_user(state.pool(), &user, user.id).await?;

    Ok(Json(ApiResponse::ok(dto)))
}

/// `POST /api/users`
pub async fn add_user(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<AddUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>)> {
    let created = UserService::add_user(
        state.pool(),
        &user,
        &req.email,
        &req.name,
        &req.password,
        req.role,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(created))))
}

/// `GET /api/users`
pub async fn get_users(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<PagedResponse<UserDto>>>> {
    let page = UserService::get_users(state.pool(), &user, &query).await?;

    Ok(Json(ApiResponse::ok(page)))
}

/// `GET /api/users/count`
pub async fn count_users(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<ApiResponse<i64>>> {
    let count = UserService::count_users(state.pool(), &user).await?;

    Ok(Json(ApiResponse::ok(count)))
}

/// `GET /api/users/{id}`
pub async fn get_user(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<UserId>,
) -> Result<Json<ApiResponse<UserDto>>> {
    let dto = UserService::get_user(state.pool(), &user, id).await?;

    Ok(Json(ApiResponse::ok(dto)))
}

/// `PATCH /api/users/{id}`
pub async fn update_user(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<UserId>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserDto>>> {
    let dto = UserService::update_user(
        state.pool(),
        &user,
        id,
        req.name.as_deref(),
        req.password.as_deref(),
    )
    .await?;

    Ok(Json(ApiResponse::ok(dto)))
}

/// `DELETE /api/users/{id}`
///
/// Deleting your own account also ends the session.
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Path(id): Path<UserId>,
) -> Result<Json<ApiResponse<()>>> {
    UserService::delete_user(state.pool(), &user, id).await?;

    if user.id == id {
        sign_out(&session).await?;
        clear_sentry_user();
    }

    Ok(Json(ApiResponse::empty()))
}
