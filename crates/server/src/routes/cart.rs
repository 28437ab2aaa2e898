//! Cart route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use clementine_core::{CartItemId, PagedResponse, PaginationQuery, ProductId};

use crate::error::{ApiResponse, Result};
use crate::middleware::RequireAuth;
use crate::models::{CartDto, CartInfoDto, CartItemDto};
use crate::services::{CartItemService, CartService};
use crate::state::AppState;

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// Cart item quantity update request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    pub quantity: i32,
}

/// `POST /api/cart`
pub async fn create_cart(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<(StatusCode, Json<ApiResponse<CartDto>>)> {
    let cart = CartService::create(state.pool(), Some(&user)).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(cart))))
}

/// `GET /api/cart`
pub async fn get_cart(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<ApiResponse<CartInfoDto>>> {
    let cart = CartService::get_cart(state.pool(), &user).await?;

    Ok(Json(ApiResponse::ok(cart)))
}

/// `GET /api/cart/items`
pub async fn get_items(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<PagedResponse<CartItemDto>>>> {
    let page = CartService::get_items(state.pool(), &user, &query).await?;

    Ok(Json(ApiResponse::ok(page)))
}

/// `POST /api/cart/items`
pub async fn add_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<AddItemRequest>,
) -> Result<(StatusCode, Json<ApiResponse<()>>)> {
    CartItemService::add_item(state.pool(), &user, req.product_id, req.quantity).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::empty())))
}

/// `PATCH /api/cart/items/{id}`
pub async fn update_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<CartItemId>,
    Json(req): Json<UpdateItemRequest>,
) -> Result<Json<ApiResponse<()>>> {
    CartItemService::update_item(state.pool(), &user, id, req.quantity).await?;

    Ok(Json(ApiResponse::empty()))
}

/// `DELETE /api/cart/items/{id}`
pub async fn remove_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<CartItemId>,
) -> Result<Json<ApiResponse<()>>> {
    CartItemService::remove_item(state.pool(), &user, id).await?;

    Ok(Json(ApiResponse::empty()))
}

/// `DELETE /api/cart`
pub async fn clear_cart(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<ApiResponse<()>>> {
    CartService::clear(state.pool(), &user).await?;

    Ok(Json(ApiResponse::empty()))
}
