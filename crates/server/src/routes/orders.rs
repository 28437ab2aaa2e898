//! Order route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use clementine_core::{OrderId, PagedResponse, PaginationQuery};

use crate::error::{ApiResponse, Result};
use crate::middleware::RequireAuth;
use crate::models::OrderDto;
use crate::services::OrderService;
use crate::state::AppState;

/// Checkout request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub shipping_address: String,
    pub phone_number: String,
}

/// `POST /api/orders`
pub async fn create_order(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<OrderDto>>)> {
    let order = OrderService::create_order(
        state.pool(),
        &user,
        req.shipping_address,
        &req.phone_number,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(order))))
}

/// `GET /api/orders`
pub async fn get_orders(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<PagedResponse<OrderDto>>>> {
    let page = OrderService::get_orders(state.pool(), &user, &query).await?;

    Ok(Json(ApiResponse::ok(page)))
}

/// `GET /api/orders/{id}`
pub async fn get_order(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<OrderId>,
) -> Result<Json<ApiResponse<OrderDto>>> {
    let order = OrderService::get_order(state.pool(), &user, id).await?;

    Ok(Json(ApiResponse::ok(order)))
}
