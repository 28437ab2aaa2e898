//! Product catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use clementine_core::{CategoryId, PagedResponse, PaginationQuery, ProductId};

use crate::error::{ApiResponse, Result};
use crate::middleware::RequireAuth;
use crate::models::ProductDto;
use crate::services::{AddProduct, ProductChanges, ProductService};
use crate::state::AppState;

/// Product creation request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddProductRequest {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub size: i32,
    pub color: String,
    #[serde(default)]
    pub image_url: String,
    pub category_id: CategoryId,
}

/// Product update request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub image_url: Option<String>,
}

/// `POST /api/products`
pub async fn add_product(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<AddProductRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ProductDto>>)> {
    let product = ProductService::add_product(
        state.pool(),
        &user,
        AddProduct {
            name: req.name,
            description: req.description,
            price: req.price,
            stock: req.stock,
            size: req.size,
            color: req.color,
            image_url: req.image_url,
            category_id: req.category_id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(product))))
}

/// `GET /api/products`
pub async fn get_products(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<PagedResponse<ProductDto>>>> {
    let page = ProductService::get_products(state.pool(), &query).await?;

    Ok(Json(ApiResponse::ok(page)))
}

/// `GET /api/products/{id}`
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<ApiResponse<ProductDto>>> {
    let product = ProductService::get_product(state.pool(), id).await?;

    Ok(Json(ApiResponse::ok(product)))
}

/// `PATCH /api/products/{id}`
pub async fn update_product(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<ProductId>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<ApiResponse<ProductDto>>> {
    let product = ProductService::update_product(
        state.pool(),
        &user,
        id,
        ProductChanges {
            description: req.description,
            price: req.price,
            stock: req.stock,
            image_url: req.image_url,
        },
    )
    .await?;

    Ok(Json(ApiResponse::ok(product)))
}

/// `DELETE /api/products/{id}`
pub async fn delete_product(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<ProductId>,
) -> Result<Json<ApiResponse<()>>> {
    ProductService::delete_product(state.pool(), &user, id).await?;

    Ok(Json(ApiResponse::empty()))
}
