//! Cart-level operations.

use sqlx::PgPool;

use clementine_core::{PagedResponse, PaginationQuery, UserRole};

use super::{cart_items, ServiceError};
use crate::db::{CartItemRepository, CartRepository, RepositoryError};
use crate::models::{CartDto, CartInfoDto, CartItemDto, CurrentUser};

/// Service for a user's shopping cart.
pub struct CartService;

impl CartService {
    /// Create a bare zero-size, zero-total cart, unattached to any user.
    ///
    /// Registration creates carts internally (with `None`); over the API
    /// only admins may mint one.
    ///
    /// # Errors
    ///
    /// Fails with `CannotAdd` when the caller is neither an admin nor
    /// internal.
    pub async fn create(
        pool: &PgPool,
        requesting_user: Option<&CurrentUser>,
    ) -> Result<CartDto, ServiceError> {
        if let Some(user) = requesting_user
            && user.role != UserRole::Admin
        {
            return Err(ServiceError::CannotAdd("cart"));
        }

        let cart = CartRepository::insert(pool).await?;

        Ok(CartDto::from(cart))
    }

    /// Get the current user's cart header (item count and running total).
    ///
    /// # Errors
    ///
    /// Fails with `EntityNotFound` if the user has no cart.
    pub async fn get_cart(pool: &PgPool, user: &CurrentUser) -> Result<CartInfoDto, ServiceError> {
        let cart_id = user.cart_id.ok_or(ServiceError::EntityNotFound("cart"))?;
        let cart = CartRepository::get(pool, cart_id)
            .await?
            .ok_or(ServiceError::EntityNotFound("cart"))?;

        Ok(CartInfoDto::from(cart))
    }

    /// Page the current user's cart items, optionally filtered by product
    /// name.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidSearchQuery` for oversized search strings and
    /// `EntityNotFound` if the user has no cart.
    pub async fn get_items(
        pool: &PgPool,
        user: &CurrentUser,
        query: &PaginationQuery,
    ) -> Result<PagedResponse<CartItemDto>, ServiceError> {
        let query = validate_query(query)?;
        let cart_id = user.cart_id.ok_or(ServiceError::EntityNotFound("cart"))?;

        let (items, total) = CartItemRepository::page_for_cart(pool, cart_id, &query).await?;

        Ok(PagedResponse::new(&query, total, items))
    }

    /// Remove every item from the current user's cart, releasing the
    /// reserved stock.
    ///
    /// # Errors
    ///
    /// Fails with `EntityNotFound` if the user has no cart.
    pub async fn clear(pool: &PgPool, user: &CurrentUser) -> Result<(), ServiceError> {
        let cart_id = user.cart_id.ok_or(ServiceError::EntityNotFound("cart"))?;

        let mut tx = pool.begin().await.map_err(RepositoryError::from)?;

        let cart = CartRepository::get_for_update(&mut *tx, cart_id)
            .await?
            .ok_or(ServiceError::EntityNotFound("cart"))?;
        cart_items::clear_locked(&mut tx, &cart, false).await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        Ok(())
    }
}

/// Reject oversized search strings and clamp the page parameters.
pub(crate) fn validate_query(query: &PaginationQuery) -> Result<PaginationQuery, ServiceError> {
    if query
        .search
        .as_deref()
        .is_some_and(|s| s.len() > PaginationQuery::MAX_SEARCH_LENGTH)
    {
        return Err(ServiceError::InvalidSearchQuery);
    }

    Ok(query.clone().normalized())
}
