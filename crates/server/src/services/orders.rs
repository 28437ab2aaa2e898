//! Order operations.

use chrono::{Duration, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use sqlx::PgPool;

use clementine_core::{OrderId, PagedResponse, PaginationQuery, PhoneNumber, UserRole};

use super::{cart_items, carts, ServiceError};
use crate::db::{CartItemRepository, CartRepository, OrderRepository, RepositoryError};
use crate::models::{CurrentUser, NewOrder, OrderDto};

/// Earliest and latest promised delivery, in days after checkout.
const DELIVERY_DAYS: std::ops::Range<i64> = 3..7;

/// Service for checkout and order history.
pub struct OrderService;

impl OrderService {
    /// Convert the current user's cart into an order.
    ///
    /// The order freezes the cart's line prices and empties the cart without
    /// restocking, since the stock was already reserved when the items were
    /// added. Everything happens in one transaction.
    ///
    /// # Errors
    ///
    /// Fails with `EntityNotFound` if the user has no cart,
    /// `InvalidPhoneNumber` for malformed phone numbers and `CartEmpty` when
    /// there is nothing to buy.
    pub async fn create_order(
        pool: &PgPool,
        user: &CurrentUser,
        shipping_address: String,
        phone_number: &str,
    ) -> Result<OrderDto, ServiceError> {
        let phone_number =
            PhoneNumber::parse(phone_number).map_err(|_| ServiceError::InvalidPhoneNumber)?;
        let cart_id = user.cart_id.ok_or(ServiceError::EntityNotFound("cart"))?;

        let mut tx = pool.begin().await.map_err(RepositoryError::from)?;

        let cart = CartRepository::get_for_update(&mut *tx, cart_id)
            .await?
            .ok_or(ServiceError::EntityNotFound("cart"))?;
        let items = CartItemRepository::list_by_cart(&mut *tx, cart.id).await?;
        if items.is_empty() {
            return Err(ServiceError::CartEmpty);
        }

        let order_date = Utc::now();
        let delivery_date = order_date + Duration::days(rand::rng().random_range(DELIVERY_DAYS));
        let total = items.iter().map(|item| item.price).sum::<Decimal>();

        let order = OrderRepository::insert(
            &mut *tx,
            &NewOrder {
                user_id: user.id,
                order_date,
                delivery_date,
                shipping_address,
                phone_number,
                total,
            },
        )
        .await?;

        let mut order_items = Vec::with_capacity(items.len());
        for item in &items {
            let order_item = OrderRepository::insert_item(
                &mut *tx,
                order.id,
                item.product_id,
                item.quantity,
                item.price,
            )
            .await?;
            order_items.push(order_item);
        }

        cart_items::clear_locked(&mut tx, &cart, true).await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        Ok(OrderDto::from_parts(order, order_items))
    }

    /// Page the current user's order history, newest first.
    ///
    /// Orders whose promised delivery date has passed are flipped to
    /// delivered before the page is read.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidSearchQuery` for oversized search strings.
    pub async fn get_orders(
        pool: &PgPool,
        user: &CurrentUser,
        query: &PaginationQuery,
    ) -> Result<PagedResponse<OrderDto>, ServiceError> {
        let query = carts::validate_query(query)?;

        OrderRepository::sweep_delivered(pool, user.id).await?;

        let (orders, total) = OrderRepository::page_for_user(pool, user.id, &query).await?;

        let mut dtos = Vec::with_capacity(orders.len());
        for order in orders {
            let items = OrderRepository::items(pool, order.id).await?;
            dtos.push(OrderDto::from_parts(order, items));
        }

        Ok(PagedResponse::new(&query, total, dtos))
    }

    /// Get a single order with its items.
    ///
    /// The status is reported as stored, without the delivery sweep.
    ///
    /// # Errors
    ///
    /// Fails with `EntityNotFound` if the order is missing and `NotOwner`
    /// if it belongs to someone else.
    pub async fn get_order(
        pool: &PgPool,
        user: &CurrentUser,
        order_id: OrderId,
    ) -> Result<OrderDto, ServiceError> {
        let order = OrderRepository::get(pool, order_id)
            .await?
            .ok_or(ServiceError::EntityNotFound("order"))?;

        if user.role != UserRole::Admin && order.user_id != user.id {
            return Err(ServiceError::NotOwner("order"));
        }

        let items = OrderRepository::items(pool, order.id).await?;

        Ok(OrderDto::from_parts(order, items))
    }
}
