//! Cart item operations.
//!
//! Every mutation runs in a single transaction that locks the cart row and
//! the product rows it touches, so the cart counters, the price snapshots
//! and the product stock always move together.

use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use clementine_core::{CartItemId, ProductId, UserRole};

use super::ServiceError;
use crate::db::{CartItemRepository, CartRepository, ProductRepository};
use crate::models::{Cart, CartItem, CurrentUser, Product};

/// Service for the items of a user's cart.
pub struct CartItemService;

impl CartItemService {
    /// Add a product to the current user's cart.
    ///
    /// If the cart already holds the product the quantities are merged.
    /// Stock is reserved immediately.
    ///
    /// # Errors
    ///
    /// Fails with `EntityNotFound` if the cart or product is missing,
    /// `InvalidQuantity` for non-positive quantities and `NotEnoughStock`
    /// when the product cannot cover the request.
    pub async fn add_item(
        pool: &PgPool,
        user: &CurrentUser,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), ServiceError> {
        if quantity <= 0 {
            return Err(ServiceError::InvalidQuantity);
        }

        let cart_id = user.cart_id.ok_or(ServiceError::EntityNotFound("cart"))?;

        let mut tx = pool.begin().await.map_err(crate::db::RepositoryError::from)?;

        let cart = CartRepository::get_for_update(&mut *tx, cart_id)
            .await?
            .ok_or(ServiceError::EntityNotFound("cart"))?;
        let product = ProductRepository::get_for_update(&mut *tx, product_id)
            .await?
            .ok_or(ServiceError::EntityNotFound("product"))?;

        match CartItemRepository::find_by_product(&mut *tx, cart.id, product.id).await? {
            Some(item) => {
                let merged = item
                    .quantity
                    .checked_add(quantity)
                    .ok_or(ServiceError::InvalidQuantity)?;
                update_locked(&mut tx, &cart, &product, &item, merged).await?;
            }
            None => {
                if product.stock < quantity {
                    return Err(ServiceError::NotEnoughStock);
                }

                let line_price = product.price * Decimal::from(quantity);
                CartItemRepository::insert(&mut *tx, cart.id, product.id, quantity, line_price)
                    .await?;
                CartRepository::apply_delta(&mut *tx, cart.id, quantity, line_price).await?;
                ProductRepository::adjust_stock(&mut *tx, product.id, -quantity).await?;
            }
        }

        tx.commit().await.map_err(crate::db::RepositoryError::from)?;

        Ok(())
    }

    /// Set the quantity of a cart item. Quantity zero removes the item and
    /// releases its stock.
    ///
    /// # Errors
    ///
    /// Fails with `NotOwner` if the item belongs to another user's cart,
    /// `InvalidQuantity` for negative quantities and `NotEnoughStock` when
    /// the increase cannot be covered.
    pub async fn update_item(
        pool: &PgPool,
        user: &CurrentUser,
        item_id: CartItemId,
        quantity: i32,
    ) -> Result<(), ServiceError> {
        if quantity < 0 {
            return Err(ServiceError::InvalidQuantity);
        }

        let mut tx = pool.begin().await.map_err(crate::db::RepositoryError::from)?;

        let item = CartItemRepository::get(&mut *tx, item_id)
            .await?
            .ok_or(ServiceError::EntityNotFound("cart item"))?;

        if user.role != UserRole::Admin && user.cart_id != Some(item.cart_id) {
            return Err(ServiceError::NotOwner("cart item"));
        }

        let cart = CartRepository::get_for_update(&mut *tx, item.cart_id)
            .await?
            .ok_or(ServiceError::EntityNotFound("cart"))?;
        let product = ProductRepository::get_for_update(&mut *tx, item.product_id)
            .await?
            .ok_or(ServiceError::EntityNotFound("product"))?;

        if quantity == 0 {
            remove_locked(&mut tx, &cart, &item, false).await?;
        } else {
            update_locked(&mut tx, &cart, &product, &item, quantity).await?;
        }

        tx.commit().await.map_err(crate::db::RepositoryError::from)?;

        Ok(())
    }

    /// Remove an item from its cart and release the reserved stock.
    ///
    /// # Errors
    ///
    /// Fails with `NotOwner` if the item belongs to another user's cart.
    pub async fn remove_item(
        pool: &PgPool,
        user: &CurrentUser,
        item_id: CartItemId,
    ) -> Result<(), ServiceError> {
        let mut tx = pool.begin().await.map_err(crate::db::RepositoryError::from)?;

        let item = CartItemRepository::get(&mut *tx, item_id)
            .await?
            .ok_or(ServiceError::EntityNotFound("cart item"))?;

        if user.role != UserRole::Admin && user.cart_id != Some(item.cart_id) {
            return Err(ServiceError::NotOwner("cart item"));
        }

        let cart = CartRepository::get_for_update(&mut *tx, item.cart_id)
            .await?
            .ok_or(ServiceError::EntityNotFound("cart"))?;
        ProductRepository::get_for_update(&mut *tx, item.product_id)
            .await?
            .ok_or(ServiceError::EntityNotFound("product"))?;

        remove_locked(&mut tx, &cart, &item, false).await?;

        tx.commit().await.map_err(crate::db::RepositoryError::from)?;

        Ok(())
    }
}

/// Set an item to a new quantity. Cart and product rows must already be
/// locked by the caller's transaction.
pub(crate) async fn update_locked(
    tx: &mut PgConnection,
    cart: &Cart,
    product: &Product,
    item: &CartItem,
    quantity: i32,
) -> Result<(), ServiceError> {
    let delta = quantity
        .checked_sub(item.quantity)
        .ok_or(ServiceError::InvalidQuantity)?;
    if delta > 0 && product.stock < delta {
        return Err(ServiceError::NotEnoughStock);
    }

    let new_price = product.price * Decimal::from(quantity);
    CartItemRepository::set_quantity_and_price(&mut *tx, item.id, quantity, new_price).await?;
    CartRepository::apply_delta(&mut *tx, cart.id, delta, new_price - item.price).await?;
    ProductRepository::adjust_stock(&mut *tx, product.id, -delta).await?;

    Ok(())
}

/// Delete an item and roll its contribution out of the cart counters. The
/// cart row must already be locked. `bought` suppresses the restock when
/// the items were converted into an order.
pub(crate) async fn remove_locked(
    tx: &mut PgConnection,
    cart: &Cart,
    item: &CartItem,
    bought: bool,
) -> Result<(), ServiceError> {
    CartItemRepository::delete(&mut *tx, item.id).await?;
    CartRepository::apply_delta(&mut *tx, cart.id, -item.quantity, -item.price).await?;
    if !bought {
        ProductRepository::adjust_stock(&mut *tx, item.product_id, item.quantity).await?;
    }

    Ok(())
}

/// Empty a locked cart item by item. `bought` carries through to each
/// removal.
///
/// Restocking touches the product rows, so those are locked up front in
/// ascending product-id order, the same order every other multi-product
/// transaction uses.
pub(crate) async fn clear_locked(
    tx: &mut PgConnection,
    cart: &Cart,
    bought: bool,
) -> Result<(), ServiceError> {
    let items = CartItemRepository::list_by_cart(&mut *tx, cart.id).await?;
    if !bought {
        for product_id in product_lock_order(&items) {
            ProductRepository::get_for_update(&mut *tx, product_id)
                .await?
                .ok_or(ServiceError::EntityNotFound("product"))?;
        }
    }
    for item in items {
        remove_locked(tx, cart, &item, bought).await?;
    }

    Ok(())
}

/// The product ids of a cart's items in ascending order.
fn product_lock_order(items: &[CartItem]) -> Vec<ProductId> {
    let mut ids: Vec<ProductId> = items.iter().map(|item| item.product_id).collect();
    ids.sort_unstable_by_key(ProductId::as_i32);
    ids
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use clementine_core::{CartId, CartItemId};

    use super::*;

    fn item(id: i32, product_id: i32) -> CartItem {
        CartItem {
            id: CartItemId::new(id),
            cart_id: CartId::new(1),
            product_id: ProductId::new(product_id),
            quantity: 1,
            price: Decimal::ONE,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_products_lock_in_ascending_id_order() {
        // Items come back in insertion order; the locks must not
        let items = vec![item(1, 9), item(2, 3), item(3, 6)];
        assert_eq!(
            product_lock_order(&items),
            vec![ProductId::new(3), ProductId::new(6), ProductId::new(9)]
        );
    }
}
