//! Product catalog operations.

use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use clementine_core::{CategoryId, PagedResponse, PaginationQuery, ProductId, UserId, UserRole};

use super::{carts, ServiceError};
use crate::db::{
    CartItemRepository, CategoryRepository, OrderRepository, ProductRepository, RepositoryError,
};
use crate::models::{CurrentUser, NewProduct, ProductDto};

/// Input for adding a product.
#[derive(Debug, Clone)]
pub struct AddProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub size: i32,
    pub color: String,
    pub image_url: String,
    pub category_id: CategoryId,
}

/// Fields a product update may change.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub image_url: Option<String>,
}

/// Service for the product catalog.
pub struct ProductService;

impl ProductService {
    /// Add a product to the catalog, owned by the calling personnel user.
    ///
    /// # Errors
    ///
    /// Fails with `CannotAdd` unless the caller is personnel,
    /// `EntityNotFound` if the category is missing, `AlreadyExists` for a
    /// duplicate name/size/color triple, and the `Invalid*` variants for
    /// negative numeric fields.
    pub async fn add_product(
        pool: &PgPool,
        user: &CurrentUser,
        input: AddProduct,
    ) -> Result<ProductDto, ServiceError> {
        if user.role != UserRole::Personnel {
            return Err(ServiceError::CannotAdd("product"));
        }
        if input.price < Decimal::ZERO {
            return Err(ServiceError::InvalidPrice);
        }
        if input.stock < 0 {
            return Err(ServiceError::InvalidStock);
        }
        if input.size < 0 {
            return Err(ServiceError::InvalidSize);
        }

        let mut tx = pool.begin().await.map_err(RepositoryError::from)?;

        CategoryRepository::get(&mut *tx, input.category_id)
            .await?
            .ok_or(ServiceError::EntityNotFound("category"))?;

        if ProductRepository::find_duplicate(&mut *tx, &input.name, input.size, &input.color)
            .await?
            .is_some()
        {
            return Err(ServiceError::AlreadyExists("product"));
        }

        let product = ProductRepository::insert(
            &mut *tx,
            &NewProduct {
                name: input.name,
                description: input.description,
                price: input.price,
                stock: input.stock,
                size: input.size,
                color: input.color,
                image_url: input.image_url,
                category_id: input.category_id,
                owner_id: user.id,
            },
        )
        .await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        Ok(ProductDto::from(product))
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Fails with `EntityNotFound` if the product is missing.
    pub async fn get_product(pool: &PgPool, id: ProductId) -> Result<ProductDto, ServiceError> {
        let product = ProductRepository::get(pool, id)
            .await?
            .ok_or(ServiceError::EntityNotFound("product"))?;

        Ok(ProductDto::from(product))
    }

    /// Page the catalog, optionally filtered by a name search.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidSearchQuery` for oversized search strings.
    pub async fn get_products(
        pool: &PgPool,
        query: &PaginationQuery,
    ) -> Result<PagedResponse<ProductDto>, ServiceError> {
        let query = carts::validate_query(query)?;

        let (products, total) = ProductRepository::page(pool, &query).await?;
        let data = products.into_iter().map(ProductDto::from).collect();

        Ok(PagedResponse::new(&query, total, data))
    }

    /// Update a product's mutable fields.
    ///
    /// # Errors
    ///
    /// Fails with `NotOwner` unless the caller owns the product or is an
    /// admin, and with `InvalidPrice`/`InvalidStock` for negative values.
    pub async fn update_product(
        pool: &PgPool,
        user: &CurrentUser,
        id: ProductId,
        changes: ProductChanges,
    ) -> Result<ProductDto, ServiceError> {
        if user.role == UserRole::Client {
            return Err(ServiceError::UserPermission);
        }
        if changes.price.is_some_and(|p| p < Decimal::ZERO) {
            return Err(ServiceError::InvalidPrice);
        }
        if changes.stock.is_some_and(|s| s < 0) {
            return Err(ServiceError::InvalidStock);
        }

        let mut tx = pool.begin().await.map_err(RepositoryError::from)?;

        let product = ProductRepository::get_for_update(&mut *tx, id)
            .await?
            .ok_or(ServiceError::EntityNotFound("product"))?;

        if user.role != UserRole::Admin && product.owner_id != Some(user.id) {
            return Err(ServiceError::NotOwner("product"));
        }

        let product = ProductRepository::update(
            &mut *tx,
            product.id,
            changes.description.as_deref(),
            changes.price,
            changes.stock,
            changes.image_url.as_deref(),
        )
        .await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        Ok(ProductDto::from(product))
    }

    /// Delete a product, or retire it to zero stock when cart or order
    /// history still references it.
    ///
    /// # Errors
    ///
    /// Fails with `NotOwner` unless the caller owns the product or is an
    /// admin.
    pub async fn delete_product(
        pool: &PgPool,
        user: &CurrentUser,
        id: ProductId,
    ) -> Result<(), ServiceError> {
        if user.role == UserRole::Client {
            return Err(ServiceError::UserPermission);
        }

        let mut tx = pool.begin().await.map_err(RepositoryError::from)?;

        let product = ProductRepository::get_for_update(&mut *tx, id)
            .await?
            .ok_or(ServiceError::EntityNotFound("product"))?;

        if user.role != UserRole::Admin && product.owner_id != Some(user.id) {
            return Err(ServiceError::NotOwner("product"));
        }

        delete_or_retire_locked(&mut tx, product.id, false).await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        Ok(())
    }
}

/// Hard-delete a product unless cart or order history references it, in
/// which case it is retired to zero stock instead. The product row must
/// already be locked.
pub(crate) async fn delete_or_retire_locked(
    tx: &mut PgConnection,
    id: ProductId,
    detach_category: bool,
) -> Result<(), ServiceError> {
    let in_carts = !CartItemRepository::list_by_product(&mut *tx, id).await?.is_empty();
    let in_orders = OrderRepository::count_items_for_product(&mut *tx, id).await? > 0;

    if in_carts || in_orders {
        ProductRepository::retire(&mut *tx, id, detach_category).await?;
    } else {
        ProductRepository::delete(&mut *tx, id).await?;
    }

    Ok(())
}

/// Apply the delete-or-retire rule to every product a user owns, then
/// detach the retired survivors from the account. Used by the account
/// deletion cascade.
pub(crate) async fn delete_owned_locked(
    tx: &mut PgConnection,
    owner_id: UserId,
) -> Result<(), ServiceError> {
    let products = ProductRepository::list_by_owner(&mut *tx, owner_id).await?;
    for product in products {
        ProductRepository::get_for_update(&mut *tx, product.id).await?;
        delete_or_retire_locked(tx, product.id, false).await?;
    }
    ProductRepository::detach_owner(&mut *tx, owner_id).await?;

    Ok(())
}
