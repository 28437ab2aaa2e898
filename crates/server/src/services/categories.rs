//! Category operations. All writes are admin-gated.

use sqlx::PgPool;

use clementine_core::{CategoryId, PagedResponse, PaginationQuery, UserRole};

use super::{carts, products, ServiceError};
use crate::db::{CategoryRepository, ProductRepository, RepositoryError};
use crate::models::{CategoryDto, CurrentUser};

/// Service for product categories.
pub struct CategoryService;

impl CategoryService {
    /// Create a category.
    ///
    /// # Errors
    ///
    /// Fails with `UserPermission` unless the caller is an admin and
    /// `AlreadyExists` for a duplicate name.
    pub async fn add_category(
        pool: &PgPool,
        user: &CurrentUser,
        name: &str,
        description: &str,
    ) -> Result<CategoryDto, ServiceError> {
        if user.role != UserRole::Admin {
            return Err(ServiceError::UserPermission);
        }

        if CategoryRepository::get_by_name(pool, name).await?.is_some() {
            return Err(ServiceError::AlreadyExists("category"));
        }

        let category = CategoryRepository::insert(pool, name, description)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => ServiceError::AlreadyExists("category"),
                other => other.into(),
            })?;

        Ok(CategoryDto::from(category))
    }

    /// Get a category by ID.
    ///
    /// # Errors
    ///
    /// Fails with `EntityNotFound` if the category is missing.
    pub async fn get_category(pool: &PgPool, id: CategoryId) -> Result<CategoryDto, ServiceError> {
        let category = CategoryRepository::get(pool, id)
            .await?
            .ok_or(ServiceError::EntityNotFound("category"))?;

        Ok(CategoryDto::from(category))
    }

    /// Page categories, optionally filtered by a name search.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidSearchQuery` for oversized search strings.
    pub async fn get_categories(
        pool: &PgPool,
        query: &PaginationQuery,
    ) -> Result<PagedResponse<CategoryDto>, ServiceError> {
        let query = carts::validate_query(query)?;

        let (categories, total) = CategoryRepository::page(pool, &query).await?;
        let data = categories.into_iter().map(CategoryDto::from).collect();

        Ok(PagedResponse::new(&query, total, data))
    }

    /// Rename or re-describe a category.
    ///
    /// # Errors
    ///
    /// Fails with `UserPermission` unless the caller is an admin,
    /// `EntityNotFound` if the category is missing and `AlreadyExists` when
    /// the new name is taken.
    pub async fn update_category(
        pool: &PgPool,
        user: &CurrentUser,
        id: CategoryId,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<CategoryDto, ServiceError> {
        if user.role != UserRole::Admin {
            return Err(ServiceError::UserPermission);
        }

        let category = CategoryRepository::update(pool, id, name, description)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => ServiceError::EntityNotFound("category"),
                RepositoryError::Conflict(_) => ServiceError::AlreadyExists("category"),
                other => other.into(),
            })?;

        Ok(CategoryDto::from(category))
    }

    /// Delete a category together with its unreferenced products. Products
    /// still referenced by cart or order history are retired to zero stock
    /// and detached instead.
    ///
    /// # Errors
    ///
    /// Fails with `UserPermission` unless the caller is an admin and
    /// `EntityNotFound` if the category is missing.
    pub async fn delete_category(
        pool: &PgPool,
        user: &CurrentUser,
        id: CategoryId,
    ) -> Result<(), ServiceError> {
        if user.role != UserRole::Admin {
            return Err(ServiceError::UserPermission);
        }

        let mut tx = pool.begin().await.map_err(RepositoryError::from)?;

        let category = CategoryRepository::get(&mut *tx, id)
            .await?
            .ok_or(ServiceError::EntityNotFound("category"))?;

        let in_category = ProductRepository::list_by_category(&mut *tx, category.id).await?;
        for product in in_category {
            ProductRepository::get_for_update(&mut *tx, product.id).await?;
            products::delete_or_retire_locked(&mut tx, product.id, true).await?;
        }

        CategoryRepository::delete(&mut *tx, category.id).await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        Ok(())
    }
}
