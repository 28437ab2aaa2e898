//! Seed the database with demo catalog data.
//!
//! Creates a personnel account, a few categories and a small product
//! catalog, enough to exercise the API by hand. Safe to re-run: existing
//! rows are left alone.

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use rust_decimal::Decimal;

use clementine_core::{Email, UserRole};
use clementine_server::db::{
    CartRepository, CategoryRepository, ProductRepository, UserRepository, create_pool,
};
use clementine_server::models::{NewProduct, NewUser};

use super::CommandError;

const PERSONNEL_EMAIL: &str = "staff@clementine.shop";
const PERSONNEL_PASSWORD: &str = "staff-demo-only";

const CATEGORIES: &[(&str, &str)] = &[
    ("Shirts", "Tops for every season"),
    ("Shoes", "Footwear from sneakers to boots"),
    ("Accessories", "Belts, bags and everything else"),
];

/// (name, description, price, stock, size, color, category index)
const PRODUCTS: &[(&str, &str, &str, i32, i32, &str, usize)] = &[
    ("Linen Shirt", "Breathable summer shirt", "39.99", 25, 40, "white", 0),
    ("Flannel Shirt", "Heavy winter flannel", "49.99", 18, 42, "red", 0),
    ("Canvas Sneaker", "Everyday low-top", "59.99", 30, 43, "black", 1),
    ("Leather Belt", "Full-grain leather", "24.99", 50, 90, "brown", 2),
];

/// Seed demo data.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails.
pub async fn run() -> Result<(), CommandError> {
    let database_url = super::database_url()?;

    tracing::info!("Connecting to database...");
    let pool = create_pool(&database_url).await?;

    let staff_email =
        Email::parse(PERSONNEL_EMAIL).map_err(|_| CommandError::InvalidEmail(PERSONNEL_EMAIL.to_owned()))?;

    let staff = match UserRepository::get_by_email(&pool, &staff_email).await? {
        Some(user) => {
            tracing::info!("Personnel account already exists, skipping");
            user
        }
        None => {
            let salt = SaltString::generate(&mut OsRng);
            let password_hash = Argon2::default()
                .hash_password(PERSONNEL_PASSWORD.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|_| CommandError::PasswordHash)?;

            let mut tx = pool.begin().await?;
            let cart = CartRepository::insert(&mut *tx).await?;
            let user = UserRepository::insert(
                &mut *tx,
                &NewUser {
                    email: staff_email,
                    name: "Demo Staff".to_owned(),
                    password_hash,
                    role: UserRole::Personnel,
                    cart_id: Some(cart.id),
                },
            )
            .await?;
            tx.commit().await?;

            tracing::info!("Personnel account created: {}", PERSONNEL_EMAIL);
            user
        }
    };

    let mut category_ids = Vec::with_capacity(CATEGORIES.len());
    for (name, description) in CATEGORIES {
        let category = match CategoryRepository::get_by_name(&pool, name).await? {
            Some(category) => category,
            None => {
                tracing::info!("Creating category: {name}");
                CategoryRepository::insert(&pool, name, description).await?
            }
        };
        category_ids.push(category.id);
    }

    for (name, description, price, stock, size, color, category) in PRODUCTS {
        if ProductRepository::find_duplicate(&pool, name, *size, color)
            .await?
            .is_some()
        {
            continue;
        }

        tracing::info!("Creating product: {name}");
        let price: Decimal = price.parse().unwrap_or(Decimal::ZERO);
        ProductRepository::insert(
            &pool,
            &NewProduct {
                name: (*name).to_owned(),
                description: (*description).to_owned(),
                price,
                stock: *stock,
                size: *size,
                color: (*color).to_owned(),
                image_url: String::new(),
                category_id: category_ids[*category],
                owner_id: staff.id,
            },
        )
        .await?;
    }

    tracing::info!("Seed complete!");
    Ok(())
}
