//! Domain entities and their response DTOs.
//!
//! Entities map 1:1 to table rows (`sqlx::FromRow`). DTOs are plain
//! serializable projections produced by `From<Entity>` conversions after a
//! normal fetch; no query-built projections.

pub mod cart;
pub mod category;
pub mod feedback;
pub mod order;
pub mod product;
pub mod user;

pub use cart::{Cart, CartDto, CartInfoDto, CartItem, CartItemDto};
pub use category::{Category, CategoryDto};
pub use feedback::{FeedbackForm, FeedbackFormDto};
pub use order::{NewOrder, Order, OrderDto, OrderItem, OrderItemDto};
pub use product::{NewProduct, Product, ProductDto};
pub use user::{CurrentUser, NewUser, User, UserDto};
