//! Business logic on top of the repositories.
//!
//! Services own the transaction boundaries: every mutation that touches
//! more than one row runs inside a single transaction with the affected
//! cart and product rows locked up front.

mod cart_items;
mod carts;
mod categories;
mod email;
mod error;
mod feedback;
mod orders;
mod products;
mod users;

pub use cart_items::CartItemService;
pub use carts::CartService;
pub use categories::CategoryService;
pub use email::{EmailError, EmailService};
pub use error::ServiceError;
pub use feedback::{FeedbackFormService, SubmitFeedback};
pub use orders::OrderService;
pub use products::{AddProduct, ProductChanges, ProductService};
pub use users::UserService;
