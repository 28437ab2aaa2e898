//! Core types for Clementine.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod pagination;
pub mod phone;
pub mod role;

pub use email::{Email, EmailError};
pub use id::*;
pub use pagination::{PagedResponse, PaginationQuery};
pub use phone::{PhoneNumber, PhoneNumberError};
pub use role::{OrderStatus, UserRole};
