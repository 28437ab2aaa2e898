//! Clementine Core - Shared types library.
//!
//! This crate provides common types used across all Clementine components:
//! - `server` - HTTP backend (catalog, carts, orders, feedback)
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, phone numbers,
//!   roles, statuses, and the pagination contract

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
