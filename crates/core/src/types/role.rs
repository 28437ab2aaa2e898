//! Role and status enums.

use serde::{Deserialize, Serialize};

/// Account role, controlling which operations a user may perform.
///
/// - `Admin` manages users, categories, and can inspect all feedback.
/// - `Personnel` owns and manages catalog products.
/// - `Client` shops: cart, orders, feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "user_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Personnel,
    Client,
}

/// Order lifecycle status.
///
/// Orders start `Pending` and flip to `Delivered` once the delivery date has
/// passed. The transition happens lazily when the owner lists their orders,
/// not on a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "order_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Delivered,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde_names() {
        assert_eq!(
            serde_json::to_string(&UserRole::Personnel).unwrap(),
            "\"personnel\""
        );
        assert_eq!(
            serde_json::from_str::<UserRole>("\"client\"").unwrap(),
            UserRole::Client
        );
    }

    #[test]
    fn test_status_default_is_pending() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }
}
