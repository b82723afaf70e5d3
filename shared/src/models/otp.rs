//! Checkout OTP model

use serde::{Deserialize, Serialize};

/// A standalone one-time code gating checkout
///
/// Single-use: `is_verified` flips to true exactly once (compare-and-set
/// in the repository); expiry is computed from `created_at`, never from
/// a mutable field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CheckoutOtp {
    pub id: i64,
    pub email: String,
    pub code: String,
    pub is_verified: bool,
    pub created_at: i64,
}
