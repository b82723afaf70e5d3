//! Ration item models

use serde::{Deserialize, Serialize};

/// Ration item entity: per-area stock with per-family-size limits
///
/// `total_quantity` is the live stock counter; it only moves through
/// the order engine's conditional decrement or an admin re-stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RationItem {
    pub id: i64,
    pub name: String,
    pub area: String,
    pub price: f64,
    pub total_quantity: i64,
    /// Purchase limits indexed by clamped family size (1..=4)
    pub limit_1: i64,
    pub limit_2: i64,
    pub limit_3: i64,
    pub limit_4: i64,
    pub created_at: i64,
}

impl RationItem {
    /// Entitlement limit for a clamped family size.
    ///
    /// Size must already be clamped to [1,4]; families of 5+ use the
    /// 4-member column.
    pub fn limit_for(&self, clamped_size: i64) -> i64 {
        match clamped_size {
            1 => self.limit_1,
            2 => self.limit_2,
            3 => self.limit_3,
            _ => self.limit_4,
        }
    }
}

/// Create item payload (admin)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCreate {
    pub name: String,
    pub area: String,
    pub price: f64,
    pub total_quantity: i64,
    #[serde(default)]
    pub limit_1: i64,
    #[serde(default)]
    pub limit_2: i64,
    #[serde(default)]
    pub limit_3: i64,
    #[serde(default)]
    pub limit_4: i64,
}

/// Item as seen by a family browsing stock: the item plus the
/// entitlement limit applicable to that family's size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableItem {
    pub id: i64,
    pub name: String,
    pub area: String,
    pub price: f64,
    pub total_quantity: i64,
    /// Entitlement ceiling for this family's clamped size
    pub limit: i64,
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_with_limits(l1: i64, l2: i64, l3: i64, l4: i64) -> RationItem {
        RationItem {
            id: 1,
            name: "Rice".into(),
            area: "North".into(),
            price: 10.0,
            total_quantity: 100,
            limit_1: l1,
            limit_2: l2,
            limit_3: l3,
            limit_4: l4,
            created_at: 0,
        }
    }

    #[test]
    fn limit_for_selects_the_matching_column() {
        let item = item_with_limits(1, 2, 3, 4);
        assert_eq!(item.limit_for(1), 1);
        assert_eq!(item.limit_for(2), 2);
        assert_eq!(item.limit_for(3), 3);
        assert_eq!(item.limit_for(4), 4);
    }

    #[test]
    fn oversized_families_use_the_4_member_column() {
        let item = item_with_limits(1, 2, 3, 4);
        assert_eq!(item.limit_for(7), 4);
    }
}
