//! Stock ledger: what a family may still buy, and stale-stock upkeep
//!
//! The read path is deliberately eventually-consistent: an item is
//! listed even when current stock is below the family's limit, because
//! the limit is an entitlement ceiling, not an availability predicate.
//! Quantity adequacy is re-checked by the order engine at commit time.

use sqlx::SqlitePool;

use crate::db::repository::{family, item};
use crate::utils::{AppError, AppResult};
use shared::models::{AvailableItem, RationItem};

/// Items with zero stock older than this are purged
pub const STALE_AGE_MS: i64 = 3 * 24 * 60 * 60 * 1000;

/// Window for the recent-arrivals strip
pub const RECENT_WINDOW_MS: i64 = 2 * 24 * 60 * 60 * 1000;

/// The stock view for one family
#[derive(Debug, serde::Serialize)]
pub struct AvailableStock {
    /// Member count clamped to [1,4]
    pub family_size: i64,
    pub items: Vec<AvailableItem>,
}

/// Clamp a member count to the limit-column range [1,4]
fn clamp_family_size(member_count: i64) -> i64 {
    member_count.clamp(1, 4)
}

/// List the items a family may still buy.
///
/// Filters: area match, stock remaining, not already in a paid order of
/// this family, and a non-zero entitlement limit for the family's
/// clamped size. Stale items are pruned first, as on the original
/// stock page.
pub async fn list_available(pool: &SqlitePool, family_code: &str) -> AppResult<AvailableStock> {
    let fam = family::find_by_code(pool, family_code)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Family {family_code}")))?;

    let purged = purge_stale(pool).await?;
    if purged > 0 {
        tracing::debug!(purged, "Pruned stale items before stock listing");
    }

    let family_size = clamp_family_size(family::member_count(pool, fam.id).await?);
    let items = item::find_available_for_family(pool, fam.id, &fam.area).await?;

    let items = items
        .into_iter()
        .filter_map(|it| {
            let limit = it.limit_for(family_size);
            // A zero limit means this family size is not entitled
            if limit == 0 {
                return None;
            }
            Some(AvailableItem {
                id: it.id,
                name: it.name,
                area: it.area,
                price: it.price,
                total_quantity: it.total_quantity,
                limit,
                created_at: it.created_at,
            })
        })
        .collect();

    Ok(AvailableStock { family_size, items })
}

/// Maintenance sweep: drop zero-stock items older than 3 days and
/// items whose remaining stock is below even the 1-member limit
pub async fn purge_stale(pool: &SqlitePool) -> AppResult<u64> {
    let cutoff = shared::util::now_millis() - STALE_AGE_MS;
    Ok(item::purge_stale(pool, cutoff).await?)
}

/// Items that arrived in the last 2 days for an area
pub async fn recent_items(pool: &SqlitePool, area: &str) -> AppResult<Vec<RationItem>> {
    let cutoff = shared::util::now_millis() - RECENT_WINDOW_MS;
    Ok(item::find_recent_by_area(pool, area, cutoff).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::member;
    use crate::db::test_util::memory_pool;
    use crate::orders::{self, PaymentFlow};
    use shared::models::{FamilyCreate, ItemCreate, OrderLineInput};

    async fn seed_family(pool: &SqlitePool, code: &str, area: &str, members: usize) -> i64 {
        let fam = family::create(
            pool,
            FamilyCreate {
                family_code: code.into(),
                area: area.into(),
            },
        )
        .await
        .unwrap();
        for i in 0..members {
            member::create(
                pool,
                fam.id,
                &format!("Member {i}"),
                &format!("{:012}", fam.id.rem_euclid(1000) * 100 + i as i64),
                "m@example.com",
            )
            .await
            .unwrap();
        }
        fam.id
    }

    fn basic_item(name: &str, area: &str, qty: i64, limits: [i64; 4]) -> ItemCreate {
        ItemCreate {
            name: name.into(),
            area: area.into(),
            price: 10.0,
            total_quantity: qty,
            limit_1: limits[0],
            limit_2: limits[1],
            limit_3: limits[2],
            limit_4: limits[3],
        }
    }

    #[test]
    fn clamp_bounds_member_counts() {
        assert_eq!(clamp_family_size(0), 1);
        assert_eq!(clamp_family_size(1), 1);
        assert_eq!(clamp_family_size(4), 4);
        assert_eq!(clamp_family_size(9), 4);
    }

    #[tokio::test]
    async fn listing_filters_area_limit_and_prior_purchases() {
        let pool = memory_pool().await;
        seed_family(&pool, "F-3001", "North", 2).await;

        let rice = crate::db::repository::item::create(
            &pool,
            basic_item("Rice", "North", 10, [1, 3, 4, 5]),
        )
        .await
        .unwrap();
        // Wrong area, must not appear
        crate::db::repository::item::create(
            &pool,
            basic_item("Wheat", "South", 10, [1, 2, 3, 4]),
        )
        .await
        .unwrap();
        // Zero limit for 2-member families, must not appear
        crate::db::repository::item::create(
            &pool,
            basic_item("Sugar", "North", 10, [1, 0, 2, 2]),
        )
        .await
        .unwrap();

        let stock = list_available(&pool, "F-3001").await.unwrap();
        assert_eq!(stock.family_size, 2);
        assert_eq!(stock.items.len(), 1);
        assert_eq!(stock.items[0].name, "Rice");
        assert_eq!(stock.items[0].limit, 3);

        // Buy the rice; it must disappear from the paid-order exclusion
        orders::place_order(
            &pool,
            "F-3001",
            &[OrderLineInput { item_id: rice.id, quantity: 2 }],
            "111111",
            PaymentFlow::Immediate,
        )
        .await
        .unwrap();

        let stock = list_available(&pool, "F-3001").await.unwrap();
        assert!(stock.items.is_empty());
    }

    #[tokio::test]
    async fn pending_orders_do_not_hide_items() {
        let pool = memory_pool().await;
        seed_family(&pool, "F-3002", "North", 1).await;
        let rice = crate::db::repository::item::create(
            &pool,
            basic_item("Rice", "North", 10, [2, 2, 2, 2]),
        )
        .await
        .unwrap();

        orders::place_order(
            &pool,
            "F-3002",
            &[OrderLineInput { item_id: rice.id, quantity: 1 }],
            "",
            PaymentFlow::Deferred,
        )
        .await
        .unwrap();

        // Only *paid* orders exclude an item from the listing
        let stock = list_available(&pool, "F-3002").await.unwrap();
        assert_eq!(stock.items.len(), 1);
    }

    #[tokio::test]
    async fn below_limit_stock_is_still_listed() {
        let pool = memory_pool().await;
        seed_family(&pool, "F-3003", "North", 4).await;
        // Stock 3 < limit 5 for this size, but the item is still shown
        crate::db::repository::item::create(
            &pool,
            basic_item("Oil", "North", 3, [1, 2, 3, 5]),
        )
        .await
        .unwrap();

        let stock = list_available(&pool, "F-3003").await.unwrap();
        assert_eq!(stock.items.len(), 1);
        assert_eq!(stock.items[0].limit, 5);
        assert_eq!(stock.items[0].total_quantity, 3);
    }

    #[tokio::test]
    async fn purge_rules_follow_age_and_residue() {
        let pool = memory_pool().await;
        let old_empty = crate::db::repository::item::create(
            &pool,
            basic_item("OldEmpty", "North", 0, [0, 0, 0, 0]),
        )
        .await
        .unwrap();
        let old_stocked = crate::db::repository::item::create(
            &pool,
            basic_item("OldStocked", "North", 10, [5, 5, 5, 5]),
        )
        .await
        .unwrap();
        let residue = crate::db::repository::item::create(
            &pool,
            basic_item("Residue", "North", 4, [5, 5, 5, 5]),
        )
        .await
        .unwrap();

        // Age both "old" items past the cutoff
        let four_days_ago = shared::util::now_millis() - 4 * 24 * 60 * 60 * 1000;
        for id in [old_empty.id, old_stocked.id] {
            sqlx::query("UPDATE ration_item SET created_at = ? WHERE id = ?")
                .bind(four_days_ago)
                .bind(id)
                .execute(&pool)
                .await
                .unwrap();
        }

        let purged = purge_stale(&pool).await.unwrap();
        assert_eq!(purged, 2); // OldEmpty (age rule) + Residue (below limit_1)

        assert!(crate::db::repository::item::find_by_id(&pool, old_empty.id)
            .await
            .unwrap()
            .is_none());
        assert!(crate::db::repository::item::find_by_id(&pool, residue.id)
            .await
            .unwrap()
            .is_none());
        assert!(crate::db::repository::item::find_by_id(&pool, old_stocked.id)
            .await
            .unwrap()
            .is_some());
    }
}
