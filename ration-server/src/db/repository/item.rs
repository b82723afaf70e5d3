//! Ration Item Repository

use super::{RepoError, RepoResult};
use shared::models::{ItemCreate, RationItem};
use sqlx::SqlitePool;

const ITEM_SELECT: &str = "SELECT id, name, area, price, total_quantity, limit_1, limit_2, limit_3, limit_4, created_at FROM ration_item";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<RationItem>> {
    let sql = format!("{ITEM_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, RationItem>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// All items with stock remaining (admin stock view)
pub async fn find_in_stock(pool: &SqlitePool) -> RepoResult<Vec<RationItem>> {
    let sql = format!("{ITEM_SELECT} WHERE total_quantity > 0 ORDER BY area, name");
    let rows = sqlx::query_as::<_, RationItem>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

/// Items created since `cutoff` for an area (recent-arrivals strip)
pub async fn find_recent_by_area(
    pool: &SqlitePool,
    area: &str,
    cutoff: i64,
) -> RepoResult<Vec<RationItem>> {
    let sql = format!("{ITEM_SELECT} WHERE area = ? AND created_at >= ? ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, RationItem>(&sql)
        .bind(area)
        .bind(cutoff)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Items a family may still buy: area match, stock remaining, not in
/// any of the family's paid orders. The per-size limit filter is
/// applied by the stock ledger, which knows the clamped family size.
pub async fn find_available_for_family(
    pool: &SqlitePool,
    family_id: i64,
    area: &str,
) -> RepoResult<Vec<RationItem>> {
    let sql = format!(
        "{ITEM_SELECT} WHERE area = ?1 AND total_quantity > 0 AND id NOT IN (
            SELECT ol.item_id FROM order_line ol
            JOIN purchase_order po ON po.id = ol.order_id
            WHERE po.family_id = ?2 AND po.payment_status = 'paid'
        ) ORDER BY created_at DESC"
    );
    let rows = sqlx::query_as::<_, RationItem>(&sql)
        .bind(area)
        .bind(family_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn create(pool: &SqlitePool, data: ItemCreate) -> RepoResult<RationItem> {
    if data.total_quantity < 0 {
        return Err(RepoError::Validation("total_quantity must be >= 0".into()));
    }
    if data.price < 0.0 || !data.price.is_finite() {
        return Err(RepoError::Validation("price must be a non-negative number".into()));
    }
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO ration_item (id, name, area, price, total_quantity, limit_1, limit_2, limit_3, limit_4, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.area)
    .bind(data.price)
    .bind(data.total_quantity)
    .bind(data.limit_1)
    .bind(data.limit_2)
    .bind(data.limit_3)
    .bind(data.limit_4)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create item".into()))
}

/// Admin re-stock: reset the stock counter directly
pub async fn set_quantity(pool: &SqlitePool, id: i64, total_quantity: i64) -> RepoResult<()> {
    if total_quantity < 0 {
        return Err(RepoError::Validation("total_quantity must be >= 0".into()));
    }
    let rows = sqlx::query("UPDATE ration_item SET total_quantity = ?1 WHERE id = ?2")
        .bind(total_quantity)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Item {id} not found")));
    }
    Ok(())
}

/// Remove unviable residue: items past `age_cutoff` with zero stock,
/// or with less stock left than even a 1-member family may buy.
pub async fn purge_stale(pool: &SqlitePool, age_cutoff: i64) -> RepoResult<u64> {
    let rows = sqlx::query(
        "DELETE FROM ration_item WHERE (created_at < ?1 AND total_quantity = 0) OR total_quantity < limit_1",
    )
    .bind(age_cutoff)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected())
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM ration_item WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
