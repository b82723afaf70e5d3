//! Notification Repository
//!
//! Dismissal is a join table keyed (notification_id, area);
//! `INSERT OR IGNORE` makes dismiss idempotent and concurrent
//! dismissals merge as set-union instead of overwriting each other.

use super::{RepoError, RepoResult};
use shared::models::{Notification, NotificationCreate};
use sqlx::SqlitePool;

const NOTIFICATION_SELECT: &str =
    "SELECT id, message, area, is_read, created_at FROM notification";

pub async fn create(pool: &SqlitePool, data: NotificationCreate) -> RepoResult<Notification> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO notification (id, message, area, is_read, created_at) VALUES (?1, ?2, ?3, 0, ?4)",
    )
    .bind(id)
    .bind(&data.message)
    .bind(&data.area)
    .bind(now)
    .execute(pool)
    .await?;
    let sql = format!("{NOTIFICATION_SELECT} WHERE id = ?");
    sqlx::query_as::<_, Notification>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create notification".into()))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Notification>> {
    let sql = format!("{NOTIFICATION_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Notification>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Notifications targeted at `area` that the area has not dismissed,
/// newest first
pub async fn find_visible(pool: &SqlitePool, area: &str) -> RepoResult<Vec<Notification>> {
    let sql = format!(
        "{NOTIFICATION_SELECT} WHERE area = ?1 AND NOT EXISTS (
            SELECT 1 FROM notification_dismissal nd
            WHERE nd.notification_id = notification.id AND nd.area = ?1
        ) ORDER BY created_at DESC, id DESC"
    );
    let rows = sqlx::query_as::<_, Notification>(&sql)
        .bind(area)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Add `area` to the dismissal set (no-op if already present)
pub async fn add_dismissal(pool: &SqlitePool, notification_id: i64, area: &str) -> RepoResult<()> {
    sqlx::query("INSERT OR IGNORE INTO notification_dismissal (notification_id, area) VALUES (?1, ?2)")
        .bind(notification_id)
        .bind(area)
        .execute(pool)
        .await?;
    Ok(())
}

/// Dismiss every currently-visible notification for `area` in one
/// statement; returns the number actually dismissed
pub async fn dismiss_all_visible(pool: &SqlitePool, area: &str) -> RepoResult<u64> {
    let rows = sqlx::query(
        "INSERT OR IGNORE INTO notification_dismissal (notification_id, area)
         SELECT id, ?1 FROM notification WHERE area = ?1",
    )
    .bind(area)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected())
}

/// Mark every unread notification for `area` as read; returns count
pub async fn mark_read(pool: &SqlitePool, area: &str) -> RepoResult<u64> {
    let rows = sqlx::query("UPDATE notification SET is_read = 1 WHERE area = ? AND is_read = 0")
        .bind(area)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected())
}

/// Unconditional age-based delete, regardless of read/dismissal state
pub async fn purge_older_than(pool: &SqlitePool, cutoff: i64) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM notification WHERE created_at < ?")
        .bind(cutoff)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected())
}
