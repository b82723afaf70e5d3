//! Notification fan-out: area-targeted stock notices
//!
//! A notice is created for a single area today, but dismissal is a
//! growable per-area set so the same row can later serve multi-area
//! broadcasts. Visibility = target area matches AND the area has not
//! dismissed the notice.

use sqlx::SqlitePool;

use crate::db::repository::notification as repo;
use crate::utils::{AppError, AppResult};
use shared::models::{Notification, NotificationCreate};

/// Notices older than this are swept away regardless of state
pub const NOTICE_MAX_AGE_MS: i64 = 3 * 24 * 60 * 60 * 1000;

/// Outcome of a dismiss-all pass
#[derive(Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome", content = "count")]
pub enum DismissOutcome {
    /// Number of notices newly dismissed
    Dismissed(u64),
    /// The visible set was already empty (informational, not an error)
    NothingToDismiss,
}

/// Publish a stock notice to an area
pub async fn publish(pool: &SqlitePool, area: &str, message: &str) -> AppResult<Notification> {
    let created = repo::create(
        pool,
        NotificationCreate {
            message: message.to_string(),
            area: area.to_string(),
        },
    )
    .await?;
    tracing::info!(area = %area, notification_id = created.id, "Notification published");
    Ok(created)
}

/// Visible notices for an area, newest first
pub async fn list_for(pool: &SqlitePool, area: &str) -> AppResult<Vec<Notification>> {
    Ok(repo::find_visible(pool, area).await?)
}

/// Dismiss one notice for an area (idempotent set-union)
pub async fn dismiss(pool: &SqlitePool, notification_id: i64, area: &str) -> AppResult<()> {
    repo::find_by_id(pool, notification_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Notification {notification_id}")))?;
    repo::add_dismissal(pool, notification_id, area).await?;
    Ok(())
}

/// Dismiss every visible notice for an area in one pass
pub async fn dismiss_all(pool: &SqlitePool, area: &str) -> AppResult<DismissOutcome> {
    let dismissed = repo::dismiss_all_visible(pool, area).await?;
    if dismissed == 0 {
        return Ok(DismissOutcome::NothingToDismiss);
    }
    Ok(DismissOutcome::Dismissed(dismissed))
}

/// Mark all unread notices for an area as read; returns count updated
pub async fn mark_read(pool: &SqlitePool, area: &str) -> AppResult<u64> {
    Ok(repo::mark_read(pool, area).await?)
}

/// Maintenance sweep: delete notices older than 3 days
pub async fn purge_old(pool: &SqlitePool) -> AppResult<u64> {
    let cutoff = shared::util::now_millis() - NOTICE_MAX_AGE_MS;
    Ok(repo::purge_older_than(pool, cutoff).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_util::memory_pool;

    #[tokio::test]
    async fn visibility_is_scoped_to_the_target_area() {
        let pool = memory_pool().await;
        publish(&pool, "North", "New stock for Rice is available in your area!")
            .await
            .unwrap();
        publish(&pool, "South", "New stock for Wheat is available in your area!")
            .await
            .unwrap();

        let north = list_for(&pool, "North").await.unwrap();
        assert_eq!(north.len(), 1);
        assert_eq!(north[0].area, "North");
        assert!(list_for(&pool, "East").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn newest_notices_come_first() {
        let pool = memory_pool().await;
        let first = publish(&pool, "North", "first").await.unwrap();
        let second = publish(&pool, "North", "second").await.unwrap();
        // Force distinct timestamps regardless of clock granularity
        sqlx::query("UPDATE notification SET created_at = created_at + 1000 WHERE id = ?")
            .bind(second.id)
            .execute(&pool)
            .await
            .unwrap();

        let listed = list_for(&pool, "North").await.unwrap();
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }

    #[tokio::test]
    async fn dismiss_is_idempotent() {
        let pool = memory_pool().await;
        let n = publish(&pool, "North", "msg").await.unwrap();

        dismiss(&pool, n.id, "North").await.unwrap();
        // Second dismissal: no error, no duplicate growth
        dismiss(&pool, n.id, "North").await.unwrap();

        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notification_dismissal WHERE notification_id = ?",
        )
        .bind(n.id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(count, 1);
        assert!(list_for(&pool, "North").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn dismissing_a_missing_notice_is_not_found() {
        let pool = memory_pool().await;
        let result = dismiss(&pool, 42, "North").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn dismiss_all_reports_count_then_nothing() {
        let pool = memory_pool().await;
        publish(&pool, "North", "a").await.unwrap();
        publish(&pool, "North", "b").await.unwrap();

        assert_eq!(
            dismiss_all(&pool, "North").await.unwrap(),
            DismissOutcome::Dismissed(2)
        );
        assert_eq!(
            dismiss_all(&pool, "North").await.unwrap(),
            DismissOutcome::NothingToDismiss
        );
    }

    #[tokio::test]
    async fn mark_read_touches_only_unread_rows() {
        let pool = memory_pool().await;
        publish(&pool, "North", "a").await.unwrap();
        publish(&pool, "North", "b").await.unwrap();

        assert_eq!(mark_read(&pool, "North").await.unwrap(), 2);
        assert_eq!(mark_read(&pool, "North").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn purge_ignores_dismissal_and_read_state() {
        let pool = memory_pool().await;
        let n = publish(&pool, "North", "old").await.unwrap();
        dismiss(&pool, n.id, "North").await.unwrap();
        let keep = publish(&pool, "North", "fresh").await.unwrap();

        sqlx::query("UPDATE notification SET created_at = ? WHERE id = ?")
            .bind(shared::util::now_millis() - NOTICE_MAX_AGE_MS - 1000)
            .bind(n.id)
            .execute(&pool)
            .await
            .unwrap();

        assert_eq!(purge_old(&pool).await.unwrap(), 1);
        assert!(repo::find_by_id(&pool, n.id).await.unwrap().is_none());
        assert!(repo::find_by_id(&pool, keep.id).await.unwrap().is_some());
    }
}
