//! Notification model

use serde::{Deserialize, Serialize};

/// Area-targeted stock notice
///
/// Dismissal is tracked per-area in a separate join table (set
/// semantics), not on this row, so a notice can later be broadcast to
/// several areas without changing the storage shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Notification {
    pub id: i64,
    pub message: String,
    pub area: String,
    pub is_read: bool,
    pub created_at: i64,
}

/// Create notification payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationCreate {
    pub message: String,
    pub area: String,
}
