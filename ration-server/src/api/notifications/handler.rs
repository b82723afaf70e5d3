//! Notification API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::core::ServerState;
use crate::notify::{self, DismissOutcome};
use crate::utils::AppResult;
use shared::models::Notification;

/// GET /api/notifications/{area} - 区域可见通知（未被该区域撤销）
pub async fn list(
    State(state): State<ServerState>,
    Path(area): Path<String>,
) -> AppResult<Json<Vec<Notification>>> {
    let notifications = notify::list_for(&state.pool, &area).await?;
    Ok(Json(notifications))
}

#[derive(serde::Deserialize)]
pub struct DismissQuery {
    pub area: String,
}

#[derive(serde::Serialize)]
pub struct DismissResponse {
    pub message: &'static str,
}

/// POST /api/notifications/{id}/dismiss?area=xxx - 区域撤销单条通知
///
/// 幂等：重复撤销同一条不报错、不增长撤销集合。
pub async fn dismiss(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Query(query): Query<DismissQuery>,
) -> AppResult<Json<DismissResponse>> {
    notify::dismiss(&state.pool, id, &query.area).await?;
    Ok(Json(DismissResponse {
        message: "Notification dismissed for this area",
    }))
}

/// DELETE /api/notifications/{area} - 区域撤销全部可见通知
///
/// 可见集合为空时返回 `nothing_to_dismiss`（信息性，非错误）。
pub async fn dismiss_all(
    State(state): State<ServerState>,
    Path(area): Path<String>,
) -> AppResult<Json<DismissOutcome>> {
    let outcome = notify::dismiss_all(&state.pool, &area).await?;
    Ok(Json(outcome))
}

#[derive(serde::Serialize)]
pub struct MarkReadResponse {
    pub updated: u64,
}

/// POST /api/notifications/mark-read/{area} - 区域全部标记已读
pub async fn mark_read(
    State(state): State<ServerState>,
    Path(area): Path<String>,
) -> AppResult<Json<MarkReadResponse>> {
    let updated = notify::mark_read(&state.pool, &area).await?;
    Ok(Json(MarkReadResponse { updated }))
}
