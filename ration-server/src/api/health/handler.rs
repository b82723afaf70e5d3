//! Health API Handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::utils::AppResult;

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /api/health - 健康检查（含数据库连通性）
pub async fn health(State(state): State<ServerState>) -> AppResult<Json<HealthResponse>> {
    sqlx::query("SELECT 1")
        .execute(&state.pool)
        .await
        .map_err(crate::db::repository::RepoError::from)?;
    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    }))
}
