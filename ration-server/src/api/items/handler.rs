//! Item API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::item;
use crate::notify;
use crate::stock;
use crate::utils::AppResult;
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use shared::models::{ItemCreate, RationItem};

/// POST /api/items - 新建物品并向目标区域发布到货通知
///
/// 物品创建与区域通知是一个逻辑操作的两半；通知不与库存写入共享
/// 事务，但创建成功即发布。
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ItemCreate>,
) -> AppResult<Json<RationItem>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.area, "area", MAX_NAME_LEN)?;

    let created = item::create(&state.pool, payload).await?;

    let message = format!("New stock for {} is available in your area!", created.name);
    notify::publish(&state.pool, &created.area, &message).await?;

    Ok(Json(created))
}

/// GET /api/items/stock - 管理端库存视图（仅有货物品）
pub async fn admin_stock(State(state): State<ServerState>) -> AppResult<Json<Vec<RationItem>>> {
    let items = item::find_in_stock(&state.pool).await?;
    Ok(Json(items))
}

/// GET /api/items/recent/{area} - 最近两天到货的物品
pub async fn recent(
    State(state): State<ServerState>,
    Path(area): Path<String>,
) -> AppResult<Json<Vec<RationItem>>> {
    let items = stock::recent_items(&state.pool, &area).await?;
    Ok(Json(items))
}

#[derive(serde::Deserialize)]
pub struct RestockRequest {
    pub total_quantity: i64,
}

#[derive(serde::Serialize)]
pub struct RestockResponse {
    pub message: &'static str,
}

/// PUT /api/items/{id}/quantity - 管理端补货（直接重置库存计数）
pub async fn restock(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<RestockRequest>,
) -> AppResult<Json<RestockResponse>> {
    item::set_quantity(&state.pool, id, payload.total_quantity).await?;
    Ok(Json(RestockResponse {
        message: "Stock updated",
    }))
}
