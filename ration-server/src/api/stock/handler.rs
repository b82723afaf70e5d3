//! Stock API Handlers

use axum::{
    Json,
    extract::{Query, State},
};

use crate::core::ServerState;
use crate::stock::{self, AvailableStock};
use crate::utils::AppResult;

#[derive(serde::Deserialize)]
pub struct StockQuery {
    pub family_code: String,
}

/// GET /api/stock?family_code=xxx - 家庭可购物品列表
///
/// 返回的 `limit` 是该家庭规模的购买上限；即便当前库存低于上限，
/// 物品仍会出现 — 数量是否足够由下单时原子复核。
pub async fn view_stock(
    State(state): State<ServerState>,
    Query(query): Query<StockQuery>,
) -> AppResult<Json<AvailableStock>> {
    let available = stock::list_available(&state.pool, &query.family_code).await?;
    Ok(Json(available))
}
