//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::core::ServerState;
use crate::db::repository::{family, order as order_repo};
use crate::orders::{self, PaymentFlow};
use crate::services::invoice_data;
use crate::utils::{AppError, AppResult};
use shared::models::{InvoiceData, Order, OrderDetail, OrderLineInput, PaymentStatus};

#[derive(serde::Deserialize)]
pub struct PlaceOrderRequest {
    pub family_code: String,
    pub items: Vec<OrderLineInput>,
}

/// POST /api/orders - 遗留下单流程（pending，由后续支付步骤确认）
pub async fn place(
    State(state): State<ServerState>,
    Json(payload): Json<PlaceOrderRequest>,
) -> AppResult<Json<Order>> {
    let order = orders::place_order(
        &state.pool,
        &payload.family_code,
        &payload.items,
        "",
        PaymentFlow::Deferred,
    )
    .await?;
    Ok(Json(order))
}

#[derive(serde::Deserialize)]
pub struct SettleRequest {
    pub outcome: PaymentStatus,
}

/// POST /api/orders/{id}/payment - 确认/否决待支付订单
pub async fn settle(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<SettleRequest>,
) -> AppResult<Json<Order>> {
    let order = orders::confirm_payment(&state.pool, id, payload.outcome).await?;
    Ok(Json(order))
}

#[derive(serde::Deserialize)]
pub struct ListQuery {
    pub area: Option<String>,
}

/// GET /api/orders?area=xxx - admin 订单列表（含行明细，新单在前）
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<OrderDetail>>> {
    let details = order_repo::list_details(&state.pool, query.area.as_deref()).await?;
    Ok(Json(details))
}

#[derive(serde::Deserialize)]
pub struct ByOtpQuery {
    pub otp: String,
    pub area: String,
}

/// GET /api/orders/by-otp?otp=xxx&area=yyy - 取货台按验证码查已付订单
pub async fn by_otp(
    State(state): State<ServerState>,
    Query(query): Query<ByOtpQuery>,
) -> AppResult<Json<Vec<OrderDetail>>> {
    let details =
        order_repo::find_paid_by_otp_and_area(&state.pool, &query.otp, &query.area).await?;
    if details.is_empty() {
        return Err(AppError::not_found("No orders found for this OTP and area"));
    }
    Ok(Json(details))
}

#[derive(serde::Deserialize)]
pub struct InvoiceQuery {
    pub family_code: String,
}

/// GET /api/orders/invoice?family_code=xxx - 家庭最近一单的发票数据
///
/// 返回渲染协作方所需的完整文档；版面与 PDF 在核心之外。
pub async fn invoice(
    State(state): State<ServerState>,
    Query(query): Query<InvoiceQuery>,
) -> AppResult<Json<InvoiceData>> {
    let fam = family::find_by_code(&state.pool, &query.family_code)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Family {}", query.family_code)))?;
    let order = order_repo::find_latest_for_family(&state.pool, fam.id)
        .await?
        .ok_or_else(|| AppError::not_found("No order found"))?;
    let lines = order_repo::find_lines(&state.pool, order.id).await?;

    Ok(Json(invoice_data(&fam, &order, &lines)))
}
