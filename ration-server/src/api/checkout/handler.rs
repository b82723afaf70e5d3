//! Checkout API Handlers
//!
//! 结账流程：独立表变体的验证码签发，以及"验证 + 下单"的组合操作。
//! 验证必须在任何库存变更之前通过；验证与扣减之间不共享事务 —
//! 库存充足性由订单引擎在提交点自行保证。

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::orders::{self, PaymentFlow};
use crate::otp;
use crate::services::email::templates;
use crate::utils::validation::validate_email;
use crate::utils::{AppError, AppResult};
use shared::models::{Order, OrderLineInput};

#[derive(serde::Deserialize)]
pub struct SendOtpRequest {
    pub email: String,
}

#[derive(serde::Serialize)]
pub struct SendOtpResponse {
    pub message: &'static str,
}

/// POST /api/checkout/send-otp - 签发结账验证码
///
/// 不校验邮箱是否属于注册成员：签发成功与否不泄露注册状态。
pub async fn send_otp(
    State(state): State<ServerState>,
    Json(payload): Json<SendOtpRequest>,
) -> AppResult<Json<SendOtpResponse>> {
    validate_email(&payload.email)?;

    let code = otp::issue_checkout(&state.pool, &payload.email).await?;

    let (subject, body) = templates::checkout_otp(&code);
    state
        .mailer
        .send(&payload.email, &subject, &body)
        .await
        .map_err(|e| AppError::EmailDelivery(e.to_string()))?;

    Ok(Json(SendOtpResponse {
        message: "OTP sent to email",
    }))
}

#[derive(serde::Deserialize)]
pub struct PlaceOrderRequest {
    pub email: String,
    pub otp: String,
    pub family_code: String,
    pub items: Vec<OrderLineInput>,
}

/// POST /api/checkout/place-order - 验证结账验证码并下单
///
/// 验证失败（无效/过期/已使用）直接失败，不触碰库存；验证通过后
/// 订单以 `paid` 状态原子提交。
pub async fn place_order(
    State(state): State<ServerState>,
    Json(payload): Json<PlaceOrderRequest>,
) -> AppResult<Json<Order>> {
    validate_email(&payload.email)?;

    otp::verify_checkout(&state.pool, &payload.email, &payload.otp).await?;

    let order = orders::place_order(
        &state.pool,
        &payload.family_code,
        &payload.items,
        &payload.otp,
        PaymentFlow::Immediate,
    )
    .await?;

    Ok(Json(order))
}
