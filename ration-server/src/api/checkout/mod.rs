//! Checkout API 模块 — 结账验证码与 OTP 门禁下单

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/checkout", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/send-otp", post(handler::send_otp))
        .route("/place-order", post(handler::place_order))
}
