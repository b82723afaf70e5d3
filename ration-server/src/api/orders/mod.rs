//! Order API 模块 — 遗留下单流程、admin 视图、发票数据

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::place))
        .route("/invoice", get(handler::invoice))
        .route("/by-otp", get(handler::by_otp))
        .route("/{id}/payment", post(handler::settle))
}
