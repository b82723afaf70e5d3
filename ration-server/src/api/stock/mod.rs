//! Stock API 模块 — 家庭侧库存浏览

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/stock", get(handler::view_stock))
}
