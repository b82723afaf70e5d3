//! Notification API 模块 — 区域通知

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/notifications", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/mark-read/{area}", post(handler::mark_read))
        .route("/{area}", get(handler::list).delete(handler::dismiss_all))
        .route("/{id}/dismiss", post(handler::dismiss))
}
