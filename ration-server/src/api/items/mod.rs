//! Item API 模块 (admin)

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/items", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/stock", get(handler::admin_stock))
        .route("/recent/{area}", get(handler::recent))
        .route("/{id}/quantity", put(handler::restock))
}
