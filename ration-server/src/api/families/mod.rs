//! Family API 模块 (admin)

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/families", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/areas", get(handler::areas))
        .route("/{code}", put(handler::update).delete(handler::delete))
        .route("/{code}/members", get(handler::members))
}
