//! Shared fixtures for integration tests

// Not every test binary uses every helper
#![allow(dead_code)]

use std::sync::Arc;

use ration_server::core::{Config, ServerState};
use ration_server::db::DbService;
use ration_server::services::LogMailer;
use tempfile::TempDir;

/// File-backed state in a scratch directory.
///
/// File-backed (not `:memory:`) so concurrent transactions exercise the
/// real single-writer locking; the TempDir must outlive the state.
pub async fn test_state() -> (ServerState, TempDir) {
    let dir = TempDir::new().expect("tempdir");
    let db_path = dir.path().join("ration.db");
    let db = DbService::new(&db_path.to_string_lossy())
        .await
        .expect("db init");

    let config = Config {
        work_dir: dir.path().to_string_lossy().into_owned(),
        http_port: 0,
        log_level: "warn".into(),
        environment: "test".into(),
        sweep_interval_secs: 3600,
    };

    let state = ServerState::new(config, db.pool, Arc::new(LogMailer));
    (state, dir)
}

pub mod seed {
    use ration_server::core::ServerState;
    use ration_server::db::repository::{family, item, member};
    use shared::models::{Family, FamilyCreate, ItemCreate, RationItem};

    pub async fn family_with_members(
        state: &ServerState,
        code: &str,
        area: &str,
        member_count: usize,
    ) -> Family {
        let fam = family::create(
            &state.pool,
            FamilyCreate {
                family_code: code.into(),
                area: area.into(),
            },
        )
        .await
        .unwrap();
        for i in 0..member_count {
            let aadhar = format!("9{:011}", fam.id.rem_euclid(10_000_000) * 100 + i as i64);
            member::create(
                &state.pool,
                fam.id,
                &format!("Member {i}"),
                &aadhar,
                &format!("member{i}.{code}@example.com"),
            )
            .await
            .unwrap();
        }
        fam
    }

    pub async fn item(
        state: &ServerState,
        name: &str,
        area: &str,
        price: f64,
        quantity: i64,
        limits: [i64; 4],
    ) -> RationItem {
        item::create(
            &state.pool,
            ItemCreate {
                name: name.into(),
                area: area.into(),
                price,
                total_quantity: quantity,
                limit_1: limits[0],
                limit_2: limits[1],
                limit_3: limits[2],
                limit_4: limits[3],
            },
        )
        .await
        .unwrap()
    }
}

pub mod http {
    //! Minimal request helpers over the app router

    use axum::Router;
    use axum::body::Body;
    use http::{Request, Response, StatusCode, header};
    use tower::ServiceExt;

    pub async fn post_json(
        app: Router,
        uri: &str,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        split(response).await
    }

    pub async fn get(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        split(response).await
    }

    pub async fn delete(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        split(response).await
    }

    async fn split(response: Response<Body>) -> (StatusCode, serde_json::Value) {
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }
}
