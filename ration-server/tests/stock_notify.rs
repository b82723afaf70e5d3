//! Stock listing rules, maintenance sweeps, and the notification
//! lifecycle from item creation to dismissal.

mod common;

use common::{http, seed, test_state};
use ration_server::core::Server;
use ration_server::notify;
use ration_server::orders::{self, PaymentFlow};
use ration_server::stock;
use serde_json::json;
use shared::models::OrderLineInput;

#[tokio::test]
async fn adding_an_item_notifies_its_area_only() {
    let (state, _dir) = test_state().await;
    let app = Server::build_router(state.clone());

    let (status, body) = http::post_json(
        app.clone(),
        "/api/items",
        json!({
            "name": "Rice",
            "area": "North",
            "price": 10.0,
            "total_quantity": 50,
            "limit_1": 2, "limit_2": 4, "limit_3": 6, "limit_4": 8,
        }),
    )
    .await;
    assert_eq!(status, 200, "unexpected body: {body}");

    let (_, north) = http::get(app.clone(), "/api/notifications/North").await;
    let north = north.as_array().unwrap();
    assert_eq!(north.len(), 1);
    assert!(north[0]["message"].as_str().unwrap().contains("Rice"));

    let (_, south) = http::get(app, "/api/notifications/South").await;
    assert!(south.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn stock_view_applies_every_filter_rule() {
    let (state, _dir) = test_state().await;
    seed::family_with_members(&state, "F-3001", "North", 3).await;

    let rice = seed::item(&state, "Rice", "North", 10.0, 20, [2, 3, 4, 5]).await;
    // Different area
    seed::item(&state, "Wheat", "South", 8.0, 20, [2, 2, 2, 2]).await;
    // Zero limit for 3-member families
    seed::item(&state, "Sugar", "North", 12.0, 20, [1, 1, 0, 2]).await;
    // Sold out
    seed::item(&state, "Dal", "North", 15.0, 0, [0, 0, 0, 0]).await;
    // Below-limit stock is still listed
    let oil = seed::item(&state, "Oil", "North", 5.0, 2, [1, 2, 4, 4]).await;

    let app = Server::build_router(state.clone());
    let (status, body) = http::get(app.clone(), "/api/stock?family_code=F-3001").await;
    assert_eq!(status, 200);
    assert_eq!(body["family_size"], 3);
    let names: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"Rice"));
    assert!(names.contains(&"Oil"));
    assert_eq!(names.len(), 2);

    // Oil: stock 2 < limit 4 but listed anyway
    let oil_entry = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["id"] == oil.id)
        .unwrap();
    assert_eq!(oil_entry["limit"], 4);
    assert_eq!(oil_entry["total_quantity"], 2);

    // After a paid purchase the item leaves the listing
    orders::place_order(
        &state.pool,
        "F-3001",
        &[OrderLineInput { item_id: rice.id, quantity: 2 }],
        "111111",
        PaymentFlow::Immediate,
    )
    .await
    .unwrap();

    let (_, body) = http::get(app, "/api/stock?family_code=F-3001").await;
    let names: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert!(!names.contains(&"Rice"));
    assert!(names.contains(&"Oil"));
}

#[tokio::test]
async fn unknown_family_gets_a_not_found_envelope() {
    let (state, _dir) = test_state().await;
    let app = Server::build_router(state);
    let (status, body) = http::get(app, "/api/stock?family_code=NOPE").await;
    assert_eq!(status, 404);
    assert_eq!(body["code"], "E1002");
}

#[tokio::test]
async fn maintenance_sweep_prunes_items_and_notices() {
    let (state, _dir) = test_state().await;
    seed::family_with_members(&state, "F-3002", "North", 1).await;

    let old_empty = seed::item(&state, "OldEmpty", "North", 1.0, 0, [0, 0, 0, 0]).await;
    let residue = seed::item(&state, "Residue", "North", 1.0, 3, [4, 4, 4, 4]).await;
    let healthy = seed::item(&state, "Healthy", "North", 1.0, 10, [2, 2, 2, 2]).await;

    let four_days_ago = shared::util::now_millis() - 4 * 24 * 60 * 60 * 1000;
    sqlx::query("UPDATE ration_item SET created_at = ? WHERE id = ?")
        .bind(four_days_ago)
        .bind(old_empty.id)
        .execute(&state.pool)
        .await
        .unwrap();

    let purged = stock::purge_stale(&state.pool).await.unwrap();
    assert_eq!(purged, 2);
    assert!(
        ration_server::db::repository::item::find_by_id(&state.pool, healthy.id)
            .await
            .unwrap()
            .is_some()
    );
    assert!(
        ration_server::db::repository::item::find_by_id(&state.pool, residue.id)
            .await
            .unwrap()
            .is_none()
    );

    // Old notices go unconditionally, even when dismissed or read
    let n = notify::publish(&state.pool, "North", "stale notice").await.unwrap();
    notify::dismiss(&state.pool, n.id, "North").await.unwrap();
    sqlx::query("UPDATE notification SET created_at = ? WHERE id = ?")
        .bind(four_days_ago)
        .bind(n.id)
        .execute(&state.pool)
        .await
        .unwrap();
    assert_eq!(notify::purge_old(&state.pool).await.unwrap(), 1);
}

#[tokio::test]
async fn notification_dismissal_routes_round_trip() {
    let (state, _dir) = test_state().await;
    let n1 = notify::publish(&state.pool, "North", "first").await.unwrap();
    notify::publish(&state.pool, "North", "second").await.unwrap();

    let app = Server::build_router(state.clone());

    // Dismiss one, twice (idempotent)
    for _ in 0..2 {
        let (status, _) = http::post_json(
            app.clone(),
            &format!("/api/notifications/{}/dismiss?area=North", n1.id),
            json!({}),
        )
        .await;
        assert_eq!(status, 200);
    }

    let (_, listed) = http::get(app.clone(), "/api/notifications/North").await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    // Mark read touches every unread row for the area, dismissed or not
    let (_, body) = http::post_json(app.clone(), "/api/notifications/mark-read/North", json!({}))
        .await;
    assert_eq!(body["updated"], 2);

    let request = http::get(app.clone(), "/api/notifications/North").await;
    assert_eq!(request.1.as_array().unwrap().len(), 1);

    let (status, body) = http::delete(app.clone(), "/api/notifications/North").await;
    assert_eq!(status, 200);
    assert_eq!(body["outcome"], "dismissed");
    assert_eq!(body["count"], 1);

    // Nothing left to dismiss
    let (status, body) = http::delete(app, "/api/notifications/North").await;
    assert_eq!(status, 200);
    assert_eq!(body["outcome"], "nothing_to_dismiss");
}
