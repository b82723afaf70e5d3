//! Order Repository (read side + payment transition)
//!
//! Order creation is transactional and lives in the order engine
//! (`crate::orders`); this module covers queries and the
//! pending → paid/failed transition.

use super::{RepoError, RepoResult};
use shared::models::{Order, OrderDetail, OrderLineDetail, PaymentStatus};
use sqlx::SqlitePool;

const ORDER_SELECT: &str = "SELECT id, family_id, token, otp_code, total_price, payment_status, created_at FROM purchase_order";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Latest order of a family (invoice endpoint)
pub async fn find_latest_for_family(
    pool: &SqlitePool,
    family_id: i64,
) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE family_id = ? ORDER BY created_at DESC, id DESC LIMIT 1");
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(family_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Lines of an order in submission order, joined with item names
pub async fn find_lines(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderLineDetail>> {
    let rows = sqlx::query_as::<_, OrderLineDetail>(
        "SELECT ri.name AS item_name, ol.quantity, ol.unit_price, ol.quantity * ol.unit_price AS line_total
         FROM order_line ol
         JOIN ration_item ri ON ri.id = ol.item_id
         WHERE ol.order_id = ?
         ORDER BY ol.line_no",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[derive(sqlx::FromRow)]
struct OrderHeadRow {
    id: i64,
    token: String,
    family_code: String,
    area: String,
    total_price: f64,
    payment_status: PaymentStatus,
    created_at: i64,
}

/// Orders with family context and lines, newest first; optionally
/// filtered by family area (admin views)
pub async fn list_details(
    pool: &SqlitePool,
    area: Option<&str>,
) -> RepoResult<Vec<OrderDetail>> {
    let base = "SELECT po.id, po.token, f.family_code, f.area, po.total_price, po.payment_status, po.created_at
         FROM purchase_order po
         JOIN family f ON f.id = po.family_id";
    let heads: Vec<OrderHeadRow> = match area {
        Some(area) => {
            let sql = format!("{base} WHERE f.area = ? ORDER BY po.created_at DESC, po.id DESC");
            sqlx::query_as(&sql).bind(area).fetch_all(pool).await?
        }
        None => {
            let sql = format!("{base} ORDER BY po.created_at DESC, po.id DESC");
            sqlx::query_as(&sql).fetch_all(pool).await?
        }
    };

    let mut details = Vec::with_capacity(heads.len());
    for head in heads {
        let items = find_lines(pool, head.id).await?;
        details.push(OrderDetail {
            id: head.id,
            token: head.token,
            family_code: head.family_code,
            area: head.area,
            total_price: head.total_price,
            payment_status: head.payment_status,
            created_at: head.created_at,
            items,
        });
    }
    Ok(details)
}

/// Paid orders matching a checkout code in an area (pickup desk lookup)
pub async fn find_paid_by_otp_and_area(
    pool: &SqlitePool,
    otp_code: &str,
    area: &str,
) -> RepoResult<Vec<OrderDetail>> {
    let heads: Vec<OrderHeadRow> = sqlx::query_as(
        "SELECT po.id, po.token, f.family_code, f.area, po.total_price, po.payment_status, po.created_at
         FROM purchase_order po
         JOIN family f ON f.id = po.family_id
         WHERE po.otp_code = ?1 AND f.area = ?2 AND po.payment_status = 'paid'
         ORDER BY po.created_at DESC, po.id DESC",
    )
    .bind(otp_code)
    .bind(area)
    .fetch_all(pool)
    .await?;

    let mut details = Vec::with_capacity(heads.len());
    for head in heads {
        let items = find_lines(pool, head.id).await?;
        details.push(OrderDetail {
            id: head.id,
            token: head.token,
            family_code: head.family_code,
            area: head.area,
            total_price: head.total_price,
            payment_status: head.payment_status,
            created_at: head.created_at,
            items,
        });
    }
    Ok(details)
}

/// Transition a pending order to `paid` or `failed`.
///
/// Conditional update: an order that is not `pending` is left untouched
/// and the call reports a conflict.
pub async fn settle_payment(
    pool: &SqlitePool,
    order_id: i64,
    outcome: PaymentStatus,
) -> RepoResult<Order> {
    if outcome == PaymentStatus::Pending {
        return Err(RepoError::Validation(
            "payment outcome must be paid or failed".into(),
        ));
    }
    let rows = sqlx::query(
        "UPDATE purchase_order SET payment_status = ?1 WHERE id = ?2 AND payment_status = 'pending'",
    )
    .bind(outcome.as_str())
    .bind(order_id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        // Either absent or already settled; report which
        return match find_by_id(pool, order_id).await? {
            Some(order) => Err(RepoError::Duplicate(format!(
                "Order {} already {}",
                order_id,
                order.payment_status.as_str()
            ))),
            None => Err(RepoError::NotFound(format!("Order {order_id} not found"))),
        };
    }
    find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {order_id} not found")))
}
