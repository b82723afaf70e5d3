//! 订单引擎 — 下单的事务核心
//!
//! 下单在单个 SQLite 写事务内完成：逐行条件扣减库存
//! (`total_quantity >= 请求数量` 才生效)，任何一行失败即整体回滚，
//! 不存在部分扣减。并发下单由 SQLite 的单写者锁串行化；等待超过
//! busy_timeout 以 `Busy` 上报，调用方可安全重试（未提交任何变更）。

pub mod money;

use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::db::repository::{RepoError, family, order as order_repo};
use crate::utils::{AppError, AppResult};
use shared::models::{Order, OrderLineInput, PaymentStatus};

/// Bounded retries for order-token UNIQUE collisions
const TOKEN_ATTEMPTS: u32 = 5;

/// The two supported order flows
///
/// `Immediate` is the OTP-gated checkout: the order commits as `paid`.
/// `Deferred` is the legacy flow: the order commits as `pending` and is
/// settled later through [`confirm_payment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentFlow {
    Immediate,
    Deferred,
}

impl PaymentFlow {
    fn initial_status(self) -> PaymentStatus {
        match self {
            PaymentFlow::Immediate => PaymentStatus::Paid,
            PaymentFlow::Deferred => PaymentStatus::Pending,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ItemSnapshot {
    name: String,
    price: f64,
}

/// Place an order for a family, all-or-nothing.
///
/// The caller is responsible for OTP gating (the checkout handler
/// verifies before calling); `otp_code` is recorded on the order for
/// the pickup flow and is empty for the deferred variant.
///
/// Stock sufficiency is the only business rule enforced here; the
/// already-purchased exclusion lives in the stock ledger's read path.
pub async fn place_order(
    pool: &SqlitePool,
    family_code: &str,
    lines: &[OrderLineInput],
    otp_code: &str,
    flow: PaymentFlow,
) -> AppResult<Order> {
    if lines.is_empty() {
        return Err(AppError::validation("order must contain at least one item"));
    }
    for line in lines {
        if line.quantity <= 0 {
            return Err(AppError::validation(format!(
                "quantity for item {} must be positive",
                line.item_id
            )));
        }
    }

    let fam = family::find_by_code(pool, family_code)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Family {family_code}")))?;

    let mut tx = pool.begin().await.map_err(RepoError::from)?;

    // Per line: conditional decrement first, then the price snapshot.
    // The decrement is the oversell guard: zero rows affected with the
    // item present means insufficient stock. Making it the transaction's
    // first statement takes SQLite's write lock up front (waits are
    // bounded by busy_timeout and surface as Busy), so concurrent
    // orders on overlapping items serialize instead of failing on a
    // stale read snapshot.
    let mut priced_lines: Vec<(i64, i64, f64)> = Vec::with_capacity(lines.len());
    for line in lines {
        let updated = sqlx::query(
            "UPDATE ration_item SET total_quantity = total_quantity - ?1 WHERE id = ?2 AND total_quantity >= ?1",
        )
        .bind(line.quantity)
        .bind(line.item_id)
        .execute(&mut *tx)
        .await
        .map_err(RepoError::from)?;

        let snapshot = sqlx::query_as::<_, ItemSnapshot>(
            "SELECT name, price FROM ration_item WHERE id = ?",
        )
        .bind(line.item_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(RepoError::from)?
        .ok_or_else(|| AppError::not_found(format!("Item {}", line.item_id)))?;

        if updated.rows_affected() == 0 {
            // Dropping the transaction rolls back earlier decrements
            return Err(AppError::InsufficientStock(snapshot.name));
        }

        priced_lines.push((line.item_id, line.quantity, snapshot.price));
    }

    let total_price = money::order_total(priced_lines.iter().map(|(_, q, p)| (*p, *q)));
    let order_id = insert_order(&mut tx, fam.id, otp_code, total_price, flow).await?;

    for (line_no, (item_id, quantity, unit_price)) in priced_lines.iter().enumerate() {
        sqlx::query(
            "INSERT INTO order_line (id, order_id, item_id, quantity, unit_price, line_no) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(shared::util::snowflake_id())
        .bind(order_id)
        .bind(item_id)
        .bind(quantity)
        .bind(unit_price)
        .bind(line_no as i64)
        .execute(&mut *tx)
        .await
        .map_err(RepoError::from)?;
    }

    tx.commit().await.map_err(RepoError::from)?;

    let order = order_repo::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| AppError::internal("order vanished after commit"))?;
    tracing::info!(
        order_id,
        token = %order.token,
        family = %family_code,
        total = order.total_price,
        "Order placed"
    );
    Ok(order)
}

/// Insert the order row, regenerating the token on UNIQUE collision
async fn insert_order(
    tx: &mut Transaction<'_, Sqlite>,
    family_id: i64,
    otp_code: &str,
    total_price: f64,
    flow: PaymentFlow,
) -> AppResult<i64> {
    let now = shared::util::now_millis();
    for _ in 0..TOKEN_ATTEMPTS {
        let id = shared::util::snowflake_id();
        let token = shared::util::order_token();
        let result = sqlx::query(
            "INSERT INTO purchase_order (id, family_id, token, otp_code, total_price, payment_status, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(id)
        .bind(family_id)
        .bind(&token)
        .bind(otp_code)
        .bind(total_price)
        .bind(flow.initial_status().as_str())
        .bind(now)
        .execute(&mut **tx)
        .await;

        match result.map_err(RepoError::from) {
            Ok(_) => return Ok(id),
            Err(RepoError::Duplicate(_)) => continue,
            Err(other) => return Err(other.into()),
        }
    }
    Err(AppError::conflict("could not allocate a unique order token"))
}

/// Settle a pending order (deferred flow): `pending → paid | failed`
pub async fn confirm_payment(
    pool: &SqlitePool,
    order_id: i64,
    outcome: PaymentStatus,
) -> AppResult<Order> {
    let order = order_repo::settle_payment(pool, order_id, outcome).await?;
    tracing::info!(order_id, status = order.payment_status.as_str(), "Order settled");
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::item;
    use crate::db::test_util::memory_pool;
    use shared::models::{FamilyCreate, ItemCreate};

    async fn seed(pool: &SqlitePool) -> (i64, i64, i64) {
        let fam = family::create(
            pool,
            FamilyCreate {
                family_code: "F-2001".into(),
                area: "North".into(),
            },
        )
        .await
        .unwrap();
        let rice = item::create(
            pool,
            ItemCreate {
                name: "Rice".into(),
                area: "North".into(),
                price: 10.0,
                total_quantity: 5,
                limit_1: 1,
                limit_2: 3,
                limit_3: 4,
                limit_4: 5,
            },
        )
        .await
        .unwrap();
        let oil = item::create(
            pool,
            ItemCreate {
                name: "Oil".into(),
                area: "North".into(),
                price: 5.0,
                total_quantity: 2,
                limit_1: 1,
                limit_2: 2,
                limit_3: 2,
                limit_4: 2,
            },
        )
        .await
        .unwrap();
        (fam.id, rice.id, oil.id)
    }

    #[tokio::test]
    async fn order_totals_and_line_order_match_the_submission() {
        let pool = memory_pool().await;
        let (_, rice_id, oil_id) = seed(&pool).await;

        let order = place_order(
            &pool,
            "F-2001",
            &[
                OrderLineInput { item_id: rice_id, quantity: 2 },
                OrderLineInput { item_id: oil_id, quantity: 1 },
            ],
            "123456",
            PaymentFlow::Immediate,
        )
        .await
        .unwrap();

        assert_eq!(order.total_price, 25.00);
        assert_eq!(order.payment_status, PaymentStatus::Paid);
        assert_eq!(order.token.len(), 8);

        let lines = order_repo::find_lines(&pool, order.id).await.unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].item_name, "Rice");
        assert_eq!(lines[1].item_name, "Oil");
        assert_eq!(lines[0].line_total, 20.00);

        let rice = item::find_by_id(&pool, rice_id).await.unwrap().unwrap();
        assert_eq!(rice.total_quantity, 3);
    }

    #[tokio::test]
    async fn insufficient_stock_rolls_back_every_line() {
        let pool = memory_pool().await;
        let (_, rice_id, oil_id) = seed(&pool).await;

        // Second line asks for more oil than exists; the rice decrement
        // from the first line must be undone
        let result = place_order(
            &pool,
            "F-2001",
            &[
                OrderLineInput { item_id: rice_id, quantity: 2 },
                OrderLineInput { item_id: oil_id, quantity: 3 },
            ],
            "",
            PaymentFlow::Deferred,
        )
        .await;

        match result {
            Err(AppError::InsufficientStock(name)) => assert_eq!(name, "Oil"),
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        let rice = item::find_by_id(&pool, rice_id).await.unwrap().unwrap();
        let oil = item::find_by_id(&pool, oil_id).await.unwrap().unwrap();
        assert_eq!(rice.total_quantity, 5);
        assert_eq!(oil.total_quantity, 2);
    }

    #[tokio::test]
    async fn missing_item_aborts_with_not_found() {
        let pool = memory_pool().await;
        seed(&pool).await;

        let result = place_order(
            &pool,
            "F-2001",
            &[OrderLineInput { item_id: 999, quantity: 1 }],
            "",
            PaymentFlow::Deferred,
        )
        .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn zero_quantity_is_rejected_before_touching_stock() {
        let pool = memory_pool().await;
        let (_, rice_id, _) = seed(&pool).await;

        let result = place_order(
            &pool,
            "F-2001",
            &[OrderLineInput { item_id: rice_id, quantity: 0 }],
            "",
            PaymentFlow::Immediate,
        )
        .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn deferred_orders_settle_once() {
        let pool = memory_pool().await;
        let (_, rice_id, _) = seed(&pool).await;

        let order = place_order(
            &pool,
            "F-2001",
            &[OrderLineInput { item_id: rice_id, quantity: 1 }],
            "",
            PaymentFlow::Deferred,
        )
        .await
        .unwrap();
        assert_eq!(order.payment_status, PaymentStatus::Pending);

        let settled = confirm_payment(&pool, order.id, PaymentStatus::Paid)
            .await
            .unwrap();
        assert_eq!(settled.payment_status, PaymentStatus::Paid);

        // A second settlement attempt conflicts
        let again = confirm_payment(&pool, order.id, PaymentStatus::Failed).await;
        assert!(matches!(again, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn price_edits_do_not_rewrite_history() {
        let pool = memory_pool().await;
        let (_, rice_id, _) = seed(&pool).await;

        let order = place_order(
            &pool,
            "F-2001",
            &[OrderLineInput { item_id: rice_id, quantity: 2 }],
            "",
            PaymentFlow::Immediate,
        )
        .await
        .unwrap();

        sqlx::query("UPDATE ration_item SET price = 99.0 WHERE id = ?")
            .bind(rice_id)
            .execute(&pool)
            .await
            .unwrap();

        let lines = order_repo::find_lines(&pool, order.id).await.unwrap();
        assert_eq!(lines[0].unit_price, 10.0);
        assert_eq!(order.total_price, 20.0);
    }
}
