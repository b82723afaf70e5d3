//! Checkout OTP Repository

use super::{RepoError, RepoResult};
use shared::models::CheckoutOtp;
use sqlx::SqlitePool;

const OTP_SELECT: &str = "SELECT id, email, code, is_verified, created_at FROM checkout_otp";

pub async fn create(pool: &SqlitePool, email: &str, code: &str) -> RepoResult<CheckoutOtp> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO checkout_otp (id, email, code, is_verified, created_at) VALUES (?1, ?2, ?3, 0, ?4)",
    )
    .bind(id)
    .bind(email)
    .bind(code)
    .bind(now)
    .execute(pool)
    .await?;
    let sql = format!("{OTP_SELECT} WHERE id = ?");
    sqlx::query_as::<_, CheckoutOtp>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create checkout OTP".into()))
}

/// Latest record for an (email, code) pair; multiple outstanding codes
/// per email may coexist; only the most recent one counts.
pub async fn find_latest(
    pool: &SqlitePool,
    email: &str,
    code: &str,
) -> RepoResult<Option<CheckoutOtp>> {
    let sql = format!("{OTP_SELECT} WHERE email = ? AND code = ? ORDER BY created_at DESC, id DESC LIMIT 1");
    let row = sqlx::query_as::<_, CheckoutOtp>(&sql)
        .bind(email)
        .bind(code)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Flip `is_verified` by compare-and-set; only the first caller wins
pub async fn mark_verified(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE checkout_otp SET is_verified = 1 WHERE id = ? AND is_verified = 0")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Drop verified or long-expired codes (maintenance sweep)
pub async fn purge_older_than(pool: &SqlitePool, cutoff: i64) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM checkout_otp WHERE created_at < ?")
        .bind(cutoff)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected())
}
