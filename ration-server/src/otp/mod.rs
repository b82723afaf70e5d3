//! 一次性验证码 (OTP)
//!
//! 同一个抽象的两个存储变体：
//!
//! - **Checkout 变体**：独立 `checkout_otp` 表，明文 6 位码，
//!   `is_verified` 标志经 compare-and-set 翻转，首个验证者胜出。
//! - **Login 变体**：码的 SHA-256 摘要和过期时间内嵌在成员行上，
//!   验证成功即条件清除（同一摘要才清除），天然单次使用。
//!
//! 两个变体共享同一生命周期：issued → verified | expired | superseded。
//! 过期一律基于签发时落库的时间戳计算，不依赖可变状态。

use sha2::{Digest, Sha256};
use sqlx::SqlitePool;

use crate::db::repository::{member, otp as otp_repo};
use crate::utils::{AppError, AppResult};
use shared::models::FamilyMember;

/// Validity window for both variants: 5 minutes
pub const OTP_VALIDITY_MS: i64 = 5 * 60 * 1000;

/// SHA-256 hex digest of a login code
fn hash_code(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    hex::encode(hasher.finalize())
}

// ── Checkout variant (standalone table) ─────────────────────────────

/// Issue a checkout code for an email address.
///
/// Multiple outstanding codes per email may coexist; verification only
/// ever considers the latest matching record. Returns the plain code
/// for out-of-band delivery.
pub async fn issue_checkout(pool: &SqlitePool, email: &str) -> AppResult<String> {
    let code = shared::util::generate_otp();
    otp_repo::create(pool, email, &code).await?;
    tracing::info!(email = %email, "Checkout OTP issued");
    Ok(code)
}

/// Verify a checkout code.
///
/// Fails with `OtpInvalid` if no (email, code) record exists,
/// `OtpAlreadyUsed` if the latest record was already verified (or a
/// concurrent verifier won the compare-and-set), `OtpExpired` past the
/// validity window.
pub async fn verify_checkout(pool: &SqlitePool, email: &str, code: &str) -> AppResult<()> {
    let record = otp_repo::find_latest(pool, email, code)
        .await?
        .ok_or(AppError::OtpInvalid)?;

    if record.is_verified {
        return Err(AppError::OtpAlreadyUsed);
    }
    if shared::util::now_millis() - record.created_at > OTP_VALIDITY_MS {
        return Err(AppError::OtpExpired);
    }
    // Only the first verifier flips the flag
    if !otp_repo::mark_verified(pool, record.id).await? {
        return Err(AppError::OtpAlreadyUsed);
    }
    Ok(())
}

// ── Login variant (member-embedded) ─────────────────────────────────

/// Issue a login code for the member matching (aadhar, email).
///
/// A newer code supersedes any outstanding one on the same member row.
/// Returns the member and the plain code for delivery.
pub async fn issue_login(
    pool: &SqlitePool,
    aadhar_number: &str,
    email: &str,
) -> AppResult<(FamilyMember, String)> {
    let found = member::find_by_aadhar_and_email(pool, aadhar_number, email)
        .await?
        .ok_or_else(|| AppError::not_found("Aadhar number and email do not match"))?;

    let code = shared::util::generate_otp();
    let expires_at = shared::util::now_millis() + OTP_VALIDITY_MS;
    member::set_login_otp(pool, found.id, &hash_code(&code), expires_at).await?;
    tracing::info!(member_id = found.id, "Login OTP issued");
    Ok((found, code))
}

/// Verify a login code against the member's stored hash.
///
/// Expiry is checked from the stored issuance deadline before the
/// comparison; a successful verification clears the stored code so it
/// cannot be replayed.
pub async fn verify_login(
    pool: &SqlitePool,
    aadhar_number: &str,
    code: &str,
) -> AppResult<FamilyMember> {
    let found = member::find_by_aadhar(pool, aadhar_number)
        .await?
        .ok_or_else(|| AppError::not_found("Invalid Aadhar number"))?;

    let (stored_hash, expires_at) = member::get_login_otp(pool, found.id)
        .await?
        .ok_or(AppError::OtpInvalid)?;

    if shared::util::now_millis() > expires_at {
        return Err(AppError::OtpExpired);
    }
    if hash_code(code) != stored_hash {
        return Err(AppError::OtpInvalid);
    }
    // Conditional clear: a concurrent verifier that lost the race sees
    // the hash already gone
    if !member::clear_login_otp(pool, found.id, &stored_hash).await? {
        return Err(AppError::OtpAlreadyUsed);
    }
    Ok(found)
}
