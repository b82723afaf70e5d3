//! Family Member Repository

use super::{RepoError, RepoResult};
use shared::models::{FamilyMember, MemberUpdate};
use sqlx::SqlitePool;

const MEMBER_SELECT: &str =
    "SELECT id, family_id, name, aadhar_number, email, created_at FROM family_member";

pub async fn find_by_family(pool: &SqlitePool, family_id: i64) -> RepoResult<Vec<FamilyMember>> {
    let sql = format!("{MEMBER_SELECT} WHERE family_id = ? ORDER BY created_at");
    let rows = sqlx::query_as::<_, FamilyMember>(&sql)
        .bind(family_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_aadhar(
    pool: &SqlitePool,
    aadhar_number: &str,
) -> RepoResult<Option<FamilyMember>> {
    let sql = format!("{MEMBER_SELECT} WHERE aadhar_number = ?");
    let row = sqlx::query_as::<_, FamilyMember>(&sql)
        .bind(aadhar_number)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_aadhar_and_email(
    pool: &SqlitePool,
    aadhar_number: &str,
    email: &str,
) -> RepoResult<Option<FamilyMember>> {
    let sql = format!("{MEMBER_SELECT} WHERE aadhar_number = ? AND email = ?");
    let row = sqlx::query_as::<_, FamilyMember>(&sql)
        .bind(aadhar_number)
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(
    pool: &SqlitePool,
    family_id: i64,
    name: &str,
    aadhar_number: &str,
    email: &str,
) -> RepoResult<FamilyMember> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO family_member (id, family_id, name, aadhar_number, email, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(id)
    .bind(family_id)
    .bind(name)
    .bind(aadhar_number)
    .bind(email)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => {
            RepoError::Duplicate(format!("Aadhar number {aadhar_number} already registered"))
        }
        other => other,
    })?;
    let sql = format!("{MEMBER_SELECT} WHERE id = ?");
    sqlx::query_as::<_, FamilyMember>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create member".into()))
}

pub async fn update(
    pool: &SqlitePool,
    aadhar_number: &str,
    data: MemberUpdate,
) -> RepoResult<FamilyMember> {
    let rows = sqlx::query(
        "UPDATE family_member SET name = ?1, aadhar_number = ?2, email = ?3 WHERE aadhar_number = ?4",
    )
    .bind(&data.name)
    .bind(&data.aadhar_number)
    .bind(&data.email)
    .bind(aadhar_number)
    .execute(pool)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => {
            RepoError::Duplicate(format!("Aadhar number {} already registered", data.aadhar_number))
        }
        other => other,
    })?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Member {aadhar_number} not found")));
    }
    find_by_aadhar(pool, &data.aadhar_number)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Member {} not found", data.aadhar_number)))
}

pub async fn delete(pool: &SqlitePool, aadhar_number: &str) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM family_member WHERE aadhar_number = ?")
        .bind(aadhar_number)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

// ── Login OTP fields (member-embedded one-time code variant) ────────

/// Store a freshly issued login code (hash + expiry) on the member row
pub async fn set_login_otp(
    pool: &SqlitePool,
    member_id: i64,
    otp_hash: &str,
    expires_at: i64,
) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE family_member SET login_otp_hash = ?1, login_otp_expires_at = ?2 WHERE id = ?3",
    )
    .bind(otp_hash)
    .bind(expires_at)
    .bind(member_id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Member {member_id} not found")));
    }
    Ok(())
}

/// Read the stored login code hash and expiry, if any
pub async fn get_login_otp(
    pool: &SqlitePool,
    member_id: i64,
) -> RepoResult<Option<(String, i64)>> {
    let row = sqlx::query_as::<_, (Option<String>, Option<i64>)>(
        "SELECT login_otp_hash, login_otp_expires_at FROM family_member WHERE id = ?",
    )
    .bind(member_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| RepoError::NotFound(format!("Member {member_id} not found")))?;
    match row {
        (Some(hash), Some(expires_at)) => Ok(Some((hash, expires_at))),
        _ => Ok(None),
    }
}

/// Clear the stored login code iff it still matches `expected_hash`.
///
/// Compare-and-set: only the first verifier of a given code succeeds;
/// a concurrent second verify sees zero rows affected.
pub async fn clear_login_otp(
    pool: &SqlitePool,
    member_id: i64,
    expected_hash: &str,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE family_member SET login_otp_hash = NULL, login_otp_expires_at = NULL WHERE id = ?1 AND login_otp_hash = ?2",
    )
    .bind(member_id)
    .bind(expected_hash)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
