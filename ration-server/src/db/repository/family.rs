//! Family Repository

use super::{RepoError, RepoResult};
use shared::models::{Family, FamilyCreate, FamilyUpdate};
use sqlx::SqlitePool;

const FAMILY_SELECT: &str = "SELECT id, family_code, area, created_at FROM family";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Family>> {
    let sql = format!("{FAMILY_SELECT} ORDER BY family_code");
    let rows = sqlx::query_as::<_, Family>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Family>> {
    let sql = format!("{FAMILY_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Family>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_code(pool: &SqlitePool, family_code: &str) -> RepoResult<Option<Family>> {
    let sql = format!("{FAMILY_SELECT} WHERE family_code = ?");
    let row = sqlx::query_as::<_, Family>(&sql)
        .bind(family_code)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Number of members, used for the family-size clamp
pub async fn member_count(pool: &SqlitePool, family_id: i64) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM family_member WHERE family_id = ?",
    )
    .bind(family_id)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// Distinct areas across all families (admin filter dropdown)
pub async fn distinct_areas(pool: &SqlitePool) -> RepoResult<Vec<String>> {
    let areas = sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT area FROM family ORDER BY area",
    )
    .fetch_all(pool)
    .await?;
    Ok(areas)
}

pub async fn create(pool: &SqlitePool, data: FamilyCreate) -> RepoResult<Family> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query("INSERT INTO family (id, family_code, area, created_at) VALUES (?1, ?2, ?3, ?4)")
        .bind(id)
        .bind(&data.family_code)
        .bind(&data.area)
        .bind(now)
        .execute(pool)
        .await
        .map_err(|e| match RepoError::from(e) {
            RepoError::Duplicate(_) => {
                RepoError::Duplicate(format!("Family code {} already exists", data.family_code))
            }
            other => other,
        })?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create family".into()))
}

pub async fn update(
    pool: &SqlitePool,
    family_code: &str,
    data: FamilyUpdate,
) -> RepoResult<Family> {
    let rows = sqlx::query("UPDATE family SET family_code = ?1, area = ?2 WHERE family_code = ?3")
        .bind(&data.family_code)
        .bind(&data.area)
        .bind(family_code)
        .execute(pool)
        .await
        .map_err(|e| match RepoError::from(e) {
            RepoError::Duplicate(_) => {
                RepoError::Duplicate(format!("Family code {} already exists", data.family_code))
            }
            other => other,
        })?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Family {family_code} not found")));
    }
    find_by_code(pool, &data.family_code)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Family {} not found", data.family_code)))
}

/// Delete a family; members and orders cascade via foreign keys
pub async fn delete(pool: &SqlitePool, family_code: &str) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM family WHERE family_code = ?")
        .bind(family_code)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
