//! Member API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::{family, member};
use crate::utils::validation::{MAX_NAME_LEN, validate_aadhar, validate_email, validate_required_text};
use crate::utils::{AppError, AppResult};
use shared::models::{FamilyMember, MemberCreate, MemberUpdate};

/// POST /api/members - 新增家庭成员
///
/// Aadhar 号全局唯一；重复返回 Conflict。
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MemberCreate>,
) -> AppResult<Json<FamilyMember>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_aadhar(&payload.aadhar_number)?;
    validate_email(&payload.email)?;

    let fam = family::find_by_code(&state.pool, &payload.family_code)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Family {}", payload.family_code)))?;

    let created = member::create(
        &state.pool,
        fam.id,
        payload.name.trim(),
        payload.aadhar_number.trim(),
        &payload.email,
    )
    .await?;
    Ok(Json(created))
}

/// PUT /api/members/{aadhar} - 更新家庭成员
pub async fn update(
    State(state): State<ServerState>,
    Path(aadhar): Path<String>,
    Json(payload): Json<MemberUpdate>,
) -> AppResult<Json<FamilyMember>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_aadhar(&payload.aadhar_number)?;
    validate_email(&payload.email)?;

    let updated = member::update(&state.pool, &aadhar, payload).await?;
    Ok(Json(updated))
}

#[derive(serde::Serialize)]
pub struct DeleteResponse {
    pub message: &'static str,
}

/// DELETE /api/members/{aadhar} - 删除家庭成员
pub async fn delete(
    State(state): State<ServerState>,
    Path(aadhar): Path<String>,
) -> AppResult<Json<DeleteResponse>> {
    if !member::delete(&state.pool, &aadhar).await? {
        return Err(AppError::not_found(format!("Member {aadhar}")));
    }
    Ok(Json(DeleteResponse {
        message: "Member deleted successfully",
    }))
}
