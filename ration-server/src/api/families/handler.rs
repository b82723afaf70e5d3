//! Family API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::{family, member};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};
use shared::models::{Family, FamilyCreate, FamilyMember, FamilyUpdate};

/// GET /api/families - 获取所有家庭
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Family>>> {
    let families = family::find_all(&state.pool).await?;
    Ok(Json(families))
}

/// GET /api/families/areas - 所有家庭的去重区域列表
pub async fn areas(State(state): State<ServerState>) -> AppResult<Json<Vec<String>>> {
    let areas = family::distinct_areas(&state.pool).await?;
    Ok(Json(areas))
}

/// POST /api/families - 新建家庭
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<FamilyCreate>,
) -> AppResult<Json<Family>> {
    validate_required_text(&payload.family_code, "family_code", MAX_NAME_LEN)?;
    validate_required_text(&payload.area, "area", MAX_NAME_LEN)?;
    let created = family::create(&state.pool, payload).await?;
    Ok(Json(created))
}

/// PUT /api/families/{code} - 更新家庭
pub async fn update(
    State(state): State<ServerState>,
    Path(code): Path<String>,
    Json(payload): Json<FamilyUpdate>,
) -> AppResult<Json<Family>> {
    validate_required_text(&payload.family_code, "family_code", MAX_NAME_LEN)?;
    validate_required_text(&payload.area, "area", MAX_NAME_LEN)?;
    let updated = family::update(&state.pool, &code, payload).await?;
    Ok(Json(updated))
}

#[derive(serde::Serialize)]
pub struct DeleteResponse {
    pub message: &'static str,
}

/// DELETE /api/families/{code} - 删除家庭（级联成员与订单）
pub async fn delete(
    State(state): State<ServerState>,
    Path(code): Path<String>,
) -> AppResult<Json<DeleteResponse>> {
    if !family::delete(&state.pool, &code).await? {
        return Err(AppError::not_found(format!("Family {code}")));
    }
    Ok(Json(DeleteResponse {
        message: "Family deleted successfully",
    }))
}

/// GET /api/families/{code}/members - 家庭成员列表
pub async fn members(
    State(state): State<ServerState>,
    Path(code): Path<String>,
) -> AppResult<Json<Vec<FamilyMember>>> {
    let fam = family::find_by_code(&state.pool, &code)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Family {code}")))?;
    let members = member::find_by_family(&state.pool, fam.id).await?;
    Ok(Json(members))
}
