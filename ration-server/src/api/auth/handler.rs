//! Auth API Handlers
//!
//! 家庭成员侧的登录路径：Aadhar 直接登录、Aadhar+邮箱校验、
//! 登录验证码（成员行内嵌变体）的签发与验证。

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::db::repository::{family, member};
use crate::otp;
use crate::services::email::templates;
use crate::utils::validation::{validate_aadhar, validate_email};
use crate::utils::{AppError, AppResult};

#[derive(serde::Deserialize)]
pub struct LoginRequest {
    pub aadhar_number: String,
}

#[derive(serde::Serialize)]
pub struct LoginResponse {
    pub name: String,
    pub family_code: String,
    pub area: String,
}

/// POST /api/auth/login - Aadhar 登录
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    validate_aadhar(&payload.aadhar_number)?;
    let found = member::find_by_aadhar(&state.pool, payload.aadhar_number.trim())
        .await?
        .ok_or_else(|| AppError::not_found("Aadhar not registered"))?;
    let fam = family::find_by_id(&state.pool, found.family_id)
        .await?
        .ok_or_else(|| AppError::not_found("Family not found"))?;

    Ok(Json(LoginResponse {
        name: found.name,
        family_code: fam.family_code,
        area: fam.area,
    }))
}

#[derive(serde::Deserialize)]
pub struct ValidateRequest {
    pub aadhar_number: String,
    pub email: String,
}

#[derive(serde::Serialize)]
pub struct ValidateResponse {
    pub member_name: String,
    pub family_code: String,
}

/// POST /api/auth/validate - 校验 Aadhar 与邮箱是否匹配
pub async fn validate(
    State(state): State<ServerState>,
    Json(payload): Json<ValidateRequest>,
) -> AppResult<Json<ValidateResponse>> {
    validate_aadhar(&payload.aadhar_number)?;
    validate_email(&payload.email)?;
    let found =
        member::find_by_aadhar_and_email(&state.pool, payload.aadhar_number.trim(), &payload.email)
            .await?
            .ok_or_else(|| AppError::not_found("No member found with this Aadhar and email"))?;
    let fam = family::find_by_id(&state.pool, found.family_id)
        .await?
        .ok_or_else(|| AppError::not_found("Family not found"))?;

    Ok(Json(ValidateResponse {
        member_name: found.name,
        family_code: fam.family_code,
    }))
}

#[derive(serde::Deserialize)]
pub struct SendOtpRequest {
    pub aadhar_number: String,
    pub email: String,
}

#[derive(serde::Serialize)]
pub struct SendOtpResponse {
    pub message: &'static str,
}

/// POST /api/auth/send-otp - 签发登录验证码并投递邮件
///
/// 验证码先落库再投递；投递失败以 `EmailDelivery` 上报，调用方可
/// 直接重试投递而无需重新签发。
pub async fn send_otp(
    State(state): State<ServerState>,
    Json(payload): Json<SendOtpRequest>,
) -> AppResult<Json<SendOtpResponse>> {
    validate_aadhar(&payload.aadhar_number)?;
    validate_email(&payload.email)?;

    let (_, code) =
        otp::issue_login(&state.pool, payload.aadhar_number.trim(), &payload.email).await?;

    let (subject, body) = templates::login_otp(&code);
    state
        .mailer
        .send(&payload.email, &subject, &body)
        .await
        .map_err(|e| AppError::EmailDelivery(e.to_string()))?;

    Ok(Json(SendOtpResponse {
        message: "OTP sent to registered email",
    }))
}

#[derive(serde::Deserialize)]
pub struct VerifyOtpRequest {
    pub aadhar_number: String,
    pub otp: String,
}

#[derive(serde::Serialize)]
pub struct VerifyOtpResponse {
    pub name: String,
    pub family_code: String,
    pub area: String,
    pub email: Option<String>,
}

/// POST /api/auth/verify-otp - 验证登录验证码
pub async fn verify_otp(
    State(state): State<ServerState>,
    Json(payload): Json<VerifyOtpRequest>,
) -> AppResult<Json<VerifyOtpResponse>> {
    validate_aadhar(&payload.aadhar_number)?;
    let verified = otp::verify_login(&state.pool, payload.aadhar_number.trim(), &payload.otp).await?;
    let fam = family::find_by_id(&state.pool, verified.family_id)
        .await?
        .ok_or_else(|| AppError::not_found("Family not found"))?;

    Ok(Json(VerifyOtpResponse {
        name: verified.name,
        family_code: fam.family_code,
        area: fam.area,
        email: verified.email,
    }))
}
