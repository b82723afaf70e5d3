//! 统一错误处理
//!
//! 提供应用级错误类型和响应结构：
//! - [`AppError`] - 应用错误枚举
//! - 错误自动映射为统一的 [`ApiResponse`] JSON 结构
//!
//! # 错误码规范
//!
//! | 前缀 | 分类 | 示例 |
//! |------|------|------|
//! | E0xxx | 系统错误 | E0001 数据库错误 |
//! | E10xx | 请求/资源错误 | E1002 资源不存在 |
//! | E11xx | 一次性验证码错误 | E1102 验证码过期 |
//! | E12xx | 库存错误 | E1201 库存不足 |
//! | E13xx | 并发冲突 | E1301 行锁等待超时 |
//!
//! # 使用示例
//!
//! ```ignore
//! // 返回错误
//! Err(AppError::not_found("Family F-1001"))
//!
//! // 返回成功响应
//! Ok(Json(items))
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use shared::ApiResponse;
use tracing::error;

use crate::db::repository::RepoError;

/// 应用错误枚举
///
/// | 分类 | 说明 |
/// |------|------|
/// | 请求错误 | 字段缺失、资源不存在、唯一性冲突 |
/// | 验证码错误 | 无效、过期、已使用 |
/// | 业务错误 | 库存不足、行锁等待超时 |
/// | 系统错误 | 数据库错误、内部错误、邮件投递失败 |
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== 请求/资源错误 (4xx) ==========
    #[error("Validation failed: {0}")]
    /// 验证失败 (400)
    Validation(String),

    #[error("Resource not found: {0}")]
    /// 资源不存在 (404)
    NotFound(String),

    #[error("Resource conflict: {0}")]
    /// 资源冲突 (409)
    Conflict(String),

    // ========== 一次性验证码错误 (401) ==========
    #[error("Invalid one-time code")]
    /// 验证码无效 (401)
    OtpInvalid,

    #[error("One-time code expired")]
    /// 验证码过期 (401)
    OtpExpired,

    #[error("One-time code already used")]
    /// 验证码已使用 (401)
    OtpAlreadyUsed,

    // ========== 业务错误 ==========
    #[error("Not enough stock for {0}")]
    /// 库存不足 (409)，携带物品名供前端逐项提示
    InsufficientStock(String),

    #[error("Stock rows are busy, please retry")]
    /// 行锁等待超时 (503)，可安全重试 — 没有任何变更被提交
    Busy,

    // ========== 系统错误 (5xx) ==========
    #[error("Database error: {0}")]
    /// 数据库错误 (500)
    Database(String),

    #[error("Internal server error: {0}")]
    /// 内部错误 (500)
    Internal(String),

    #[error("Email delivery failed: {0}")]
    /// 邮件投递失败 (502) — 验证码已入库，调用方可重试投递
    EmailDelivery(String),
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // Request errors (4xx)
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E1001", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E1002", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "E1003", msg.clone()),

            // One-time code errors (401)
            AppError::OtpInvalid => (StatusCode::UNAUTHORIZED, "E1101", self.to_string()),
            AppError::OtpExpired => (StatusCode::UNAUTHORIZED, "E1102", self.to_string()),
            AppError::OtpAlreadyUsed => (StatusCode::UNAUTHORIZED, "E1103", self.to_string()),

            // Business errors
            AppError::InsufficientStock(_) => (StatusCode::CONFLICT, "E1201", self.to_string()),
            AppError::Busy => (StatusCode::SERVICE_UNAVAILABLE, "E1301", self.to_string()),

            // System errors (5xx)
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E0001",
                    "Database error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E0002",
                    "Internal server error".to_string(),
                )
            }
            AppError::EmailDelivery(msg) => (StatusCode::BAD_GATEWAY, "E1401", msg.clone()),
        };

        let body = Json(ApiResponse::<()>::error(code, message));
        (status, body).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Busy => AppError::Busy,
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}
