//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - Aadhar 登录与登录验证码接口
//! - [`checkout`] - 结账验证码与下单接口
//! - [`families`] - 家庭管理接口
//! - [`members`] - 家庭成员管理接口
//! - [`items`] - 物品管理接口 (admin)
//! - [`stock`] - 家庭库存浏览接口
//! - [`orders`] - 订单接口 (遗留下单流程 + admin 视图 + 发票数据)
//! - [`notifications`] - 区域通知接口

pub mod auth;
pub mod checkout;
pub mod families;
pub mod health;
pub mod items;
pub mod members;
pub mod notifications;
pub mod orders;
pub mod stock;

use axum::Router;

use crate::core::ServerState;

/// Assemble all resource routers
pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(checkout::router())
        .merge(families::router())
        .merge(members::router())
        .merge(items::router())
        .merge(stock::router())
        .merge(orders::router())
        .merge(notifications::router())
}
