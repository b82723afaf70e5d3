//! Ration Server - 配给分发管理系统后端
//!
//! # 架构概述
//!
//! 本 crate 是配给后端的主入口，提供以下核心功能：
//!
//! - **订单引擎** (`orders`): 事务化下单，条件扣减保证不超卖
//! - **一次性验证码** (`otp`): 登录/结账两个存储变体，单次使用 + 过期
//! - **库存台账** (`stock`): 家庭可购清单与陈旧库存清理
//! - **区域通知** (`notify`): 到货通知的按区域可见与撤销
//! - **数据库** (`db`): SQLite (WAL) + 内嵌迁移
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! ration-server/src/
//! ├── core/          # 配置、状态、HTTP 服务、后台任务
//! ├── db/            # 连接池、迁移、repository
//! ├── otp/           # 一次性验证码状态机
//! ├── orders/        # 订单引擎（事务核心）
//! ├── stock/         # 库存台账（读路径 + 维护清扫）
//! ├── notify/        # 区域通知扇出
//! ├── services/      # 协作方接缝：邮件投递、发票数据
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 错误、日志、校验
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod notify;
pub mod orders;
pub mod otp;
pub mod services;
pub mod stock;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置环境：dotenv + 日志
///
/// 必须在读取 [`Config`] 之前调用，保证 .env 里的变量生效。
pub fn setup_environment() -> anyhow::Result<()> {
    // .env 不存在不算错误
    let _ = dotenv::dotenv();

    let config = Config::from_env();
    config.ensure_work_dir_structure()?;
    let log_dir = config.log_dir();
    init_logger_with_file(Some(&config.log_level), log_dir.to_str());
    Ok(())
}
