use std::sync::Arc;

use sqlx::SqlitePool;

use crate::core::Config;
use crate::core::tasks::{BackgroundTasks, TaskKind};
use crate::db::DbService;
use crate::services::{LogMailer, SharedMailer};

/// 服务器状态 - 持有所有服务的共享引用
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | pool | SqlitePool | SQLite 连接池 |
/// | mailer | SharedMailer | 邮件投递服务（注入，无全局状态） |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 连接池
    pub pool: SqlitePool,
    /// 邮件投递服务
    pub mailer: SharedMailer,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`ServerState::initialize`] 代替；测试用它注入自己的
    /// 连接池和邮件实现。
    pub fn new(config: Config, pool: SqlitePool, mailer: SharedMailer) -> Self {
        Self {
            config,
            pool,
            mailer,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构 (确保目录存在)
    /// 2. 数据库 (work_dir/database/ration.db)
    /// 3. 邮件服务 (默认 log 投递)
    ///
    /// # Panics
    ///
    /// 数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("ration.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");

        let mailer: SharedMailer = Arc::new(LogMailer);

        Self::new(config.clone(), db_service.pool, mailer)
    }

    /// 启动后台任务
    ///
    /// 必须在 `Server::run()` 之前调用。
    ///
    /// 启动的任务：
    /// - 维护清扫 (Periodic)：过期物品、过期通知、陈旧验证码
    pub fn start_background_tasks(&self) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new();
        let token = tasks.shutdown_token();
        let pool = self.pool.clone();
        let interval_secs = self.config.sweep_interval_secs.max(1);

        tasks.spawn("maintenance_sweep", TaskKind::Periodic, async move {
            let mut ticker =
                tokio::time::interval(std::time::Duration::from_secs(interval_secs));
            // The first tick fires immediately; that doubles as warmup
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        run_maintenance_sweep(&pool).await;
                    }
                    _ = token.cancelled() => break,
                }
            }
        });

        tasks
    }
}

/// One maintenance pass: stale items, old notices, stale checkout codes
async fn run_maintenance_sweep(pool: &SqlitePool) {
    match crate::stock::purge_stale(pool).await {
        Ok(count) if count > 0 => tracing::info!(count, "Purged stale ration items"),
        Ok(_) => {}
        Err(e) => tracing::warn!(error = %e, "Stale item sweep failed"),
    }

    match crate::notify::purge_old(pool).await {
        Ok(count) if count > 0 => tracing::info!(count, "Purged old notifications"),
        Ok(_) => {}
        Err(e) => tracing::warn!(error = %e, "Notification sweep failed"),
    }

    // Checkout codes are dead 5 minutes after issuance; keep a day of
    // history for support, then drop them
    let cutoff = shared::util::now_millis() - 24 * 60 * 60 * 1000;
    match crate::db::repository::otp::purge_older_than(pool, cutoff).await {
        Ok(count) if count > 0 => tracing::info!(count, "Purged stale checkout codes"),
        Ok(_) => {}
        Err(e) => tracing::warn!(error = %e, "Checkout code sweep failed"),
    }
}
