use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use sqlx::SqlitePool;
use tokio::sync::broadcast::error::RecvError;

use crate::core::{Config, Result};
use crate::db::DbService;
use crate::enrollment::{
    BroadcastNotifier, EnrollmentService, SqliteBookingStore, SqliteClassRegistry,
};

/// 服务器状态 - 所有请求处理器共享
///
/// 克隆成本低: 内部均为 `Arc` 或连接池句柄
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 连接池
    pub pool: SqlitePool,
    /// 课程预约服务 (ledger + 持久化 + 通知)
    pub enrollment: Arc<EnrollmentService>,
    /// 会员通知广播
    pub notifier: BroadcastNotifier,
}

impl ServerState {
    /// 由已打开的数据库组装状态
    pub fn from_db(config: Config, db: DbService) -> Self {
        let notifier = BroadcastNotifier::new(config.notify_channel_capacity);
        let enrollment = Arc::new(EnrollmentService::new(
            Arc::new(SqliteClassRegistry::new(db.pool.clone())),
            Arc::new(SqliteBookingStore::new(db.pool.clone())),
            Arc::new(notifier.clone()),
        ));
        Self {
            config,
            pool: db.pool,
            enrollment,
            notifier,
        }
    }

    /// 初始化服务器状态: 创建工作目录, 打开数据库并执行迁移
    pub async fn initialize(config: &Config) -> Result<Self> {
        std::fs::create_dir_all(&config.work_dir)
            .with_context(|| format!("Failed to create work dir {}", config.work_dir))?;
        if let Some(parent) = Path::new(&config.database_path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database dir {}", parent.display()))?;
        }

        let db = DbService::new(&config.database_path).await?;

        Ok(Self::from_db(config.clone(), db))
    }

    /// 启动后台任务
    ///
    /// 目前只有一个: 将会员通知写入日志 (通知投递通道的默认消费者)
    pub fn start_background_tasks(&self) {
        let mut rx = self.notifier.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(notification) => {
                        tracing::info!(
                            member_id = %notification.member_id,
                            event = ?notification.event,
                            "Member notified"
                        );
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Notification listener lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });
    }
}
