//! Gym Server - 健身课程预约服务
//!
//! # 架构概述
//!
//! - **预约** (`enrollment`): 容量限制的课程预约, 先进先出的候补名单与自动转正
//! - **数据库** (`db`): SQLite (sqlx) 持久化课程与预约
//! - **HTTP API** (`api`): RESTful 接口
//!
//! # 模块结构
//!
//! ```text
//! gym-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── enrollment/    # 预约 ledger、服务、存储与通知
//! ├── db/            # 连接池、迁移、repository
//! ├── api/           # HTTP 路由和处理器
//! ├── routes/        # 路由装配与 tower 中间件
//! ├── middleware/    # 请求日志
//! └── utils/         # 日志、校验、时间工具
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod enrollment;
pub mod middleware;
pub mod routes;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Server, ServerState};
pub use enrollment::{EnrollmentLedger, EnrollmentService};
pub use routes::build_app;
pub use utils::{AppError, AppResult, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 加载 .env 并初始化日志
///
/// 返回加载好的配置
pub fn setup_environment() -> Config {
    // .env 文件是可选的
    let _ = dotenv::dotenv();

    let config = Config::from_env();
    init_logger_with_file(
        Some(&config.log_level),
        config.is_production(),
        config.log_dir.as_deref(),
    );
    api::health::mark_started();
    config
}

pub fn print_banner() {
    println!(
        r#"
   ______                
  / ____/_  ______ ___   
 / / __/ / / / __ `__ \  
/ /_/ / /_/ / / / / / /  
\____/\__, /_/ /_/ /_/   
     /____/              
    "#
    );
}
