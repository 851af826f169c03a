//! CleanStore order store
//!
//! # 架构概述
//!
//! Storage-agnostic CRUD over customer orders:
//!
//! - **订单存储** (`orders`): `OrdersStore` 契约，内存与 redb 两种实现
//! - **Worker** (`orders::worker`): 调用存储并在主队列上回调
//! - **配置** (`core`): 环境变量配置、存储状态
//! - **日志** (`utils::logger`): tracing 日志初始化
//!
//! # 模块结构
//!
//! ```text
//! order-store/src/
//! ├── core/          # 配置、存储状态
//! ├── orders/        # 存储契约、内存/redb 存储、worker
//! └── utils/         # 日志
//! ```

pub mod core;
pub mod orders;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, StoreBackend, StoreState};
pub use orders::{
    DurableOrdersStore, FatalShutdown, MainQueue, MemOrdersStore, OrdersStore, OrdersWorker,
};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Load `.env` and initialize logging from the environment
pub fn setup_environment() -> Config {
    if let Err(e) = dotenv::dotenv() {
        // A missing .env file is normal
        if !e.not_found() {
            eprintln!("Failed to load .env: {}", e);
        }
    }
    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    config
}
