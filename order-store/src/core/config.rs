use crate::orders::durable::DEFAULT_QUEUE_CAPACITY;
use std::path::PathBuf;
use std::str::FromStr;

/// Which [`OrdersStore`](crate::orders::OrdersStore) backend to open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    /// In-memory store, lost on exit
    Memory,
    /// redb database file under the work dir
    #[default]
    Durable,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" => Ok(Self::Memory),
            "durable" | "redb" => Ok(Self::Durable),
            other => Err(format!("unknown store backend: {}", other)),
        }
    }
}

/// 存储配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库文件) |
/// | ORDERS_DB_FILE | clean-store.redb | 数据库文件名 |
/// | STORE_BACKEND | durable | `durable` 或 `memory` |
/// | STORE_QUEUE_CAPACITY | 64 | 写队列容量 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (none) | 日志目录，未设置时输出到 stdout |
/// | SEED_DEMO_ORDERS | true | 空库时写入演示订单 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/tmp/store STORE_BACKEND=memory cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录
    pub work_dir: String,
    /// 数据库文件名 (相对 work_dir)
    pub db_file: String,
    pub backend: StoreBackend,
    /// Capacity of the durable store's command queue
    pub queue_capacity: usize,
    pub log_level: String,
    pub log_dir: Option<String>,
    /// Seed demo orders into an empty store at startup
    pub seed_demo_orders: bool,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            db_file: std::env::var("ORDERS_DB_FILE")
                .unwrap_or_else(|_| "clean-store.redb".into()),
            backend: std::env::var("STORE_BACKEND")
                .ok()
                .and_then(|v| match v.parse() {
                    Ok(backend) => Some(backend),
                    Err(e) => {
                        tracing::warn!(error = %e, "Ignoring STORE_BACKEND");
                        None
                    }
                })
                .unwrap_or_default(),
            queue_capacity: std::env::var("STORE_QUEUE_CAPACITY")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_QUEUE_CAPACITY),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
            seed_demo_orders: std::env::var("SEED_DEMO_ORDERS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, backend: StoreBackend) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.backend = backend;
        config
    }

    /// Full path of the database file
    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join(&self.db_file)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
