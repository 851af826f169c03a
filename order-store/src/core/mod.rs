//! 核心模块 - 配置和存储状态
//!
//! - [`Config`] - 存储配置
//! - [`StoreBackend`] - 存储后端选择
//! - [`StoreState`] - 已打开的订单存储

pub mod config;
pub mod state;

pub use config::{Config, StoreBackend};
pub use state::StoreState;
