//! # Product API
//!
//! 基于 Axum 的产品管理 REST 服务：
//! - 内存存储，启动时预置示例数据
//! - 写操作需要 `x-api-key` 认证
//! - 统一的 JSON 错误信封

pub mod app;
pub mod config;
pub mod core;
pub mod infrastructure;

pub use app::{router, seeded_store};
pub use config::{load_config, AppConfig, ConfigError};
pub use crate::core::error::CoreError;
