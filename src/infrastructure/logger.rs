//! 日志基础设施

use tracing_subscriber::EnvFilter;

pub struct Logger;

impl Logger {
    /// 安装全局 fmt subscriber，`RUST_LOG` 优先于配置的级别
    pub fn init(level: &str) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("product_api={level},tower_http={level}")));

        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
