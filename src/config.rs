//! 服务配置
//!
//! 加载顺序：默认值 → 配置文件（可选）→ 环境变量覆盖。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 配置文件搜索路径
const CONFIG_PATHS: [&str; 2] = ["config.toml", "./config/config.toml"];

/// 服务配置结构
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP 服务配置
    pub http: HttpConfig,
    /// 认证配置
    pub auth: AuthConfig,
    /// 日志配置
    pub logging: LoggingConfig,
}

/// HTTP 服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// 绑定地址
    pub bind_address: String,
    /// HTTP 服务端口
    pub port: u16,
}

/// 认证配置
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// 写操作需要的 x-api-key
    pub api_key: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别 (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_key: "PLP_SECRET_KEY".to_string(),
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("api_key", &"***")
            .finish()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// 从 TOML 文件加载，缺失的字段使用默认值
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::FileRead(e.to_string()))?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// 用环境变量覆盖：HOST、PORT、API_KEY、LOG_LEVEL
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.http.bind_address = host;
        }
        if let Some(port) = lookup("PORT") {
            self.http.port = port.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                key: "PORT",
                value: port.clone(),
            })?;
        }
        if let Some(api_key) = lookup("API_KEY") {
            self.auth.api_key = api_key;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level.to_lowercase();
        }
        Ok(self)
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.port == 0 {
            return Err(ConfigError::Validation("HTTP端口必须大于0".to_string()));
        }
        if self.http.bind_address.is_empty() {
            return Err(ConfigError::Validation("绑定地址不能为空".to_string()));
        }
        if self.auth.api_key.is_empty() {
            return Err(ConfigError::Validation("API Key 不能为空".to_string()));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "无效的日志级别: {}，有效值: {:?}",
                self.logging.level, valid_levels
            )));
        }

        Ok(())
    }

    /// 监听地址，主机名交给 tokio 解析
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.http.bind_address, self.http.port)
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("文件读取错误: {0}")]
    FileRead(String),
    #[error("配置解析错误: {0}")]
    Parse(String),
    #[error("环境变量 {key} 的值无效: {value}")]
    InvalidEnv { key: &'static str, value: String },
    #[error("配置验证错误: {0}")]
    Validation(String),
}

/// 从配置文件（如果存在）和进程环境变量加载配置
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let base = match CONFIG_PATHS.iter().find(|path| Path::new(path).exists()) {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::default(),
    };

    let config = base.apply_env(|key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}
