//! API Key 认证

use std::sync::Arc;

use super::error::CoreError;

/// 携带 API Key 的请求头
pub const API_KEY_HEADER: &str = "x-api-key";

/// 配置的共享密钥，作为认证中间件的状态
#[derive(Clone)]
pub struct ApiKey(Arc<str>);

impl ApiKey {
    pub fn new(secret: impl Into<Arc<str>>) -> Self {
        Self(secret.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// 校验请求提供的 key 是否与配置的密钥完全一致
pub fn authenticate(supplied: Option<&str>, secret: &str) -> Result<(), CoreError> {
    match supplied {
        Some(key) if key == secret => Ok(()),
        _ => Err(CoreError::Unauthorized),
    }
}
