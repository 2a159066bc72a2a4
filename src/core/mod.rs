//! 核心层：错误处理、认证、中间件和通用响应

pub mod auth;
pub mod error;
pub mod middleware;
pub mod response;
