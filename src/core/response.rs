//! 核心响应处理模块

use serde::Serialize;

/// 分页列表响应
///
/// `total` 是过滤后、分页前的数量，`data` 只包含当前页。
#[derive(Debug, Serialize)]
pub struct PageResponse<T> {
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub data: Vec<T>,
}

impl<T> PageResponse<T> {
    pub fn new(total: usize, page: usize, limit: usize, data: Vec<T>) -> Self {
        Self {
            total,
            page,
            limit,
            data,
        }
    }
}

/// 健康检查响应
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub products: usize,
    pub timestamp: String,
}

impl HealthResponse {
    pub fn ok(products: usize) -> Self {
        Self {
            status: "ok",
            products,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
