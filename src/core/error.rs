//! 核心错误处理模块
//!
//! 所有错误响应都在这里统一成 `{status, statusCode, message}` 信封，
//! 处理器只返回 `CoreError`，从不自己拼装错误 JSON。

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

/// 未知错误的默认提示
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred on the server.";

/// 核心错误类型
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Invalid or missing API key. Use x-api-key header.")]
    Unauthorized,
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error("{0}")]
    InternalServerError(String),
}

impl CoreError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CoreError::BadRequest(_) => StatusCode::BAD_REQUEST,
            CoreError::Unauthorized => StatusCode::UNAUTHORIZED,
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            CoreError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 对外暴露的消息，空消息回退到默认提示
    pub fn message(&self) -> String {
        let message = self.to_string();
        if message.is_empty() {
            UNEXPECTED_ERROR_MESSAGE.to_string()
        } else {
            message
        }
    }
}

/// 错误响应结构
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub status: &'static str,
    pub status_code: u16,
    pub message: String,
}

impl From<&CoreError> for ErrorResponse {
    fn from(err: &CoreError) -> Self {
        Self {
            status: "error",
            status_code: err.status_code().as_u16(),
            message: err.message(),
        }
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse::from(&self);

        if status.is_server_error() {
            error!(code = body.status_code, error = ?self, "{}", body.message);
        } else {
            warn!(code = body.status_code, "{}", body.message);
        }

        (status, Json(body)).into_response()
    }
}
