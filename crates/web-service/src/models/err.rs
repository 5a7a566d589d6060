use crate::clients::GenerationError;
use crate::models::common::ErrorReply;
use crate::services::ServiceError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

/// 使用 [`thiserror`] 定义错误类型
/// 方便根据类型转换为相应的http错误码
#[derive(Error, Debug)]
pub enum AppError {
    /// 请求体不是合法的json，或者字段类型不匹配
    #[error(transparent)]
    InvalidBody(#[from] JsonRejection),

    /// 服务层错误
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl AppError {
    /// 对应的http状态码和错误码
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::InvalidBody(_) => (StatusCode::BAD_REQUEST, "INVALID_BODY"),
            AppError::Service(err) => match err {
                ServiceError::Validation(_) | ServiceError::InvalidStatus(_) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
                }
                ServiceError::InvalidId(_) => (StatusCode::BAD_REQUEST, "INVALID_ID"),
                ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                ServiceError::Persistence(_) => (StatusCode::INTERNAL_SERVER_ERROR, "PERSISTENCE_ERROR"),
                ServiceError::Generation(GenerationError::Rejected { .. }) => {
                    (StatusCode::BAD_GATEWAY, "GENERATION_FAILED")
                }
                ServiceError::Generation(GenerationError::Transport(_)) => {
                    (StatusCode::BAD_GATEWAY, "GENERATION_UNAVAILABLE")
                }
                ServiceError::Generation(GenerationError::Serialization(_)) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
                }
                ServiceError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            },
        }
    }
}

fn server_error_message(code: &str) -> &'static str {
    match code {
        "GENERATION_FAILED" => "generation service rejected the request",
        "GENERATION_UNAVAILABLE" => "generation service unavailable",
        "PERSISTENCE_ERROR" => "database operation failed",
        "STORAGE_ERROR" => "failed to store generated document",
        _ => "internal server error",
    }
}

/// Tell axum how to convert `AppError` into a response.
///
/// 4xx错误直接返回错误信息，5xx错误只返回通用说明，细节写入日志
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            AppError::InvalidBody(rejection) => rejection.body_text(),
            _ if status.is_server_error() => {
                error!(code, "❌ 请求处理失败: {}", self);
                server_error_message(code).to_string()
            }
            _ => self.to_string(),
        };

        let reply = ErrorReply {
            code: code.to_string(),
            error: message,
        };

        (status, Json(reply)).into_response()
    }
}
