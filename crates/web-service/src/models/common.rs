use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 统一的错误返回格式
///
/// `code` 是稳定的机器可读错误码，`error` 是给人看的说明。
/// 5xx类错误不会返回内部错误细节，只记录在日志中。
#[derive(Deserialize, Debug, ToSchema, Serialize, PartialEq)]
pub struct ErrorReply {
    #[schema(example = "VALIDATION_ERROR")]
    /// 错误码
    pub code: String,

    #[schema(example = "prompt: length must be at least 20")]
    /// 错误说明
    pub error: String,
}

/// 健康检查返回
#[derive(Deserialize, Debug, ToSchema, Serialize)]
pub struct HealthReply {
    #[schema(example = "ok")]
    pub status: String,

    /// 数据库是否可用
    pub database: bool,

    #[schema(example = "0.1.0")]
    pub version: String,
}
