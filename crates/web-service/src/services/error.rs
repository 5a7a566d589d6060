//! 服务层错误
//!
//! 每一类下游失败都有独立的变体，HTTP层据此给出不同的状态码和错误码。

use crate::clients::GenerationError;
use crate::storage::StorageError;
use database::{DatabaseError, UnknownStatus};
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

#[derive(Error, Debug)]
pub enum ServiceError {
    /// 请求参数没有通过校验
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// 状态值不在 draft / sent / approved 之内
    #[error("invalid status '{}': must be one of draft, sent, approved", .0.0)]
    InvalidStatus(#[from] UnknownStatus),

    /// ID为空或不是合法的UUID
    #[error("invalid proposal id: '{0}'")]
    InvalidId(String),

    /// 提案不存在
    #[error("proposal {0} not found")]
    NotFound(Uuid),

    /// 数据库失败
    #[error(transparent)]
    Persistence(DatabaseError),

    /// 生成服务失败
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// 文件写入失败
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<DatabaseError> for ServiceError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(id) => ServiceError::NotFound(id),
            other => ServiceError::Persistence(other),
        }
    }
}

/// 服务层结果类型
pub type ServiceResult<T> = Result<T, ServiceError>;
