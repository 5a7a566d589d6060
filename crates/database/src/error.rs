use thiserror::Error;
use uuid::Uuid;

/// 数据库操作错误类型
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// SQLX 错误
    #[error("数据库操作错误: {0}")]
    SqlxError(#[from] sqlx::Error),

    /// 记录不存在
    #[error("提案不存在: {0}")]
    NotFound(Uuid),

    /// 连接错误
    #[error("数据库连接错误: {0}")]
    ConnectionError(String),

    /// 迁移错误
    #[error("数据库迁移错误: {0}")]
    MigrationError(String),
}

impl DatabaseError {
    /// 创建连接错误
    pub fn connection<T: ToString>(msg: T) -> Self {
        Self::ConnectionError(msg.to_string())
    }

    /// 创建迁移错误
    pub fn migration<T: ToString>(msg: T) -> Self {
        Self::MigrationError(msg.to_string())
    }

    /// 是否是记录不存在的错误
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::SqlxError(sqlx::Error::RowNotFound))
    }
}
