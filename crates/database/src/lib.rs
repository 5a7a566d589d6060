//! 数据库操作模块
//!
//! 这个模块提供了数据库连接、迁移，以及提案（proposal）表的读写功能

pub mod connection;
pub mod error;
pub mod models;
pub mod repositories;

pub use connection::{initialize_database, DatabasePool};
pub use error::DatabaseError;
pub use models::proposal::{
    NewProposal, ProposalRecord, ProposalRegeneration, ProposalStatus, ProposalUpdate, UnknownStatus,
};
pub use repositories::{proposal::ProposalRepository, traits::ProposalRepositoryTrait};

/// 数据库操作结果类型
pub type DatabaseResult<T> = Result<T, DatabaseError>;
