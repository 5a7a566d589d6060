//! 数据库仓库 trait 定义
//!
//! 这里定义了各种数据库仓库的抽象接口
//!
//! ## Repository Trait 设计模式 🎯
//!
//! 所有 Repository trait 都遵循统一的约束：
//!
//! ```rust,ignore
//! pub trait XxxRepositoryTrait: Send + Sync + 'static {
//!     // 异步方法定义...
//! }
//! ```
//!
//! - `Send` / `Sync`：仓库实例会在多个并发请求之间共享，异步方法返回的 `Future` 需要跨线程
//! - `'static`：仓库作为应用服务长期存活，不依赖短期引用
//!
//! 服务层对仓库使用泛型参数（零成本抽象），测试时可以替换为内存实现：
//!
//! ```rust,ignore
//! let service = ProposalService::new(ProposalRepository::new(pool), client, writer);
//! ```
//!
//! 所有方法统一返回 `DatabaseResult<T>`，记录不存在时返回 [`crate::DatabaseError::NotFound`]。

pub mod proposal;

// 重新导出
pub use proposal::ProposalRepositoryTrait;
