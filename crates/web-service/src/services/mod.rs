//! 服务层模块
//!
//! 包含业务逻辑的服务层实现，遵循六边形架构原则：
//! 服务只依赖仓库、生成客户端和文件写入的trait，具体实现在启动时注入。

pub mod error;
pub mod proposal;
pub mod traits;

pub use error::{ServiceError, ServiceResult};
pub use proposal::ProposalService;
pub use traits::ProposalServiceTrait;
