//! 服务层 trait 定义
//!
//! 定义服务层的抽象接口，遵循六边形架构的端口适配器模式

use crate::models::proposals::{ProposalCreate, ProposalPatch, ProposalRegenerate};
use crate::services::ServiceResult;
use database::ProposalRecord;

/// 提案服务 trait 定义
///
/// 定义了提案相关的业务逻辑接口，作为应用层的端口(Port)，具体实现由
/// [`crate::services::ProposalService`] 提供。
///
/// 路由通过 `Arc<dyn ProposalServiceTrait>` 使用服务，因此这里不要求 `Clone`。
///
/// 所有接收字符串ID的方法都会先校验ID格式，非法时返回 `InvalidId`。
#[async_trait::async_trait]
pub trait ProposalServiceTrait: Send + Sync + 'static {
    /// 创建提案并生成PDF
    ///
    /// 提案写入数据库之后的任何失败都不会回滚，记录保持 `draft` 状态且没有文件路径
    async fn create_proposal(&self, input: ProposalCreate) -> ServiceResult<ProposalRecord>;

    /// 获取全部提案
    async fn list_proposals(&self) -> ServiceResult<Vec<ProposalRecord>>;

    /// 根据 ID 获取提案
    async fn get_proposal(&self, id: &str) -> ServiceResult<ProposalRecord>;

    /// 部分更新提案
    ///
    /// `status` 出现时必须是三个合法值之一
    async fn update_proposal(&self, id: &str, update: ProposalPatch) -> ServiceResult<ProposalRecord>;

    /// 删除提案
    async fn delete_proposal(&self, id: &str) -> ServiceResult<()>;

    /// 用新的内容重新生成提案PDF
    ///
    /// 不修改提案状态
    async fn regenerate_proposal(&self, id: &str, input: ProposalRegenerate) -> ServiceResult<ProposalRecord>;

    /// 依赖的存储是否可用
    async fn is_healthy(&self) -> bool;
}
