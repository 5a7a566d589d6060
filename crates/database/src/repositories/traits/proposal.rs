//! 提案仓库 trait 定义
//!
//! 定义提案数据库操作的抽象接口

use crate::models::proposal::{NewProposal, ProposalRecord, ProposalRegeneration, ProposalUpdate};
use crate::DatabaseResult;
use uuid::Uuid;

/// 提案仓库trait定义
///
/// 定义了提案相关的数据库操作接口，支持：
/// - 提案创建
/// - 提案查询（单个/全部）
/// - 提案部分更新
/// - 重新生成时的内容覆盖
/// - 提案删除
#[async_trait::async_trait]
pub trait ProposalRepositoryTrait: Send + Sync + 'static {
    /// 创建新提案
    ///
    /// 写入全部字段，`created_at` 和 `last_update` 在此时赋值
    ///
    /// # 返回值
    /// 返回数据库中保存的记录
    async fn create(&self, proposal: NewProposal) -> DatabaseResult<ProposalRecord>;

    /// 根据 ID 获取提案
    ///
    /// 不存在时返回 `NotFound`
    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<ProposalRecord>;

    /// 获取全部提案，按创建时间倒序
    ///
    /// 没有数据时返回空列表
    async fn list_all(&self) -> DatabaseResult<Vec<ProposalRecord>>;

    /// 部分更新提案
    ///
    /// 只修改 `update` 中出现的字段，`last_update` 总是刷新
    ///
    /// # 返回值
    /// 返回更新后的记录，不存在时返回 `NotFound`
    async fn apply_partial_update(&self, id: Uuid, update: ProposalUpdate) -> DatabaseResult<ProposalRecord>;

    /// 重新生成前覆盖提案内容
    ///
    /// 状态和最终文件路径不受影响
    async fn apply_regeneration(&self, id: Uuid, regeneration: ProposalRegeneration) -> DatabaseResult<ProposalRecord>;

    /// 删除提案
    ///
    /// 不存在时返回 `NotFound`
    async fn delete(&self, id: Uuid) -> DatabaseResult<()>;

    /// 检查数据库连接是否可用
    async fn ping(&self) -> DatabaseResult<()>;
}
