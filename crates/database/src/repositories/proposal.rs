//! 提案仓库
//!
//! 负责 `proposals` 表相关的数据库操作

use crate::models::proposal::{NewProposal, ProposalRecord, ProposalRegeneration, ProposalUpdate};
use crate::repositories::statement::{BindValue, BuiltUpdate, UpdateStatement, PROPOSAL_COLUMNS};
use crate::repositories::traits::ProposalRepositoryTrait;
use crate::{DatabaseError, DatabaseResult};
use chrono::Utc;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

/// 提案仓库结构体
#[derive(Debug, Clone)]
pub struct ProposalRepository {
    pool: PgPool,
}

impl ProposalRepository {
    /// 创建新的提案仓库实例
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 执行动态构造的 UPDATE 语句
    ///
    /// 参数按 [`BuiltUpdate::binds`] 的顺序绑定，最后绑定 `id`
    async fn execute_update(&self, id: Uuid, statement: UpdateStatement) -> DatabaseResult<ProposalRecord> {
        let BuiltUpdate { sql, binds } = statement.build(Utc::now());
        debug!(sql = %sql, params = binds.len() + 1, "🔄 执行动态UPDATE");

        let mut query = sqlx::query_as::<_, ProposalRecord>(&sql);
        for value in binds {
            query = match value {
                BindValue::Text(v) => query.bind(v),
                BindValue::TextArray(v) => query.bind(v),
                BindValue::Status(v) => query.bind(v),
                BindValue::Timestamp(v) => query.bind(v),
            };
        }

        query
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DatabaseError::NotFound(id))
    }
}

#[async_trait::async_trait]
impl ProposalRepositoryTrait for ProposalRepository {
    /// 创建新提案
    ///
    /// `created_at` 和 `last_update` 使用同一个时间点
    async fn create(&self, proposal: NewProposal) -> DatabaseResult<ProposalRecord> {
        debug!("📝 创建提案: {:#?}", proposal);

        let now = Utc::now();
        let query = format!(
            "INSERT INTO proposals ({PROPOSAL_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NULL, $10, $10) \
             RETURNING {PROPOSAL_COLUMNS}"
        );

        let record = sqlx::query_as::<_, ProposalRecord>(&query)
            .bind(proposal.id)
            .bind(proposal.title)
            .bind(proposal.company_name)
            .bind(proposal.client_name)
            .bind(proposal.prompt)
            .bind(proposal.colors)
            .bind(proposal.logo)
            .bind(proposal.client_logo)
            .bind(proposal.status)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

        debug!("✅ 提案创建成功: {}", record.id);
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<ProposalRecord> {
        debug!("🔍 根据 ID 获取提案: {}", id);

        let query = format!("SELECT {PROPOSAL_COLUMNS} FROM proposals WHERE id = $1");
        sqlx::query_as::<_, ProposalRecord>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DatabaseError::NotFound(id))
    }

    async fn list_all(&self) -> DatabaseResult<Vec<ProposalRecord>> {
        let query = format!("SELECT {PROPOSAL_COLUMNS} FROM proposals ORDER BY created_at DESC");
        let records = sqlx::query_as::<_, ProposalRecord>(&query)
            .fetch_all(&self.pool)
            .await?;

        debug!("✅ 查询完成 - 共 {} 个提案", records.len());
        Ok(records)
    }

    /// 部分更新提案
    ///
    /// ## SQL
    ///
    /// 与 `coalesce` 写法不同，这里只把出现的字段写进 SET 子句，
    /// 这样才能区分"未提供"和"显式设置为空字符串"。语句由 [`UpdateStatement`] 构造。
    async fn apply_partial_update(&self, id: Uuid, update: ProposalUpdate) -> DatabaseResult<ProposalRecord> {
        debug!("🔄 更新提案 {} 信息: {:#?}", id, update);

        let record = self
            .execute_update(id, UpdateStatement::for_partial_update(&update))
            .await?;

        debug!("✅ 提案更新成功: {}", record.id);
        Ok(record)
    }

    async fn apply_regeneration(&self, id: Uuid, regeneration: ProposalRegeneration) -> DatabaseResult<ProposalRecord> {
        debug!("🔄 覆盖提案 {} 内容用于重新生成", id);

        self.execute_update(id, UpdateStatement::for_regeneration(&regeneration))
            .await
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<()> {
        debug!("🗑️ 删除提案: {}", id);

        let result = sqlx::query("DELETE FROM proposals WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(id));
        }

        debug!("✅ 提案删除成功: {}", id);
        Ok(())
    }

    async fn ping(&self) -> DatabaseResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
