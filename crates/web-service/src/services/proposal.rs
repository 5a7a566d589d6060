//! 提案服务
//!
//! 提案的增删改查，以及"写库 → 调用生成服务 → 保存PDF → 回写路径"的编排流程。
//!
//! 编排流程中各步骤之间没有事务：提案写入之后如果生成或保存失败，
//! 记录会停留在 `draft` 状态且 `arquivoFinal` 为空，之后可以通过重新生成恢复。

use crate::clients::GenerationClientTrait;
use crate::models::proposals::{ProposalCreate, ProposalInfo, ProposalPatch, ProposalRegenerate};
use crate::services::traits::ProposalServiceTrait;
use crate::services::{ServiceError, ServiceResult};
use crate::storage::ArtifactWriterTrait;
use database::{ProposalRecord, ProposalRepositoryTrait, ProposalStatus, ProposalUpdate};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone)]
pub struct ProposalService<PR, G, A>
where
    PR: ProposalRepositoryTrait,
    G: GenerationClientTrait,
    A: ArtifactWriterTrait,
{
    proposal_repository: PR,
    generator: G,
    artifacts: A,
}

impl<PR, G, A> ProposalService<PR, G, A>
where
    PR: ProposalRepositoryTrait,
    G: GenerationClientTrait,
    A: ArtifactWriterTrait,
{
    pub fn new(proposal_repository: PR, generator: G, artifacts: A) -> Self {
        Self {
            proposal_repository,
            generator,
            artifacts,
        }
    }

    /// 生成并保存PDF，返回文件路径
    async fn render_artifact(&self, record: &ProposalRecord) -> ServiceResult<String> {
        let info = ProposalInfo::from(record.clone());
        let bytes = self.generator.generate(&info).await?;
        let path = self.artifacts.store(record.id, &bytes).await?;

        Ok(path.to_string_lossy().into_owned())
    }
}

fn parse_proposal_id(id: &str) -> ServiceResult<Uuid> {
    if id.is_empty() {
        return Err(ServiceError::InvalidId(String::new()));
    }
    Uuid::parse_str(id).map_err(|_| ServiceError::InvalidId(id.to_string()))
}

#[async_trait::async_trait]
impl<PR, G, A> ProposalServiceTrait for ProposalService<PR, G, A>
where
    PR: ProposalRepositoryTrait,
    G: GenerationClientTrait,
    A: ArtifactWriterTrait,
{
    #[instrument(skip_all, fields(title = %input.title))]
    async fn create_proposal(&self, input: ProposalCreate) -> ServiceResult<ProposalRecord> {
        input.validate()?;

        let id = Uuid::new_v4();
        let record = self.proposal_repository.create(input.into_new_proposal(id)).await?;
        info!(proposal_id = %id, "📝 提案已保存，开始生成PDF");

        let path = match self.render_artifact(&record).await {
            Ok(path) => path,
            Err(e) => {
                warn!(proposal_id = %id, "⚠️ 提案已保存但PDF生成失败，可通过重新生成恢复: {}", e);
                return Err(e);
            }
        };

        let update = ProposalUpdate {
            status: Some(ProposalStatus::Draft),
            final_artifact_path: Some(path),
            ..Default::default()
        };
        let record = self
            .proposal_repository
            .apply_partial_update(id, update)
            .await
            .inspect_err(|e| warn!(proposal_id = %id, "⚠️ PDF已保存但路径回写失败: {}", e))?;

        info!(proposal_id = %id, "✅ 提案创建完成");
        Ok(record)
    }

    async fn list_proposals(&self) -> ServiceResult<Vec<ProposalRecord>> {
        Ok(self.proposal_repository.list_all().await?)
    }

    async fn get_proposal(&self, id: &str) -> ServiceResult<ProposalRecord> {
        let id = parse_proposal_id(id)?;
        Ok(self.proposal_repository.find_by_id(id).await?)
    }

    #[instrument(skip(self, update))]
    async fn update_proposal(&self, id: &str, update: ProposalPatch) -> ServiceResult<ProposalRecord> {
        let id = parse_proposal_id(id)?;
        update.validate()?;

        let status = update
            .status
            .as_deref()
            .map(str::parse::<ProposalStatus>)
            .transpose()?;

        let update = ProposalUpdate {
            title: update.title,
            status,
            final_artifact_path: update.final_artifact_path,
        };
        let record = self.proposal_repository.apply_partial_update(id, update).await?;

        info!(proposal_id = %id, status = %record.status, "✅ 提案更新成功");
        Ok(record)
    }

    #[instrument(skip(self))]
    async fn delete_proposal(&self, id: &str) -> ServiceResult<()> {
        let id = parse_proposal_id(id)?;
        self.proposal_repository.delete(id).await?;

        info!(proposal_id = %id, "🗑️ 提案已删除");
        Ok(())
    }

    #[instrument(skip(self, input))]
    async fn regenerate_proposal(&self, id: &str, input: ProposalRegenerate) -> ServiceResult<ProposalRecord> {
        let id = parse_proposal_id(id)?;
        input.validate()?;

        let record = self.proposal_repository.apply_regeneration(id, input.into()).await?;
        info!(proposal_id = %id, "🔄 提案内容已覆盖，开始重新生成PDF");

        let path = self
            .render_artifact(&record)
            .await
            .inspect_err(|e| warn!(proposal_id = %id, "⚠️ 重新生成PDF失败: {}", e))?;

        let update = ProposalUpdate {
            final_artifact_path: Some(path),
            ..Default::default()
        };
        let record = self.proposal_repository.apply_partial_update(id, update).await?;

        info!(proposal_id = %id, "✅ 提案重新生成完成");
        Ok(record)
    }

    async fn is_healthy(&self) -> bool {
        match self.proposal_repository.ping().await {
            Ok(()) => true,
            Err(e) => {
                error!("❌ 数据库健康检查失败: {}", e);
                false
            }
        }
    }
}
