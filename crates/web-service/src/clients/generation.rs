//! 文档生成服务客户端
//!
//! 生成服务是一个独立的HTTP服务（内部调用大模型生成HTML再转换为PDF），
//! 这里只关心它的接口约定：
//!
//! - `POST {base_url}/gerarproposta/pdf_dynamic`，请求体为提案json
//! - 200 时响应体就是PDF的原始字节
//! - 其他状态码都视为失败，响应体只用于排查问题
//!
//! 本层不做重试。

use crate::models::proposals::ProposalInfo;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use shared_lib::GenerationConfig;
use thiserror::Error;
use tracing::{debug, warn};

/// 生成接口路径
pub const GENERATION_PATH: &str = "/gerarproposta/pdf_dynamic";

/// 生成服务错误
#[derive(Debug, Error)]
pub enum GenerationError {
    /// 网络层失败：超时、连接被拒绝、DNS解析失败、读取响应体失败
    #[error("generation service unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// 生成服务返回了非200状态码
    #[error("generation service returned HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    /// 提案序列化失败
    #[error("failed to serialize proposal: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// 文档生成客户端trait
///
/// 服务层只依赖这个trait，测试时可以替换
#[async_trait::async_trait]
pub trait GenerationClientTrait: Send + Sync + 'static {
    /// 根据提案生成PDF，返回原始字节
    async fn generate(&self, proposal: &ProposalInfo) -> Result<Vec<u8>, GenerationError>;
}

/// 基于 [`reqwest`] 的生成服务客户端
#[derive(Debug, Clone)]
pub struct HttpGenerationClient {
    client: Client,
    endpoint: String,
}

impl HttpGenerationClient {
    /// 创建客户端
    ///
    /// 超时时间来自配置，超时会被当作 [`GenerationError::Transport`]
    pub fn new(config: &GenerationConfig) -> Result<Self, GenerationError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            endpoint: format!("{}{GENERATION_PATH}", config.base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl GenerationClientTrait for HttpGenerationClient {
    async fn generate(&self, proposal: &ProposalInfo) -> Result<Vec<u8>, GenerationError> {
        let body = serde_json::to_vec(proposal)?;
        debug!(proposal_id = %proposal.id, endpoint = %self.endpoint, "📤 请求生成服务");

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .inspect_err(|e| warn!(proposal_id = %proposal.id, timeout = e.is_timeout(), "⚠️ 生成服务请求失败: {}", e))?;

        let status = response.status();
        if status != StatusCode::OK {
            // 读取失败时也要返回状态码，响应体只是辅助信息
            let body = response.text().await.unwrap_or_default();
            warn!(proposal_id = %proposal.id, status = status.as_u16(), "⚠️ 生成服务返回错误: {}", body);
            return Err(GenerationError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        debug!(proposal_id = %proposal.id, size = bytes.len(), "📥 生成服务返回PDF");

        Ok(bytes.to_vec())
    }
}
