//! Web服务模块
//!
//! 提供提案管理的 HTTP API 接口和文档服务

use color_eyre::Result;
use database::ProposalRepository;
use shared_lib::AppConfig;
use sqlx::{Pool, Postgres};
use std::sync::Arc;
use tokio::sync::watch::Receiver;
use tracing::{info, warn};

pub mod clients;
pub mod models;
pub mod routes;
pub mod services;
pub mod storage;

use clients::HttpGenerationClient;
use services::{ProposalService, ProposalServiceTrait};
use storage::LocalArtifactWriter;

/// 应用共享状态
///
/// 服务以trait对象的形式保存，测试时可以替换为内存实现
#[derive(Clone)]
pub struct AppState {
    pub proposal_service: Arc<dyn ProposalServiceTrait>,
}

impl AppState {
    pub fn new(proposal_service: Arc<dyn ProposalServiceTrait>) -> Self {
        Self { proposal_service }
    }
}

/// 具体的提案服务类型
pub type ConcreteProposalService = ProposalService<ProposalRepository, HttpGenerationClient, LocalArtifactWriter>;

/// 根据配置组装生产环境使用的共享状态
pub fn build_app_state(config: &AppConfig, pool: Pool<Postgres>) -> Result<AppState> {
    let generator = HttpGenerationClient::new(&config.generation)?;
    info!(endpoint = %generator.endpoint(), timeout = ?config.generation.timeout, "🔗 文档生成服务");

    let artifacts = LocalArtifactWriter::new(&config.artifact_root);
    let service: ConcreteProposalService = ProposalService::new(ProposalRepository::new(pool), generator, artifacts);

    Ok(AppState::new(Arc::new(service)))
}

/// 启动 Web 服务
///
/// 收到 `shutdown_rx` 的通知后停止接收新连接，等待进行中的请求处理完成
pub async fn start_web_service(
    config: Arc<AppConfig>,
    pool: Pool<Postgres>,
    mut shutdown_rx: Receiver<bool>,
) -> Result<()> {
    let shared_state = build_app_state(&config, pool)?;

    let router = routes::create_app_router(shared_state);

    let bind_addr = format!("0.0.0.0:{}", config.port);
    info!("🚀 启动 Web Service 在 {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move {
            if shutdown_rx.changed().await.is_err() {
                warn!("⚠️ 关闭信号通道已断开");
            }
            info!("🛑 Web Service 正在关闭...");
        })
        .await?;

    Ok(())
}
