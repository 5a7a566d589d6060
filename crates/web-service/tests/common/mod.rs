//! 集成测试公共代码
//!
//! 用内存仓库代替PostgreSQL，用wiremock模拟生成服务，PDF写入临时目录。

#![allow(dead_code)]

use chrono::Utc;
use database::{
    DatabaseError, DatabaseResult, NewProposal, ProposalRecord, ProposalRegeneration, ProposalRepositoryTrait,
    ProposalUpdate,
};
use serde_json::{json, Value};
use shared_lib::GenerationConfig;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use uuid::Uuid;
use web_service::clients::generation::GENERATION_PATH;
use web_service::clients::HttpGenerationClient;
use web_service::services::ProposalService;
use web_service::storage::LocalArtifactWriter;
use web_service::AppState;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// 内存中的提案仓库
///
/// 克隆后共享同一份数据，测试可以在服务持有仓库的同时检查数据
#[derive(Debug, Clone, Default)]
pub struct InMemoryProposalRepository {
    rows: Arc<Mutex<HashMap<Uuid, ProposalRecord>>>,
    fail_updates: Arc<AtomicBool>,
}

impl InMemoryProposalRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 之后的所有更新操作都返回数据库错误
    pub fn fail_updates(&self) {
        self.fail_updates.store(true, Ordering::SeqCst);
    }

    pub fn get(&self, id: Uuid) -> Option<ProposalRecord> {
        self.rows.lock().unwrap().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn insert(&self, record: ProposalRecord) {
        self.rows.lock().unwrap().insert(record.id, record);
    }

    fn check_update(&self) -> DatabaseResult<()> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(DatabaseError::connection("connection reset by peer"));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ProposalRepositoryTrait for InMemoryProposalRepository {
    async fn create(&self, proposal: NewProposal) -> DatabaseResult<ProposalRecord> {
        let now = Utc::now();
        let record = ProposalRecord {
            id: proposal.id,
            title: proposal.title,
            company_name: proposal.company_name,
            client_name: proposal.client_name,
            prompt: proposal.prompt,
            colors: proposal.colors,
            logo: proposal.logo,
            client_logo: proposal.client_logo,
            status: proposal.status,
            final_artifact_path: None,
            created_at: now,
            last_update: now,
        };
        self.insert(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<ProposalRecord> {
        self.get(id).ok_or(DatabaseError::NotFound(id))
    }

    async fn list_all(&self) -> DatabaseResult<Vec<ProposalRecord>> {
        let mut records: Vec<_> = self.rows.lock().unwrap().values().cloned().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn apply_partial_update(&self, id: Uuid, update: ProposalUpdate) -> DatabaseResult<ProposalRecord> {
        self.check_update()?;

        let mut rows = self.rows.lock().unwrap();
        let record = rows.get_mut(&id).ok_or(DatabaseError::NotFound(id))?;
        if let Some(title) = update.title {
            record.title = title;
        }
        if let Some(status) = update.status {
            record.status = status;
        }
        if let Some(path) = update.final_artifact_path {
            record.final_artifact_path = Some(path);
        }
        record.last_update = Utc::now();
        Ok(record.clone())
    }

    async fn apply_regeneration(&self, id: Uuid, regeneration: ProposalRegeneration) -> DatabaseResult<ProposalRecord> {
        self.check_update()?;

        let mut rows = self.rows.lock().unwrap();
        let record = rows.get_mut(&id).ok_or(DatabaseError::NotFound(id))?;
        if let Some(logo) = regeneration.logo_override() {
            record.logo = Some(logo.to_string());
        }
        if let Some(logo) = regeneration.client_logo_override() {
            record.client_logo = Some(logo.to_string());
        }
        record.company_name = regeneration.company_name;
        record.client_name = regeneration.client_name;
        record.prompt = regeneration.prompt;
        record.colors = regeneration.colors;
        record.last_update = Utc::now();
        Ok(record.clone())
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<()> {
        self.rows
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(DatabaseError::NotFound(id))
    }

    async fn ping(&self) -> DatabaseResult<()> {
        Ok(())
    }
}

pub type TestService = ProposalService<InMemoryProposalRepository, HttpGenerationClient, LocalArtifactWriter>;

/// 测试环境
pub struct TestApp {
    pub repository: InMemoryProposalRepository,
    pub server: MockServer,
    pub artifact_root: TempDir,
    pub service: Arc<TestService>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let server = MockServer::start().await;
        Self::with_generation_url(server, None)
    }

    /// 生成服务地址指向一个不存在的端口
    pub async fn with_unreachable_generator() -> Self {
        let server = MockServer::start().await;
        Self::with_generation_url(server, Some("http://127.0.0.1:1".to_string()))
    }

    fn with_generation_url(server: MockServer, base_url: Option<String>) -> Self {
        let repository = InMemoryProposalRepository::new();
        let artifact_root = TempDir::new().unwrap();

        let generator = HttpGenerationClient::new(&GenerationConfig {
            base_url: base_url.unwrap_or_else(|| server.uri()),
            timeout: Duration::from_secs(5),
        })
        .unwrap();
        let artifacts = LocalArtifactWriter::new(artifact_root.path());
        let service = Arc::new(ProposalService::new(repository.clone(), generator, artifacts));

        Self {
            repository,
            server,
            artifact_root,
            service,
        }
    }

    pub fn state(&self) -> AppState {
        AppState::new(self.service.clone())
    }

    /// 生成服务返回指定状态码和响应体
    pub async fn mock_generator(&self, status: u16, body: &[u8]) {
        Mock::given(method("POST"))
            .and(path(GENERATION_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_bytes(body.to_vec()))
            .mount(&self.server)
            .await;
    }

    /// 断言生成服务收到的请求数量
    pub async fn generator_calls(&self) -> usize {
        self.server.received_requests().await.map_or(0, |r| r.len())
    }

    pub fn expected_artifact(&self, id: Uuid) -> std::path::PathBuf {
        self.artifact_root
            .path()
            .join("proposals")
            .join(format!("proposal_{id}.pdf"))
    }
}

/// 合法的创建请求
pub fn create_body() -> Value {
    json!({
        "titulo": "Site institucional",
        "nomeEmpresa": "Acme",
        "nomeCliente": "Maria",
        "prompt": "Proposta para desenvolvimento de um site novo",
        "cores": ["#fff", "#123456"],
        "logo": "https://cdn.example.com/logo.png",
        "status": "draft"
    })
}

/// 合法的重新生成请求
pub fn regenerate_body() -> Value {
    json!({
        "nomeEmpresa": "Acme Ltda",
        "nomeCliente": "João",
        "prompt": "Nova versão da proposta com escopo revisado",
        "cores": ["#000"],
        "logo": "",
        "logoCliente": "https://cdn.example.com/client.png"
    })
}
