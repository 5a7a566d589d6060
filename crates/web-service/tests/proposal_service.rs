//! 提案服务编排测试

mod common;

use common::{create_body, regenerate_body, TestApp};
use database::ProposalStatus;
use serde_json::json;
use uuid::Uuid;
use web_service::clients::GenerationError;
use web_service::models::proposals::{ProposalCreate, ProposalPatch, ProposalRegenerate};
use web_service::services::{ProposalServiceTrait, ServiceError};

fn create_input() -> ProposalCreate {
    serde_json::from_value(create_body()).unwrap()
}

fn regenerate_input() -> ProposalRegenerate {
    serde_json::from_value(regenerate_body()).unwrap()
}

fn patch(value: serde_json::Value) -> ProposalPatch {
    serde_json::from_value(value).unwrap()
}

#[tokio::test]
async fn create_renders_pdf_and_records_path() {
    let app = TestApp::spawn().await;
    app.mock_generator(200, b"PDF-DATA").await;

    let record = app.service.create_proposal(create_input()).await.unwrap();

    let expected = app.expected_artifact(record.id);
    assert_eq!(record.status, ProposalStatus::Draft);
    assert_eq!(record.final_artifact_path, Some(expected.to_string_lossy().into_owned()));
    assert_eq!(std::fs::read(&expected).unwrap(), b"PDF-DATA");
    assert_eq!(app.repository.get(record.id), Some(record));
}

#[tokio::test]
async fn create_always_starts_as_draft() {
    let app = TestApp::spawn().await;
    app.mock_generator(200, b"PDF-DATA").await;

    let mut input = create_input();
    input.status = "approved".to_string();

    let record = app.service.create_proposal(input).await.unwrap();
    assert_eq!(record.status, ProposalStatus::Draft);
}

#[tokio::test]
async fn create_keeps_row_when_generator_fails() {
    let app = TestApp::spawn().await;
    app.mock_generator(503, b"modelo indisponivel").await;

    let err = app.service.create_proposal(create_input()).await.unwrap_err();
    assert!(matches!(err, ServiceError::Generation(GenerationError::Rejected { status: 503, .. })));

    // 已写入的记录保留，等待重新生成
    let records = app.service.list_proposals().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, ProposalStatus::Draft);
    assert_eq!(records[0].final_artifact_path, None);
    assert!(!app.expected_artifact(records[0].id).exists());
}

#[tokio::test]
async fn create_with_unreachable_generator_is_transport_failure() {
    let app = TestApp::with_unreachable_generator().await;

    let err = app.service.create_proposal(create_input()).await.unwrap_err();

    assert!(matches!(err, ServiceError::Generation(GenerationError::Transport(_))));
    assert_eq!(app.repository.len(), 1);
}

#[tokio::test]
async fn create_with_invalid_color_touches_nothing() {
    let app = TestApp::spawn().await;
    app.mock_generator(200, b"PDF-DATA").await;

    let mut input = create_input();
    input.colors = vec!["#fff".to_string(), "blue".to_string()];

    let err = app.service.create_proposal(input).await.unwrap_err();

    assert!(matches!(err, ServiceError::Validation(_)));
    assert_eq!(app.repository.len(), 0);
    assert_eq!(app.generator_calls().await, 0);
}

#[tokio::test]
async fn create_reports_persistence_failure_after_render() {
    let app = TestApp::spawn().await;
    app.mock_generator(200, b"PDF-DATA").await;
    app.repository.fail_updates();

    let err = app.service.create_proposal(create_input()).await.unwrap_err();

    assert!(matches!(err, ServiceError::Persistence(_)));
    let records = app.service.list_proposals().await.unwrap();
    assert_eq!(records[0].final_artifact_path, None);
}

#[tokio::test]
async fn list_is_newest_first() {
    let app = TestApp::spawn().await;
    app.mock_generator(200, b"PDF-DATA").await;

    let first = app.service.create_proposal(create_input()).await.unwrap();
    let second = app.service.create_proposal(create_input()).await.unwrap();

    let ids: Vec<Uuid> = app.service.list_proposals().await.unwrap().into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[tokio::test]
async fn update_status_only() {
    let app = TestApp::spawn().await;
    app.mock_generator(200, b"PDF-DATA").await;
    let created = app.service.create_proposal(create_input()).await.unwrap();

    let updated = app
        .service
        .update_proposal(&created.id.to_string(), patch(json!({ "status": "approved" })))
        .await
        .unwrap();

    assert_eq!(updated.status, ProposalStatus::Approved);
    assert_eq!(updated.title, created.title);
    assert_eq!(updated.final_artifact_path, created.final_artifact_path);
    assert!(updated.last_update >= created.last_update);
}

#[tokio::test]
async fn update_accepts_legacy_status_values() {
    let app = TestApp::spawn().await;
    app.mock_generator(200, b"PDF-DATA").await;
    let created = app.service.create_proposal(create_input()).await.unwrap();

    let updated = app
        .service
        .update_proposal(&created.id.to_string(), patch(json!({ "status": "enviado" })))
        .await
        .unwrap();

    assert_eq!(updated.status, ProposalStatus::Sent);
}

#[tokio::test]
async fn update_rejects_unknown_status() {
    let app = TestApp::spawn().await;
    app.mock_generator(200, b"PDF-DATA").await;
    let created = app.service.create_proposal(create_input()).await.unwrap();

    let err = app
        .service
        .update_proposal(&created.id.to_string(), patch(json!({ "status": "invalid-value" })))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::InvalidStatus(_)));
    assert_eq!(app.repository.get(created.id), Some(created));
}

#[tokio::test]
async fn update_rejects_short_title() {
    let app = TestApp::spawn().await;
    app.mock_generator(200, b"PDF-DATA").await;
    let created = app.service.create_proposal(create_input()).await.unwrap();

    let err = app
        .service
        .update_proposal(&created.id.to_string(), patch(json!({ "titulo": "ab" })))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn empty_update_only_touches_last_update() {
    let app = TestApp::spawn().await;
    app.mock_generator(200, b"PDF-DATA").await;
    let created = app.service.create_proposal(create_input()).await.unwrap();

    let updated = app
        .service
        .update_proposal(&created.id.to_string(), patch(json!({})))
        .await
        .unwrap();

    assert_eq!(updated.title, created.title);
    assert_eq!(updated.status, created.status);
    assert_eq!(updated.final_artifact_path, created.final_artifact_path);
    assert_eq!(updated.created_at, created.created_at);
}

#[tokio::test]
async fn update_missing_proposal_is_not_found() {
    let app = TestApp::spawn().await;
    let id = Uuid::new_v4();

    let err = app
        .service
        .update_proposal(&id.to_string(), patch(json!({ "titulo": "Novo titulo" })))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::NotFound(missing) if missing == id));
}

#[tokio::test]
async fn regenerate_overwrites_content_and_artifact() {
    let app = TestApp::spawn().await;
    app.mock_generator(200, b"PDF-DATA").await;
    let created = app.service.create_proposal(create_input()).await.unwrap();
    let id = created.id.to_string();
    app.service
        .update_proposal(&id, patch(json!({ "status": "sent" })))
        .await
        .unwrap();

    app.server.reset().await;
    app.mock_generator(200, b"PDF-DATA-V2").await;

    let regenerated = app.service.regenerate_proposal(&id, regenerate_input()).await.unwrap();

    assert_eq!(regenerated.company_name, "Acme Ltda");
    assert_eq!(regenerated.colors, vec!["#000".to_string()]);
    // logo为空时保留原值
    assert_eq!(regenerated.logo, created.logo);
    assert_eq!(regenerated.client_logo.as_deref(), Some("https://cdn.example.com/client.png"));
    // 状态不受重新生成影响
    assert_eq!(regenerated.status, ProposalStatus::Sent);
    assert_eq!(regenerated.final_artifact_path, created.final_artifact_path);
    assert_eq!(std::fs::read(app.expected_artifact(created.id)).unwrap(), b"PDF-DATA-V2");
}

#[tokio::test]
async fn regenerate_recovers_failed_create() {
    let app = TestApp::spawn().await;
    app.mock_generator(500, b"").await;
    app.service.create_proposal(create_input()).await.unwrap_err();
    let stranded = app.service.list_proposals().await.unwrap().remove(0);

    app.server.reset().await;
    app.mock_generator(200, b"PDF-DATA").await;

    let recovered = app
        .service
        .regenerate_proposal(&stranded.id.to_string(), regenerate_input())
        .await
        .unwrap();

    assert!(recovered.final_artifact_path.is_some());
    assert_eq!(recovered.status, ProposalStatus::Draft);
}

#[tokio::test]
async fn regenerate_with_invalid_input_touches_nothing() {
    let app = TestApp::spawn().await;
    app.mock_generator(200, b"PDF-DATA").await;
    let created = app.service.create_proposal(create_input()).await.unwrap();
    let id = created.id.to_string();

    let invalid = [
        json!({ "cores": ["nope"] }),
        json!({ "cores": [] }),
        json!({ "prompt": "curto demais" }),
        json!({ "logo": "not a url" }),
        json!({ "logoCliente": "ftp//broken" }),
        json!({ "nomeEmpresa": "" }),
    ];

    for overrides in invalid {
        let mut body = regenerate_body();
        for (key, value) in overrides.as_object().unwrap() {
            body[key] = value.clone();
        }
        let input: ProposalRegenerate = serde_json::from_value(body).unwrap();

        let err = app.service.regenerate_proposal(&id, input).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)), "{overrides} should be rejected");
    }

    assert_eq!(app.repository.get(created.id), Some(created));
    // 只有创建时调用过一次
    assert_eq!(app.generator_calls().await, 1);
}

#[tokio::test]
async fn regenerate_keeps_content_when_generator_fails() {
    let app = TestApp::spawn().await;
    app.mock_generator(200, b"PDF-DATA").await;
    let created = app.service.create_proposal(create_input()).await.unwrap();

    app.server.reset().await;
    app.mock_generator(503, b"modelo indisponivel").await;

    let err = app
        .service
        .regenerate_proposal(&created.id.to_string(), regenerate_input())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Generation(GenerationError::Rejected { status: 503, .. })));

    // 新内容已写入，状态和已有PDF不受影响
    let stored = app.repository.get(created.id).unwrap();
    assert_eq!(stored.company_name, "Acme Ltda");
    assert_eq!(stored.status, ProposalStatus::Draft);
    assert_eq!(stored.final_artifact_path, created.final_artifact_path);
    assert_eq!(std::fs::read(app.expected_artifact(created.id)).unwrap(), b"PDF-DATA");
}

#[tokio::test]
async fn regenerate_missing_proposal_skips_generator() {
    let app = TestApp::spawn().await;
    app.mock_generator(200, b"PDF-DATA").await;

    let err = app
        .service
        .regenerate_proposal(&Uuid::new_v4().to_string(), regenerate_input())
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::NotFound(_)));
    assert_eq!(app.generator_calls().await, 0);
}

#[tokio::test]
async fn delete_is_final() {
    let app = TestApp::spawn().await;
    app.mock_generator(200, b"PDF-DATA").await;
    let created = app.service.create_proposal(create_input()).await.unwrap();
    let id = created.id.to_string();

    app.service.delete_proposal(&id).await.unwrap();

    assert!(matches!(app.service.get_proposal(&id).await, Err(ServiceError::NotFound(_))));
    assert!(matches!(app.service.delete_proposal(&id).await, Err(ServiceError::NotFound(_))));
}

#[tokio::test]
async fn malformed_ids_are_rejected() {
    let app = TestApp::spawn().await;

    for id in ["", "123", "not-a-uuid"] {
        assert!(matches!(app.service.get_proposal(id).await, Err(ServiceError::InvalidId(_))));
        assert!(matches!(app.service.delete_proposal(id).await, Err(ServiceError::InvalidId(_))));
        assert!(matches!(
            app.service.update_proposal(id, patch(json!({}))).await,
            Err(ServiceError::InvalidId(_))
        ));
        assert!(matches!(
            app.service.regenerate_proposal(id, regenerate_input()).await,
            Err(ServiceError::InvalidId(_))
        ));
    }
}
