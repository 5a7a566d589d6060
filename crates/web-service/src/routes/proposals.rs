//! 提案相关接口
//!
//! 所有接口都挂载在 `/proposta` 下。handler只负责提取参数和转换返回值，
//! 校验和编排都在服务层完成。

use crate::models::common::ErrorReply;
use crate::models::err::AppError;
use crate::models::proposals::{ProposalCreate, ProposalInfo, ProposalPatch, ProposalRegenerate};
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::debug;

/// 创建提案
///
/// 保存提案后立即调用生成服务生成PDF，成功时返回带有 `arquivoFinal` 的提案。
///
/// ## 失败时的数据状态
///
/// 提案写入数据库之后，生成服务或文件保存失败不会删除已写入的记录：
/// 记录保持 `draft` 状态，`arquivoFinal` 为null，可以调用重新生成接口恢复。
#[utoipa::path(post,
    path = "/",
    tag = "proposals",
    request_body = ProposalCreate,
    responses(
        (status = 201, description = "Proposal created and rendered", body = ProposalInfo),
        (status = 400, description = "Invalid input", body = ErrorReply),
        (status = 502, description = "Generation service failed", body = ErrorReply),
        (status = 500, description = "Persistence or storage failure", body = ErrorReply),
    ),
)]
pub async fn create_proposal(
    State(state): State<AppState>,
    body: Result<Json<ProposalCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<ProposalInfo>), AppError> {
    let Json(input) = body?;
    debug!("📝 创建提案 {:#?}", input);

    let record = state.proposal_service.create_proposal(input).await?;

    Ok((StatusCode::CREATED, Json(record.into())))
}

/// 查询全部提案
///
/// 按创建时间倒序返回，没有数据时返回空数组
#[utoipa::path(get,
    path = "/",
    tag = "proposals",
    responses(
        (status = 200, description = "All proposals", body = Vec<ProposalInfo>),
        (status = 500, description = "Persistence failure", body = ErrorReply),
    ),
)]
pub async fn list_proposals(State(state): State<AppState>) -> Result<Json<Vec<ProposalInfo>>, AppError> {
    let records = state.proposal_service.list_proposals().await?;

    Ok(Json(records.into_iter().map(Into::into).collect()))
}

/// 查询指定提案
#[utoipa::path(get,
    path = "/{id}",
    tag = "proposals",
    params(("id" = String, Path, description = "Proposal UUID")),
    responses(
        (status = 200, description = "Proposal", body = ProposalInfo),
        (status = 400, description = "Malformed id", body = ErrorReply),
        (status = 404, description = "Proposal not found", body = ErrorReply),
    ),
)]
pub async fn get_proposal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProposalInfo>, AppError> {
    debug!("🔍 查询提案 {}", id);

    let record = state.proposal_service.get_proposal(&id).await?;

    Ok(Json(record.into()))
}

/// 部分更新提案
///
/// 只修改请求中出现的字段（`titulo`、`status`、`arquivoFinal`），
/// 没有出现任何字段时只刷新 `lastUpdate`。
#[utoipa::path(patch,
    path = "/{id}",
    tag = "proposals",
    params(("id" = String, Path, description = "Proposal UUID")),
    request_body = ProposalPatch,
    responses(
        (status = 200, description = "Updated proposal", body = ProposalInfo),
        (status = 400, description = "Invalid input", body = ErrorReply),
        (status = 404, description = "Proposal not found", body = ErrorReply),
    ),
)]
pub async fn update_proposal(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ProposalPatch>, JsonRejection>,
) -> Result<Json<ProposalInfo>, AppError> {
    let Json(update) = body?;
    debug!("🔄 更新提案 {} {:#?}", id, update);

    let record = state.proposal_service.update_proposal(&id, update).await?;

    Ok(Json(record.into()))
}

/// 删除提案
///
/// 已生成的PDF文件不会被删除
#[utoipa::path(delete,
    path = "/{id}",
    tag = "proposals",
    params(("id" = String, Path, description = "Proposal UUID")),
    responses(
        (status = 200, description = "Proposal deleted"),
        (status = 400, description = "Malformed id", body = ErrorReply),
        (status = 404, description = "Proposal not found", body = ErrorReply),
    ),
)]
pub async fn delete_proposal(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode, AppError> {
    state.proposal_service.delete_proposal(&id).await?;

    Ok(StatusCode::OK)
}

/// 重新生成提案
///
/// 覆盖提案内容后重新生成PDF，`logo`/`logoCliente` 为空时保留原值，状态不变。
#[utoipa::path(post,
    path = "/{id}/regerar",
    tag = "proposals",
    params(("id" = String, Path, description = "Proposal UUID")),
    request_body = ProposalRegenerate,
    responses(
        (status = 201, description = "Proposal regenerated", body = ProposalInfo),
        (status = 400, description = "Invalid input", body = ErrorReply),
        (status = 404, description = "Proposal not found", body = ErrorReply),
        (status = 502, description = "Generation service failed", body = ErrorReply),
    ),
)]
pub async fn regenerate_proposal(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ProposalRegenerate>, JsonRejection>,
) -> Result<(StatusCode, Json<ProposalInfo>), AppError> {
    let Json(input) = body?;
    debug!("🔄 重新生成提案 {}", id);

    let record = state.proposal_service.regenerate_proposal(&id, input).await?;

    Ok((StatusCode::CREATED, Json(record.into())))
}
