//! 健康检查接口

use crate::models::common::HealthReply;
use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

/// 健康检查
///
/// 数据库不可用时返回503
#[utoipa::path(get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service healthy", body = HealthReply),
        (status = 503, description = "Database unavailable", body = HealthReply),
    ),
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthReply>) {
    let database = state.proposal_service.is_healthy().await;
    let status = if database { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };

    let reply = HealthReply {
        status: if database { "ok" } else { "degraded" }.to_string(),
        database,
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (status, Json(reply))
}
