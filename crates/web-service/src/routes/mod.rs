//! 路由入口
//!
//! 提供 [`create_app_router`] 函数，导出当前App的所有路由。
//!
//! 用户可以在导出路由时传入共享数据 shared_state，这样所有路由函数都可以访问。

use crate::routes::health::__path_health;
use crate::routes::health::health;
use crate::routes::proposals::__path_create_proposal;
use crate::routes::proposals::__path_delete_proposal;
use crate::routes::proposals::__path_get_proposal;
use crate::routes::proposals::__path_list_proposals;
use crate::routes::proposals::__path_regenerate_proposal;
use crate::routes::proposals::__path_update_proposal;
use crate::routes::proposals::{
    create_proposal, delete_proposal, get_proposal, list_proposals, regenerate_proposal, update_proposal,
};
use crate::AppState;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use utoipa_scalar::{Scalar, Servable};

pub mod health;
pub mod proposals;

/// 提案路由
///
/// ## **❗️注意事项：**
///
/// 由于 [`routes!`] 宏限制，在同一个宏里面不能同时定义多个相同类型的http接口，
/// 同一路径下不同方法的接口可以放在一起，不同路径需要拆开定义：
///
/// ```rust,ignore
/// routes!(list, create)
/// .routes!(get, update, delete)
/// ```
fn proposal_routers(state: AppState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(list_proposals, create_proposal))
        .routes(routes!(get_proposal, update_proposal, delete_proposal))
        .routes(routes!(regenerate_proposal))
        .with_state(state)
}

/// 创建当前App的路由
///
/// 完成以下功能：
/// - 生成OpenAPI文档
/// - 生成App路由
/// - 使用Scalar作为最终在线文档格式
///
/// 由于使用了 `utoipa` 库来自动化生成`openapi`文档，因此我们没有使用原生的 [`Router`]，而是使用了
/// [`OpenApiRouter`] 。
pub fn create_app_router(shared_state: AppState) -> Router {
    // 当前项目的OpenAPI声明
    #[derive(OpenApi)]
    #[openapi(
        tags(
            (name = "proposals", description = r#"
商业提案管理：

- 提案增删改查
- 调用生成服务生成PDF
- 修改内容后重新生成
            "#),
            (name = "health", description = "服务健康检查"),
        ),
    )]
    struct ApiDoc;

    // 最终拿到的变量：
    // - router: Axum的Router，实际的路由对象
    // - api: utoipa的OpenApi，生成的OpenAPI对象
    // 嵌套路由中的 "/" 只匹配 `/proposta`，带斜杠的 `/proposta/` 单独注册（不进入文档）
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(health))
        .route("/proposta/", get(list_proposals).post(create_proposal))
        .with_state(shared_state.clone())
        .nest("/proposta", proposal_routers(shared_state))
        .split_for_parts();

    // 合并文档路由，用户可通过 /docs 访问文档网页地址
    router
        .merge(Scalar::with_url("/docs", api))
        .layer(TraceLayer::new_for_http())
}
