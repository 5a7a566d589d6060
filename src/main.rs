//! 提案管理后端入口
//!
//! 启动顺序：加载配置 → 初始化日志 → 连接数据库并迁移 → 启动Web服务。
//! 收到 SIGINT/SIGTERM 后通过 watch 通道通知Web服务优雅退出。

use color_eyre::Result;
use shared_lib::{init_tracing, AppConfig};
use tokio::sync::watch;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let config = AppConfig::load()?;
    // 持有到main结束，保证文件日志全部落盘
    let _log_guard = init_tracing(&config.log)?;

    info!("🔧 配置加载完成，端口: {}，文件目录: {}", config.port, config.artifact_root.display());

    let pool = database::initialize_database(&config).await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        if shutdown_tx.send(true).is_err() {
            error!("❌ 发送关闭信号失败");
        }
    });

    let result = web_service::start_web_service(config, pool.clone(), shutdown_rx).await;

    pool.close().await;
    info!("👋 服务已退出");

    result
}

/// 等待 Ctrl-C 或 SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("❌ 监听 Ctrl-C 失败: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("❌ 监听 SIGTERM 失败: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("🛑 收到 Ctrl-C，开始关闭"),
        () = terminate => info!("🛑 收到 SIGTERM，开始关闭"),
    }
}
