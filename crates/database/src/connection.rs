use crate::{DatabaseError, DatabaseResult};
use shared_lib::models::config::AppConfig;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::time::Duration;
use tracing::{info, warn};

/// 数据库连接池
pub type DatabasePool = Pool<Postgres>;

/// 两次连接尝试之间的等待时间
const CONNECT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// 创建数据库连接池并执行迁移（一站式函数）
///
/// 容器编排时数据库通常比服务启动得慢，因此连接失败会按照
/// [`AppConfig::db_connect_attempts`] 重试，每次间隔5秒。
pub async fn initialize_database(config: &AppConfig) -> DatabaseResult<DatabasePool> {
    let attempts = config.db_connect_attempts.max(1);
    let mut attempt = 1;

    let pool = loop {
        match connect(&config.postgresql_conn_str).await {
            Ok(pool) => break pool,
            Err(e) if attempt < attempts => {
                warn!("⚠️ 第{}/{}次连接数据库失败: {}，{}秒后重试", attempt, attempts, e, CONNECT_RETRY_DELAY.as_secs());
                tokio::time::sleep(CONNECT_RETRY_DELAY).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    };

    info!("🗄️ 数据库连接池创建成功");

    // 执行数据库迁移
    info!("🔄 开始执行数据库迁移...");

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .map_err(|e| DatabaseError::migration(format!("数据库迁移失败: {e}")))?;

    info!("✅ 数据库迁移完成");

    Ok(pool)
}

async fn connect(conn_str: &str) -> DatabaseResult<DatabasePool> {
    // 注意：pool已经是一个智能指针了，所以可以使用.clone()安全跨线程使用
    let pool = PgPoolOptions::new()
        .min_connections(2)
        .max_connections(20)
        .acquire_timeout(Duration::from_secs(3))
        // 1小时空闲则释放
        .idle_timeout(Duration::from_secs(3600))
        // 6小时强制释放，避免长时间链接导致数据库问题
        .max_lifetime(Duration::from_secs(3600 * 6))
        .test_before_acquire(true)
        .connect(conn_str)
        .await
        .map_err(|e| DatabaseError::connection(format!("连接PostgreSQL数据库失败: {e}")))?;

    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .map_err(|e| DatabaseError::connection(format!("PostgreSQL ping失败: {e}")))?;

    Ok(pool)
}
