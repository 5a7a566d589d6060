use color_eyre::eyre::{eyre, Context};
use color_eyre::{Help, Result};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// 文档生成服务配置
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// 生成服务的基础地址，例如 `http://ia:8000`
    ///
    /// 通过环境变量 `GENERATION_URL` 设置（兼容旧的 `IA_URL`）
    pub base_url: String,

    /// 单次生成请求的超时时间
    ///
    /// 生成服务内部会调用大模型，耗时较长，默认120秒。
    /// 可通过环境变量 `GENERATION_TIMEOUT_SECS` 来调整
    pub timeout: Duration,
}

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// 结构化json日志，线上默认
    Json,
    /// 本地开发使用的彩色输出
    Pretty,
}

/// 日志配置
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// 日志级别，`LOG_LEVEL`，默认 `info`
    pub level: String,

    /// 日志格式，`LOG_FORMAT`，默认 `json`
    pub format: LogFormat,

    /// 日志输出位置，`LOG_OUTPUT`，默认 `stdout`
    pub output: LogOutput,
}

/// 日志输出位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogOutput {
    Stdout,
    Stderr,
    /// 追加写入指定文件
    File(PathBuf),
}

impl LogOutput {
    /// `stdout`/`stderr`（不区分大小写）以外的值都视为文件路径，空值为 `stdout`
    fn parse(value: &str) -> Self {
        let value = value.trim();
        match value.to_lowercase().as_str() {
            "" | "stdout" => LogOutput::Stdout,
            "stderr" => LogOutput::Stderr,
            _ => LogOutput::File(PathBuf::from(value)),
        }
    }
}

/// 程序配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// postgresql数据库链接字符串
    pub postgresql_conn_str: String,

    /// 启动时连接数据库的最大尝试次数
    ///
    /// 容器环境下数据库往往比服务启动得慢，可通过 `DB_CONNECT_ATTEMPTS` 调整
    pub db_connect_attempts: u32,

    /// 文档生成服务配置
    pub generation: GenerationConfig,

    /// 生成的PDF文件存放根目录，`ARTIFACT_ROOT`，默认 `uploads`
    pub artifact_root: PathBuf,

    /// HTTP监听端口，`PORT`，默认8080
    pub port: u16,

    /// 日志配置
    pub log: LogConfig,
}

impl AppConfig {
    /// 从环境变量加载配置
    pub fn load() -> Result<Arc<AppConfig>> {
        // 加载.env文件中的数据注入到环境变量中，方便本地测试
        // 线上环境部署时会直接使用环境变量，不需要.env文件
        dotenvy::dotenv().ok();

        let config = Self::from_lookup(|key| std::env::var(key).ok())?;
        Ok(Arc::new(config))
    }

    /// 根据给定的查找函数构建配置
    ///
    /// 与 [`AppConfig::load`] 分离，方便在测试中传入固定的变量表
    pub fn from_lookup<F>(lookup: F) -> Result<AppConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        // 读取数据库地址信息（仅支持postgresql）
        let db_url = lookup("DATABASE_URL")
            .ok_or_else(|| eyre!("Can not load DATABASE_URL in environment"))
            .suggestion("设置 DATABASE_URL 环境变量")?;

        let generation_url = lookup("GENERATION_URL")
            .or_else(|| lookup("IA_URL"))
            .ok_or_else(|| eyre!("Can not load GENERATION_URL in environment"))
            .suggestion("设置 GENERATION_URL（或 IA_URL）环境变量")?;

        let port: u16 = parse_or(&lookup, "PORT", 8080)?;

        let timeout_secs: u64 = parse_or(&lookup, "GENERATION_TIMEOUT_SECS", 120)?;
        if timeout_secs == 0 {
            return Err(eyre!("GENERATION_TIMEOUT_SECS must be greater than 0"))
                .suggestion("生成服务需要较长时间，建议保持默认的120秒");
        }

        let db_connect_attempts: u32 = parse_or(&lookup, "DB_CONNECT_ATTEMPTS", 5)?;
        if db_connect_attempts == 0 {
            return Err(eyre!("DB_CONNECT_ATTEMPTS must be greater than 0")).suggestion("至少需要尝试连接一次");
        }

        let format = match lookup("LOG_FORMAT").as_deref().map(str::trim) {
            Some("pretty") => LogFormat::Pretty,
            _ => LogFormat::Json,
        };

        Ok(AppConfig {
            postgresql_conn_str: db_url,
            db_connect_attempts,
            generation: GenerationConfig {
                base_url: generation_url.trim_end_matches('/').to_string(),
                timeout: Duration::from_secs(timeout_secs),
            },
            artifact_root: lookup("ARTIFACT_ROOT").map_or_else(|| PathBuf::from("uploads"), PathBuf::from),
            port,
            log: LogConfig {
                level: lookup("LOG_LEVEL")
                    .map(|s| s.trim().to_lowercase())
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| "info".to_string()),
                format,
                output: lookup("LOG_OUTPUT").map_or(LogOutput::Stdout, |s| LogOutput::parse(&s)),
            },
        })
    }
}

/// 读取并解析可选的数值配置，未设置时使用默认值，格式错误时报错
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} is not a valid number: {raw}"))
            .suggestion(format!("检查 {key} 环境变量")),
        None => Ok(default),
    }
}
