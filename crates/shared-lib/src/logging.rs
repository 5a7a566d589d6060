//! 日志初始化
//!
//! 全局只安装一次 [`tracing`] subscriber，各组件通过 `tracing` 宏输出日志，
//! 不直接持有logger实例。测试中可以用 `tracing::subscriber::with_default` 替换。

use crate::models::{LogConfig, LogFormat, LogOutput};
use color_eyre::eyre::{eyre, Context};
use color_eyre::Result;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// 根据配置安装全局日志
///
/// `RUST_LOG` 存在时优先使用，否则使用 [`LogConfig::level`]。
///
/// 输出到文件时返回后台写线程的 [`WorkerGuard`]，调用方需要持有到程序退出，否则缓冲中的日志会丢失。
pub fn init_tracing(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let (writer, guard) = make_writer(&config.output)?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        // 文件中不写入颜色控制符
        .with_ansi(!matches!(config.output, LogOutput::File(_)))
        .with_writer(writer);

    match config.format {
        LogFormat::Json => builder.json().flatten_event(true).try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    }
    .map_err(|e| eyre!("初始化日志失败: {e}"))?;

    Ok(guard)
}

/// 创建日志输出
fn make_writer(output: &LogOutput) -> Result<(BoxMakeWriter, Option<WorkerGuard>)> {
    match output {
        LogOutput::Stdout => Ok((BoxMakeWriter::new(std::io::stdout), None)),
        LogOutput::Stderr => Ok((BoxMakeWriter::new(std::io::stderr), None)),
        LogOutput::File(path) => {
            let file_name = path
                .file_name()
                .ok_or_else(|| eyre!("LOG_OUTPUT is not a file path: {}", path.display()))?;
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));

            let appender = RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix(file_name.to_string_lossy())
                .build(dir)
                .with_context(|| format!("无法打开日志文件 {}", path.display()))?;
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);

            Ok((BoxMakeWriter::new(non_blocking), Some(guard)))
        }
    }
}
