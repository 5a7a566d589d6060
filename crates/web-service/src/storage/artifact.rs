//! 提案PDF文件写入
//!
//! 文件路径只由提案ID决定：`<root>/proposals/proposal_<id>.pdf`，
//! 重新生成时会覆盖同一个文件。
//!
//! 写入流程：先写同目录下的临时文件并 fsync，再 rename 到最终路径。
//! rename 在同一文件系统内是原子的，读取方不会看到写了一半的文件。

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// 文件写入错误
#[derive(Debug, Error)]
#[error("failed to write artifact {}: {source}", .path.display())]
pub struct StorageError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl StorageError {
    fn new(path: &Path, source: io::Error) -> Self {
        Self {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// 生成文件写入trait
#[async_trait::async_trait]
pub trait ArtifactWriterTrait: Send + Sync + 'static {
    /// 保存提案的PDF，返回最终文件路径
    async fn store(&self, proposal_id: Uuid, bytes: &[u8]) -> Result<PathBuf, StorageError>;
}

/// 本地文件系统实现
#[derive(Debug, Clone)]
pub struct LocalArtifactWriter {
    /// 存储根目录
    root: PathBuf,
}

impl LocalArtifactWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// 提案PDF的最终路径
    pub fn artifact_path(&self, proposal_id: Uuid) -> PathBuf {
        self.root
            .join("proposals")
            .join(format!("proposal_{proposal_id}.pdf"))
    }

    async fn write_temp(temp_path: &Path, bytes: &[u8]) -> io::Result<()> {
        let mut file = fs::File::create(temp_path).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl ArtifactWriterTrait for LocalArtifactWriter {
    async fn store(&self, proposal_id: Uuid, bytes: &[u8]) -> Result<PathBuf, StorageError> {
        let path = self.artifact_path(proposal_id);
        let dir = path.parent().unwrap_or(&self.root);

        fs::create_dir_all(dir)
            .await
            .map_err(|e| StorageError::new(dir, e))?;

        // 临时文件名带随机后缀，同一提案并发重新生成时不会互相覆盖临时文件
        let temp_path = dir.join(format!(".proposal_{proposal_id}.{}.tmp", Uuid::new_v4().simple()));
        debug!(path = %temp_path.display(), size = bytes.len(), "📝 写入临时文件");

        let written = match Self::write_temp(&temp_path, bytes).await {
            Ok(()) => fs::rename(&temp_path, &path).await,
            Err(e) => Err(e),
        };

        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&temp_path).await {
                if cleanup.kind() != io::ErrorKind::NotFound {
                    warn!(path = %temp_path.display(), "⚠️ 清理临时文件失败: {}", cleanup);
                }
            }
            return Err(StorageError::new(&path, e));
        }

        info!(proposal_id = %proposal_id, path = %path.display(), "✅ PDF保存成功");
        Ok(path)
    }
}
