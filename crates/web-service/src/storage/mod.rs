//! 生成文件的本地存储

pub mod artifact;

pub use artifact::{ArtifactWriterTrait, LocalArtifactWriter, StorageError};
