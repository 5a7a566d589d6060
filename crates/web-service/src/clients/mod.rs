//! 外部服务客户端

pub mod generation;

pub use generation::{GenerationClientTrait, GenerationError, HttpGenerationClient};
