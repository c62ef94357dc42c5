//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, EmbeddingConfig, LlmConfig, LogFormat, LoggingConfig, PlatformConfig, ServerConfig,
    StorageConfig,
};
