//! Infrastructure layer: collaborator implementations and services

pub mod analyzer;
pub mod builder;
pub mod embedding;
pub mod http_client;
pub mod llm;
pub mod logging;
pub mod matcher;
pub mod platform;
pub mod services;
pub mod storage;
pub mod templates;
