//! Orchestration-platform client: wire translation, sanitization, retry

pub mod client;
pub mod retry;
pub mod sanitize;

pub use client::N8nClient;
pub use retry::RetryPolicy;
pub use sanitize::sanitize_workflow_payload;
