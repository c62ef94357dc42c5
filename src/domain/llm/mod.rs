//! Language-model collaborator interface
//!
//! The synthesis engine only needs prompt-in / text-out; no streaming.

pub mod provider;
pub mod request;
pub mod response;

pub use provider::LlmProvider;
pub use request::CompletionRequest;
pub use response::CompletionResponse;
