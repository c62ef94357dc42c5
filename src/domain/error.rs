use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    /// The embedding collaborator could not be reached. Non-fatal:
    /// callers degrade to zero matched templates.
    #[error("Embedding unavailable: {message}")]
    EmbeddingUnavailable { message: String },

    /// Intent analysis failed after the parse retry. Fatal to the request.
    #[error("Analysis error: {message}")]
    Analysis { message: String },

    /// A built graph violated a structural invariant. Indicates a builder
    /// or requirement-data bug, logged at error severity.
    #[error("Graph validation error: {message}")]
    GraphValidation { message: String },

    /// The orchestration platform rejected the payload (4xx). The detail
    /// is the platform's error body, verbatim, and is safe to surface.
    #[error("Platform rejected request: {detail}")]
    PlatformRejected { detail: String },

    /// The platform was unreachable or kept failing after retries.
    #[error("Platform unavailable: {message}")]
    PlatformUnavailable { message: String },

    /// The platform returned 401/403. Configuration issue.
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn embedding_unavailable(message: impl Into<String>) -> Self {
        Self::EmbeddingUnavailable {
            message: message.into(),
        }
    }

    pub fn analysis(message: impl Into<String>) -> Self {
        Self::Analysis {
            message: message.into(),
        }
    }

    pub fn graph_validation(message: impl Into<String>) -> Self {
        Self::GraphValidation {
            message: message.into(),
        }
    }

    pub fn platform_rejected(detail: impl Into<String>) -> Self {
        Self::PlatformRejected {
            detail: detail.into(),
        }
    }

    pub fn platform_unavailable(message: impl Into<String>) -> Self {
        Self::PlatformUnavailable {
            message: message.into(),
        }
    }

    pub fn authentication_failed(message: impl Into<String>) -> Self {
        Self::AuthenticationFailed {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Short category label used in user-facing failure payloads.
    pub fn category(&self) -> &'static str {
        match self {
            Self::EmbeddingUnavailable { .. } => "EmbeddingUnavailable",
            Self::Analysis { .. } => "AnalysisError",
            Self::GraphValidation { .. } => "GraphValidationError",
            Self::PlatformRejected { .. } => "PlatformRejected",
            Self::PlatformUnavailable { .. } => "PlatformUnavailable",
            Self::AuthenticationFailed { .. } => "AuthenticationFailed",
            Self::NotFound { .. } => "NotFound",
            Self::Validation { .. } => "ValidationError",
            Self::Provider { .. } => "ProviderError",
            Self::Configuration { .. } => "ConfigurationError",
            Self::Storage { .. } => "StorageError",
            Self::Internal { .. } => "InternalError",
        }
    }
}
