//! Completion response types

use serde::{Deserialize, Serialize};

/// Response from a completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Model that produced the response
    model: String,
    /// Generated text
    text: String,
}

impl CompletionResponse {
    /// Create a new completion response
    pub fn new(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            text: text.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_response() {
        let response = CompletionResponse::new("gpt-4o-mini", "{\"feasible\": true}");

        assert_eq!(response.model(), "gpt-4o-mini");
        assert_eq!(response.text(), "{\"feasible\": true}");
        assert_eq!(response.into_text(), "{\"feasible\": true}");
    }
}
