//! OpenAI chat-completions provider

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{CompletionRequest, CompletionResponse, DomainError, LlmProvider};
use crate::infrastructure::http_client::HttpClientTrait;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// OpenAI API provider
#[derive(Debug)]
pub struct OpenAiProvider<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    base_url: String,
}

impl<C: HttpClientTrait> OpenAiProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_OPENAI_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let auth_header = format!("Bearer {}", api_key.into());
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            auth_header,
            base_url,
        }
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    fn build_request(&self, model: &str, request: &CompletionRequest) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": model,
            "messages": [{"role": "user", "content": request.prompt()}],
        });

        if let Some(temperature) = request.temperature() {
            body["temperature"] = serde_json::json!(temperature);
        }

        if let Some(max_tokens) = request.max_tokens() {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        if request.json_output() {
            body["response_format"] = serde_json::json!({"type": "json_object"});
        }

        body
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<CompletionResponse, DomainError> {
        let response: OpenAiResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("openai", format!("Failed to parse response: {}", e))
        })?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::provider("openai", "No choices in response"))?;

        Ok(CompletionResponse::new(
            response.model,
            choice.message.content.unwrap_or_default(),
        ))
    }
}

#[async_trait]
impl<C: HttpClientTrait> LlmProvider for OpenAiProvider<C> {
    async fn complete(
        &self,
        model: &str,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, DomainError> {
        let url = self.chat_completions_url();
        let body = self.build_request(model, &request);

        let response = self
            .client
            .post_json(&url, self.headers(), &body)
            .await
            .map_err(|e| DomainError::provider("openai", format!("Request failed: {}", e)))?;

        if !response.is_success() {
            return Err(DomainError::provider(
                "openai",
                format!("HTTP {}: {}", response.status, response.body),
            ));
        }

        self.parse_response(response.json().map_err(|e| {
            DomainError::provider("openai", format!("Invalid response body: {}", e))
        })?)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn default_model(&self) -> &'static str {
        DEFAULT_MODEL
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    model: String,
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http_client::mock::MockHttpClient;
    use serde_json::json;

    fn completion_body(text: &str) -> serde_json::Value {
        json!({
            "model": "gpt-4o-mini",
            "choices": [{"message": {"role": "assistant", "content": text}}]
        })
    }

    #[tokio::test]
    async fn test_complete_success() {
        let client = MockHttpClient::new().with_json_response(
            "https://api.openai.com/v1/chat/completions",
            200,
            completion_body("{\"feasible\": true}"),
        );
        let provider = OpenAiProvider::new(client, "sk-test");

        let response = provider
            .complete("gpt-4o-mini", CompletionRequest::new("analyze this"))
            .await
            .unwrap();

        assert_eq!(response.text(), "{\"feasible\": true}");
    }

    #[tokio::test]
    async fn test_complete_http_error() {
        let client = MockHttpClient::new().with_json_response(
            "https://api.openai.com/v1/chat/completions",
            429,
            json!({"error": {"message": "rate limited"}}),
        );
        let provider = OpenAiProvider::new(client, "sk-test");

        let result = provider
            .complete("gpt-4o-mini", CompletionRequest::new("analyze"))
            .await;

        assert!(matches!(result, Err(DomainError::Provider { .. })));
    }

    #[tokio::test]
    async fn test_build_request_includes_json_mode() {
        let client = MockHttpClient::new().with_json_response(
            "https://api.openai.com/v1/chat/completions",
            200,
            completion_body("{}"),
        );
        let provider = OpenAiProvider::new(client, "sk-test");

        provider
            .complete(
                "gpt-4o-mini",
                CompletionRequest::new("p")
                    .with_temperature(0.0)
                    .with_json_output(),
            )
            .await
            .unwrap();

        let bodies = provider
            .client
            .sent_bodies("https://api.openai.com/v1/chat/completions");
        assert_eq!(bodies[0]["response_format"]["type"], json!("json_object"));
        assert_eq!(bodies[0]["temperature"], json!(0.0));
    }

    #[tokio::test]
    async fn test_parse_response_without_choices() {
        let client = MockHttpClient::new().with_json_response(
            "https://api.openai.com/v1/chat/completions",
            200,
            json!({"model": "gpt-4o-mini", "choices": []}),
        );
        let provider = OpenAiProvider::new(client, "sk-test");

        let result = provider
            .complete("gpt-4o-mini", CompletionRequest::new("p"))
            .await;

        assert!(result.is_err());
    }
}
