//! HTTP transport used by all outbound collaborators
//!
//! Unlike a plain JSON client, responses carry their status code and raw
//! body so the platform adapter can classify 4xx/5xx and surface
//! rejection bodies verbatim.

use async_trait::async_trait;
use thiserror::Error;

/// Transport-level failure, before any status-code interpretation
#[derive(Debug, Clone, Error)]
pub enum HttpError {
    /// The request timed out client-side. Ambiguous for mutating calls:
    /// the server may have processed it.
    #[error("request timed out")]
    Timeout,

    /// Connection could not be established
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("transport error: {0}")]
    Other(String),
}

/// An HTTP response with its status and raw body text
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON
    pub fn json(&self) -> Result<serde_json::Value, HttpError> {
        serde_json::from_str(&self.body)
            .map_err(|e| HttpError::Other(format!("invalid JSON body: {}", e)))
    }
}

/// Trait for HTTP operations (for mocking)
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    async fn get(&self, url: &str, headers: Vec<(&str, &str)>) -> Result<HttpResponse, HttpError>;

    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, HttpError>;
}

/// Real HTTP client using reqwest
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Result<Self, HttpError> {
        Self::with_timeout(std::time::Duration::from_secs(15))
    }

    pub fn with_timeout(timeout: std::time::Duration) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::Other(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    async fn read_response(response: reqwest::Response) -> Result<HttpResponse, HttpError> {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| HttpError::Other(format!("failed to read body: {}", e)))?;

        Ok(HttpResponse::new(status, body))
    }

    fn classify(e: reqwest::Error) -> HttpError {
        if e.is_timeout() {
            HttpError::Timeout
        } else if e.is_connect() {
            HttpError::Connect(e.to_string())
        } else {
            HttpError::Other(e.to_string())
        }
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn get(&self, url: &str, headers: Vec<(&str, &str)>) -> Result<HttpResponse, HttpError> {
        let mut request = self.client.get(url);
        for (key, value) in headers {
            request = request.header(key, value);
        }

        let response = request.send().await.map_err(Self::classify)?;
        Self::read_response(response).await
    }

    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, HttpError> {
        let mut request = self.client.post(url);
        for (key, value) in headers {
            request = request.header(key, value);
        }

        let response = request.json(body).send().await.map_err(Self::classify)?;
        Self::read_response(response).await
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    /// Mock HTTP client replaying scripted responses per URL, in order.
    #[derive(Debug, Default)]
    pub struct MockHttpClient {
        scripts: Mutex<HashMap<String, VecDeque<Result<HttpResponse, HttpError>>>>,
        requests: Mutex<Vec<(String, Option<serde_json::Value>)>>,
    }

    impl MockHttpClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_response(self, url: impl Into<String>, response: HttpResponse) -> Self {
            self.scripts
                .lock()
                .unwrap()
                .entry(url.into())
                .or_default()
                .push_back(Ok(response));
            self
        }

        pub fn with_json_response(
            self,
            url: impl Into<String>,
            status: u16,
            body: serde_json::Value,
        ) -> Self {
            self.with_response(url, HttpResponse::new(status, body.to_string()))
        }

        pub fn with_transport_error(self, url: impl Into<String>, error: HttpError) -> Self {
            self.scripts
                .lock()
                .unwrap()
                .entry(url.into())
                .or_default()
                .push_back(Err(error));
            self
        }

        /// Bodies sent to a URL, for asserting on outgoing payloads
        pub fn sent_bodies(&self, url: &str) -> Vec<serde_json::Value> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .filter(|(u, body)| u == url && body.is_some())
                .filter_map(|(_, body)| body.clone())
                .collect()
        }

        pub fn request_count(&self, url: &str) -> usize {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .filter(|(u, _)| u == url)
                .count()
        }

        fn next(&self, url: &str) -> Result<HttpResponse, HttpError> {
            self.scripts
                .lock()
                .unwrap()
                .get_mut(url)
                .and_then(VecDeque::pop_front)
                .unwrap_or_else(|| {
                    Err(HttpError::Other(format!("no scripted response for {}", url)))
                })
        }
    }

    #[async_trait]
    impl HttpClientTrait for MockHttpClient {
        async fn get(
            &self,
            url: &str,
            _headers: Vec<(&str, &str)>,
        ) -> Result<HttpResponse, HttpError> {
            self.requests.lock().unwrap().push((url.to_string(), None));
            self.next(url)
        }

        async fn post_json(
            &self,
            url: &str,
            _headers: Vec<(&str, &str)>,
            body: &serde_json::Value,
        ) -> Result<HttpResponse, HttpError> {
            self.requests
                .lock()
                .unwrap()
                .push((url.to_string(), Some(body.clone())));
            self.next(url)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use serde_json::json;

        #[tokio::test]
        async fn test_mock_replays_in_order() {
            let client = MockHttpClient::new()
                .with_json_response("http://x/api", 500, json!({"error": "boom"}))
                .with_json_response("http://x/api", 200, json!({"id": "1"}));

            let first = client.post_json("http://x/api", vec![], &json!({})).await;
            let second = client.post_json("http://x/api", vec![], &json!({})).await;

            assert_eq!(first.unwrap().status, 500);
            assert_eq!(second.unwrap().status, 200);
            assert_eq!(client.request_count("http://x/api"), 2);
        }

        #[tokio::test]
        async fn test_mock_unscripted_url_errors() {
            let client = MockHttpClient::new();

            let result = client.get("http://nowhere", vec![]).await;

            assert!(result.is_err());
        }

        #[test]
        fn test_response_json_helper() {
            let response = HttpResponse::new(200, r#"{"ok": true}"#);
            assert!(response.is_success());
            assert_eq!(response.json().unwrap()["ok"], json!(true));

            let bad = HttpResponse::new(200, "not json");
            assert!(bad.json().is_err());
        }
    }
}
