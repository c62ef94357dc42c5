use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use crate::domain::{DomainError, PlatformAdapter, PlatformWorkflowSummary, WorkflowGraph};
use crate::infrastructure::http_client::{HttpClientTrait, HttpError, HttpResponse};

use super::retry::RetryPolicy;
use super::sanitize::sanitize_workflow_payload;

const API_KEY_HEADER: &str = "X-N8N-API-KEY";

/// Outcome of one HTTP attempt, split for the retry predicate
enum AttemptError {
    Retryable(DomainError),
    Fatal(DomainError),
}

impl std::fmt::Display for AttemptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttemptError::Retryable(e) | AttemptError::Fatal(e) => write!(f, "{}", e),
        }
    }
}

impl AttemptError {
    fn into_inner(self) -> DomainError {
        match self {
            AttemptError::Retryable(e) | AttemptError::Fatal(e) => e,
        }
    }
}

/// Client for an n8n-compatible orchestration platform
#[derive(Debug)]
pub struct N8nClient<C: HttpClientTrait> {
    http_client: Arc<C>,
    base_url: String,
    api_key: String,
    retry_policy: RetryPolicy,
}

impl<C: HttpClientTrait> N8nClient<C> {
    pub fn new(
        http_client: Arc<C>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            retry_policy: RetryPolicy::platform_default(),
        }
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    fn workflows_url(&self) -> String {
        format!("{}/workflows", self.base_url)
    }

    fn executions_url(&self, platform_id: &str) -> String {
        format!("{}/workflows/{}/executions", self.base_url, platform_id)
    }

    fn execute_url(&self, platform_id: &str) -> String {
        format!("{}/workflows/{}/execute", self.base_url, platform_id)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![(API_KEY_HEADER, self.api_key.as_str())]
    }

    /// Translate a validated graph into the platform wire format.
    ///
    /// Node ids become wire node names. Connection targets are grouped
    /// into output ports by their position in the target list, so a
    /// condition node's two targets land on ports 0 and 1.
    fn to_payload(graph: &WorkflowGraph, name: &str, description: &str) -> Value {
        let nodes: Vec<Value> = graph
            .nodes()
            .iter()
            .map(|node| {
                json!({
                    "name": node.id().as_str(),
                    "type": wire_node_type(node.kind()),
                    "typeVersion": 1,
                    "position": [node.position().x, node.position().y],
                    "parameters": Value::Object(
                        node.parameters()
                            .iter()
                            .map(|(k, v)| (k.clone(), v.clone()))
                            .collect::<Map<String, Value>>(),
                    ),
                })
            })
            .collect();

        let mut connections = Map::new();
        for (source, targets) in graph.connections() {
            let ports: Vec<Value> = targets
                .iter()
                .map(|target| {
                    json!([{
                        "node": target.as_str(),
                        "type": "main",
                        "index": 0
                    }])
                })
                .collect();
            connections.insert(source.as_str().to_string(), json!({ "main": ports }));
        }

        let mut payload = json!({
            "name": name,
            "nodes": nodes,
            "connections": Value::Object(connections),
            "settings": {},
            "staticData": {},
            "meta": { "description": description }
        });
        sanitize_workflow_payload(&mut payload);
        payload
    }

    fn classify_response(response: HttpResponse) -> AttemptError {
        match response.status {
            401 | 403 => AttemptError::Fatal(DomainError::authentication_failed(
                "Platform rejected the API key",
            )),
            status if (400..500).contains(&status) => {
                AttemptError::Fatal(DomainError::platform_rejected(response.body))
            }
            status => AttemptError::Retryable(DomainError::platform_unavailable(format!(
                "Platform returned status {}",
                status
            ))),
        }
    }

    fn classify_transport(error: HttpError, mutating: bool) -> AttemptError {
        match error {
            HttpError::Timeout => {
                let domain = DomainError::platform_unavailable("Platform request timed out");
                if mutating {
                    // The request may have been applied server-side, so a
                    // blind retry could create duplicate workflows.
                    AttemptError::Fatal(domain)
                } else {
                    AttemptError::Retryable(domain)
                }
            }
            HttpError::Connect(message) | HttpError::Other(message) => AttemptError::Retryable(
                DomainError::platform_unavailable(format!("Platform unreachable: {}", message)),
            ),
        }
    }

    async fn get_with_retry(&self, url: &str) -> Result<HttpResponse, DomainError> {
        self.retry_policy
            .run(
                "platform_get",
                |error: &AttemptError| matches!(error, AttemptError::Retryable(_)),
                || async {
                    match self.http_client.get(url, self.headers()).await {
                        Ok(response) if response.is_success() => Ok(response),
                        Ok(response) => Err(Self::classify_response(response)),
                        Err(error) => Err(Self::classify_transport(error, false)),
                    }
                },
            )
            .await
            .map_err(AttemptError::into_inner)
    }

    async fn post_with_retry(&self, url: &str, body: &Value) -> Result<HttpResponse, DomainError> {
        self.retry_policy
            .run(
                "platform_post",
                |error: &AttemptError| matches!(error, AttemptError::Retryable(_)),
                || async {
                    match self.http_client.post_json(url, self.headers(), body).await {
                        Ok(response) if response.is_success() => Ok(response),
                        Ok(response) => Err(Self::classify_response(response)),
                        Err(error) => Err(Self::classify_transport(error, true)),
                    }
                },
            )
            .await
            .map_err(AttemptError::into_inner)
    }

    fn parse_created_id(body: &Value) -> Result<String, DomainError> {
        let candidate = body.get("id").or_else(|| body.pointer("/data/id"));
        match candidate {
            Some(Value::String(id)) => Ok(id.clone()),
            Some(Value::Number(id)) => Ok(id.to_string()),
            _ => Err(DomainError::provider(
                "platform",
                "Create response is missing a workflow id",
            )),
        }
    }

    fn parse_workflow_list(body: &Value) -> Vec<PlatformWorkflowSummary> {
        let items = body
            .get("data")
            .and_then(Value::as_array)
            .or_else(|| body.as_array());
        let Some(items) = items else {
            return Vec::new();
        };

        items
            .iter()
            .filter_map(|item| {
                let id = match item.get("id") {
                    Some(Value::String(id)) => id.clone(),
                    Some(Value::Number(id)) => id.to_string(),
                    _ => return None,
                };
                Some(PlatformWorkflowSummary {
                    id,
                    name: item
                        .get("name")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    active: item.get("active").and_then(Value::as_bool).unwrap_or(false),
                })
            })
            .collect()
    }

    fn parse_json(response: &HttpResponse, context: &str) -> Result<Value, DomainError> {
        response
            .json()
            .map_err(|e| DomainError::provider("platform", format!("{}: {}", context, e)))
    }
}

/// Map an internal node kind to the platform's node type identifier
fn wire_node_type(kind: &str) -> String {
    let suffix = match kind {
        "condition" => "if",
        "webhookTrigger" => "webhook",
        "httpCheck" => "httpRequest",
        other => other,
    };
    format!("n8n-nodes-base.{}", suffix)
}

#[async_trait]
impl<C: HttpClientTrait> PlatformAdapter for N8nClient<C> {
    async fn create_workflow(
        &self,
        graph: &WorkflowGraph,
        name: &str,
        description: &str,
    ) -> Result<String, DomainError> {
        let payload = Self::to_payload(graph, name, description);
        debug!(workflow_name = name, "Submitting workflow to platform");

        let response = self.post_with_retry(&self.workflows_url(), &payload).await?;
        let body = Self::parse_json(&response, "Invalid create response")?;
        let platform_id = Self::parse_created_id(&body)?;

        info!(platform_id = %platform_id, workflow_name = name, "Workflow created on platform");
        Ok(platform_id)
    }

    async fn list_workflows(&self) -> Result<Vec<PlatformWorkflowSummary>, DomainError> {
        let response = self.get_with_retry(&self.workflows_url()).await?;
        let body = Self::parse_json(&response, "Invalid list response")?;
        Ok(Self::parse_workflow_list(&body))
    }

    async fn execution_count(&self, platform_id: &str) -> Result<u64, DomainError> {
        let response = self.get_with_retry(&self.executions_url(platform_id)).await?;
        let body = Self::parse_json(&response, "Invalid executions response")?;

        if let Some(count) = body.get("count").and_then(Value::as_u64) {
            return Ok(count);
        }
        Ok(body
            .get("data")
            .and_then(Value::as_array)
            .map(|items| items.len() as u64)
            .unwrap_or(0))
    }

    async fn execute(&self, platform_id: &str) -> Result<(), DomainError> {
        self.post_with_retry(&self.execute_url(platform_id), &json!({}))
            .await?;
        info!(platform_id = %platform_id, "Triggered workflow execution");
        Ok(())
    }
}
