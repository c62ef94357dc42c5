//! Intent analyzer
//!
//! Prompts the language model with the request plus matched templates,
//! parses the structured reply, and retries once with a stricter
//! instruction when parsing fails.

pub mod prompt;

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::requirement::{extract_json, parse_requirement};
use crate::domain::{CompletionRequest, DomainError, LlmProvider, Requirement, WorkflowTemplate};

/// Extracts a structured requirement from free text
#[derive(Debug)]
pub struct IntentAnalyzer {
    llm: Arc<dyn LlmProvider>,
    model: String,
}

impl IntentAnalyzer {
    pub fn new(llm: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Analyze a request, grounding on up to five matched templates.
    ///
    /// Fails with `DomainError::Analysis` when both the initial response
    /// and the strict retry fail to parse; no graph is fabricated.
    pub async fn analyze(
        &self,
        request_text: &str,
        templates: &[WorkflowTemplate],
    ) -> Result<Requirement, DomainError> {
        let first = prompt::build_prompt(request_text, templates);
        match self.attempt(&first).await {
            Ok(requirement) => Ok(requirement),
            Err(first_error) => {
                warn!(error = %first_error, "Analysis parse failed, retrying with strict prompt");

                let strict = prompt::build_strict_prompt(request_text);
                self.attempt(&strict).await.map_err(|retry_error| {
                    DomainError::analysis(format!(
                        "model output unparseable after retry: {}",
                        retry_error
                    ))
                })
            }
        }
    }

    async fn attempt(&self, prompt_text: &str) -> Result<Requirement, DomainError> {
        let request = CompletionRequest::new(prompt_text)
            .with_temperature(0.0)
            .with_json_output();

        let response = self.llm.complete(&self.model, request).await?;

        let value = extract_json(response.text())
            .ok_or_else(|| DomainError::analysis("response contained no JSON object"))?;

        let requirement = parse_requirement(&value)?;
        debug!(
            trigger = ?requirement.trigger(),
            nodes = requirement.node_kinds().len(),
            feasible = requirement.is_feasible(),
            "Parsed requirement"
        );

        Ok(requirement)
    }
}
