//! Prompt construction for intent analysis

use crate::domain::WorkflowTemplate;

/// Maximum number of templates included as few-shot context
pub const MAX_PROMPT_TEMPLATES: usize = 5;

const SCHEMA_INSTRUCTIONS: &str = r#"Respond with a single JSON object using exactly this schema:
{
  "feasible": boolean,
  "trigger": "schedule" | "webhook" | "manual",
  "nodes": [string, ...],
  "parameters": {string: any, ...},
  "schedule": {"interval_minutes": number} | {"cron": string} | null
}

Known node kinds: httpCheck, httpRequest, condition, discordNotify, slackNotify, emailNotify, dataTransform.
Prefer known node kinds; use a descriptive label for anything else.
Prefix parameter keys with the node kind they configure, e.g. "httpCheck.url".
Set "feasible" to false only if the request is clearly impossible to automate."#;

/// Build the analysis prompt for a request, with up to five matched
/// templates as few-shot context.
pub fn build_prompt(request_text: &str, templates: &[WorkflowTemplate]) -> String {
    let mut prompt = String::from(
        "You are a workflow automation planner. \
         Extract the automation intent from the user's request.\n\n",
    );

    if !templates.is_empty() {
        prompt.push_str("Here are similar existing workflows for reference:\n\n");
        for template in templates.iter().take(MAX_PROMPT_TEMPLATES) {
            prompt.push_str(&format!(
                "### {}\n{}\n{}\n\n",
                template.id(),
                template.description(),
                template.graph()
            ));
        }
    }

    prompt.push_str(&format!("User request:\n{}\n\n", request_text));
    prompt.push_str(SCHEMA_INSTRUCTIONS);
    prompt
}

/// Stricter retry prompt used after a response failed to parse
pub fn build_strict_prompt(request_text: &str) -> String {
    format!(
        "Extract the automation intent from this request:\n{}\n\n{}\n\n\
         Emit valid JSON only. No prose, no markdown fences, no explanations.",
        request_text, SCHEMA_INSTRUCTIONS
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::template::TemplateId;
    use serde_json::json;

    fn template(id: &str) -> WorkflowTemplate {
        WorkflowTemplate::new(
            TemplateId::new(id).unwrap(),
            format!("description of {}", id),
            json!({"nodes": []}),
            vec![0.0],
        )
    }

    #[test]
    fn test_prompt_contains_request_and_schema() {
        let prompt = build_prompt("ping my site", &[]);

        assert!(prompt.contains("ping my site"));
        assert!(prompt.contains("\"feasible\""));
        assert!(!prompt.contains("similar existing workflows"));
    }

    #[test]
    fn test_prompt_includes_templates() {
        let templates = vec![template("uptime"), template("backup")];

        let prompt = build_prompt("ping my site", &templates);

        assert!(prompt.contains("### uptime"));
        assert!(prompt.contains("### backup"));
    }

    #[test]
    fn test_prompt_caps_templates_at_five() {
        let templates: Vec<_> = (0..8).map(|i| template(&format!("tpl{}", i))).collect();

        let prompt = build_prompt("request", &templates);

        assert!(prompt.contains("### tpl4"));
        assert!(!prompt.contains("### tpl5"));
    }

    #[test]
    fn test_strict_prompt_demands_json_only() {
        let prompt = build_strict_prompt("ping my site");

        assert!(prompt.contains("valid JSON only"));
        assert!(prompt.contains("ping my site"));
    }
}
