use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, instrument, warn};

use super::{GenerateError, RecipeGenerator};
use crate::config::LlmConfig;
use crate::store::{RecipeBody, StructuredRecipe};

/// Calls a Gemini-style `generateContent` endpoint once per recipe.
#[derive(Clone)]
pub struct LlmGenerator {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl LlmGenerator {
    pub fn new(config: &LlmConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            client,
            endpoint: format!(
                "{}/models/{}:generateContent",
                config.base_url.trim_end_matches('/'),
                config.model
            ),
            api_key: config.api_key.clone(),
        })
    }

    fn request_for(query: &str) -> GenerateContentRequest {
        let prompt = format!(
            "Create a recipe for \"{query}\". Reply with a JSON object containing a \
             `title`, a list of `ingredients` and a list of step-by-step `instructions`."
        );
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".into()),
                parts: vec![Part { text: Some(prompt) }],
            }],
            generation_config: json!({
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "ingredients": { "type": "ARRAY", "items": { "type": "STRING" } },
                        "instructions": { "type": "ARRAY", "items": { "type": "STRING" } }
                    },
                    "required": ["title", "ingredients", "instructions"]
                }
            }),
        }
    }
}

#[async_trait]
impl RecipeGenerator for LlmGenerator {
    #[instrument(skip(self))]
    async fn generate(&self, query: &str) -> Result<RecipeBody, GenerateError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::request_for(query))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let detail: String = resp.text().await.unwrap_or_default().chars().take(200).collect();
            warn!(%status, "generation request rejected");
            return Err(GenerateError::Upstream(format!("status {status}: {detail}")));
        }

        let payload: GenerateContentResponse = resp.json().await?;
        let text = candidate_text(payload)
            .ok_or_else(|| GenerateError::Upstream("response has no candidate text".into()))?;
        debug!(len = text.len(), "generation response received");

        let value: Value = serde_json::from_str(strip_fences(&text))
            .map_err(|e| GenerateError::Upstream(format!("candidate text is not JSON: {e}")))?;
        Ok(RecipeBody::Structured(validate(value)?))
    }
}

fn candidate_text(payload: GenerateContentResponse) -> Option<String> {
    payload
        .candidates
        .into_iter()
        .filter_map(|c| c.content)
        .flat_map(|c| c.parts)
        .find_map(|p| p.text.filter(|t| !t.trim().is_empty()))
}

/// Models sometimes wrap JSON in a markdown code fence.
fn strip_fences(text: &str) -> &str {
    let t = text.trim();
    match t.strip_prefix("```") {
        Some(rest) => rest
            .trim_start_matches("json")
            .trim_end()
            .trim_end_matches("```")
            .trim(),
        None => t,
    }
}

fn validate(value: Value) -> Result<StructuredRecipe, GenerateError> {
    let obj = value
        .as_object()
        .ok_or_else(|| GenerateError::Validation("expected a JSON object".into()))?;

    let title = obj
        .get("title")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| GenerateError::Validation("missing title".into()))?
        .to_string();

    Ok(StructuredRecipe {
        title,
        ingredients: string_list(obj, "ingredients")?,
        instructions: string_list(obj, "instructions")?,
    })
}

fn string_list(
    obj: &serde_json::Map<String, Value>,
    key: &str,
) -> Result<Vec<String>, GenerateError> {
    let items = obj
        .get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| GenerateError::Validation(format!("missing {key}")))?;
    let list: Vec<String> = items
        .iter()
        .map(|v| {
            v.as_str()
                .map(|s| s.trim().to_string())
                .ok_or_else(|| GenerateError::Validation(format!("{key} must be strings")))
        })
        .collect::<Result<_, _>>()?;
    if list.iter().all(|s| s.is_empty()) {
        return Err(GenerateError::Validation(format!("{key} is empty")));
    }
    Ok(list.into_iter().filter(|s| !s.is_empty()).collect())
}
