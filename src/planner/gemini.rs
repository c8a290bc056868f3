use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, instrument};

use super::{
    parse_analysis, parse_plan,
    prompts::{analysis_prompt, final_plan_prompt},
    schema::{analysis_schema, plan_schema},
    Answers, PlanClient, PlanError,
};
use crate::{
    config::GeminiConfig,
    plan::{AiResponse, DietPlan, UserProfile},
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
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

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Plan client backed by the Gemini `generateContent` endpoint.
pub struct GeminiPlanClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiPlanClient {
    pub fn new(config: &GeminiConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn build_request(prompt: String, schema: Value) -> GenerateRequest {
        GenerateRequest {
            contents: vec![Content {
                role: Some("user".into()),
                parts: vec![Part { text: Some(prompt) }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
            },
        }
    }

    /// Sends one prompt and returns the model's JSON text.
    #[instrument(skip(self, prompt, schema), fields(model = %self.model))]
    async fn generate(&self, prompt: String, schema: Value) -> Result<String, PlanError> {
        let body = Self::build_request(prompt, schema);
        debug!("sending request to Gemini");

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| PlanError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| PlanError::Transport(e.to_string()))?;

        if !status.is_success() {
            error!(%status, "Gemini API error");
            return Err(map_api_error(status.as_u16(), &text));
        }

        let parsed: GenerateResponse = serde_json::from_str(&text).map_err(|e| {
            error!(error = %e, "unreadable Gemini response");
            PlanError::Malformed(e.to_string())
        })?;
        extract_text(parsed)
    }
}

fn map_api_error(status: u16, body: &str) -> PlanError {
    let message = serde_json::from_str::<GenerateResponse>(body)
        .ok()
        .and_then(|r| r.error)
        .map_or_else(|| body.to_string(), |e| e.message);
    PlanError::Provider { status, message }
}

fn extract_text(response: GenerateResponse) -> Result<String, PlanError> {
    if let Some(err) = response.error {
        return Err(PlanError::Provider {
            status: 200,
            message: err.message,
        });
    }
    let candidate = response
        .candidates
        .and_then(|c| c.into_iter().next())
        .ok_or(PlanError::EmptyResponse)?;
    if let Some(reason) = &candidate.finish_reason {
        debug!(finish_reason = %reason, "Gemini candidate finished");
    }
    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(PlanError::EmptyResponse);
    }
    Ok(text)
}

#[async_trait]
impl PlanClient for GeminiPlanClient {
    async fn analyze(&self, profile: &UserProfile) -> Result<AiResponse, PlanError> {
        let text = self
            .generate(analysis_prompt(profile), analysis_schema())
            .await?;
        let reply = parse_analysis(&text)?;
        match &reply {
            AiResponse::Questions { questions } => {
                info!(count = questions.len(), "analysis asked for more detail")
            }
            AiResponse::Plan { .. } => info!("analysis returned a plan directly"),
        }
        Ok(reply)
    }

    async fn finalize(
        &self,
        profile: &UserProfile,
        answers: &Answers,
    ) -> Result<DietPlan, PlanError> {
        let text = self
            .generate(final_plan_prompt(profile, answers), plan_schema())
            .await?;
        let plan = parse_plan(&text)?;
        info!(meals = plan.meals().count(), "final plan received");
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GeminiConfig {
        GeminiConfig {
            api_key: "k".into(),
            model: "gemini-2.5-flash".into(),
            base_url: "https://example.test/v1beta/".into(),
        }
    }

    #[test]
    fn url_targets_model_without_leaking_key() {
        let client = GeminiPlanClient::new(&config());
        let url = client.url();
        assert_eq!(
            url,
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert!(!url.contains("key="));
    }

    #[test]
    fn request_declares_json_output_and_schema() {
        let req = GeminiPlanClient::build_request("merhaba".into(), plan_schema());
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(
            v["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(v["generationConfig"]["responseSchema"]["type"], "OBJECT");
        assert_eq!(v["contents"][0]["parts"][0]["text"], "merhaba");
        assert_eq!(v["contents"][0]["role"], "user");
    }

    #[test]
    fn text_parts_are_joined() {
        let raw = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"{\"type\":"},{"text":"\"plan\"}"}]},"finishReason":"STOP"}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(extract_text(parsed).unwrap(), r#"{"type":"plan"}"#);
    }

    #[test]
    fn empty_candidates_are_an_error() {
        let parsed: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(matches!(extract_text(parsed), Err(PlanError::EmptyResponse)));
    }

    #[test]
    fn api_error_message_is_surfaced() {
        let err = map_api_error(403, r#"{"error":{"code":403,"message":"API key not valid"}}"#);
        match err {
            PlanError::Provider { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "API key not valid");
            }
            other => panic!("unexpected {other:?}"),
        }
        let err = map_api_error(502, "bad gateway");
        assert!(err.to_string().contains("bad gateway"));
    }
}
