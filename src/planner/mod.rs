//! Boundary to the generative-AI provider that writes the diet plans.

mod gemini;
pub mod prompts;
pub mod schema;
mod scripted;

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::plan::{AiResponse, DietPlan, UserProfile};

pub use gemini::GeminiPlanClient;
pub use scripted::ScriptedPlanClient;

/// Answers to clarifying questions, keyed by the question text.
pub type Answers = BTreeMap<String, String>;

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("AI service request failed: {0}")]
    Transport(String),
    #[error("AI service error ({status}): {message}")]
    Provider { status: u16, message: String },
    #[error("AI service returned no content")]
    EmptyResponse,
    #[error("AI response does not match the plan schema: {0}")]
    Malformed(String),
}

/// The two calls the session makes. Each is a single round trip; callers
/// get no retries.
#[async_trait]
pub trait PlanClient: Send + Sync {
    /// Either a short list of clarifying questions or a finished plan.
    async fn analyze(&self, profile: &UserProfile) -> Result<AiResponse, PlanError>;

    /// Always a finished plan.
    async fn finalize(
        &self,
        profile: &UserProfile,
        answers: &Answers,
    ) -> Result<DietPlan, PlanError>;
}

pub fn parse_analysis(text: &str) -> Result<AiResponse, PlanError> {
    let reply: AiResponse =
        serde_json::from_str(text).map_err(|e| PlanError::Malformed(e.to_string()))?;
    match reply {
        AiResponse::Questions { questions } => {
            let questions: Vec<String> = questions
                .into_iter()
                .map(|q| q.trim().to_string())
                .filter(|q| !q.is_empty())
                .collect();
            if questions.is_empty() {
                return Err(PlanError::Malformed("no clarifying questions".into()));
            }
            Ok(AiResponse::Questions { questions })
        }
        AiResponse::Plan { plan } => {
            plan.validate()
                .map_err(|e| PlanError::Malformed(e.to_string()))?;
            Ok(AiResponse::Plan { plan })
        }
    }
}

pub fn parse_plan(text: &str) -> Result<DietPlan, PlanError> {
    let plan: DietPlan =
        serde_json::from_str(text).map_err(|e| PlanError::Malformed(e.to_string()))?;
    plan.validate()
        .map_err(|e| PlanError::Malformed(e.to_string()))?;
    Ok(plan)
}
