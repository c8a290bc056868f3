use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{Answers, PlanClient, PlanError};
use crate::plan::{AiResponse, DietPlan, UserProfile};

/// Plan client that replays canned replies in order. Used by the fake
/// application state and the tests.
#[derive(Default)]
pub struct ScriptedPlanClient {
    analyses: Mutex<VecDeque<Result<AiResponse, PlanError>>>,
    finals: Mutex<VecDeque<Result<DietPlan, PlanError>>>,
    finalize_calls: Mutex<Vec<Answers>>,
}

impl ScriptedPlanClient {
    pub async fn push_analysis(&self, reply: Result<AiResponse, PlanError>) {
        self.analyses.lock().await.push_back(reply);
    }

    pub async fn push_final(&self, reply: Result<DietPlan, PlanError>) {
        self.finals.lock().await.push_back(reply);
    }

    /// Answers passed to every `finalize` call so far.
    pub async fn finalize_calls(&self) -> Vec<Answers> {
        self.finalize_calls.lock().await.clone()
    }
}

#[async_trait]
impl PlanClient for ScriptedPlanClient {
    async fn analyze(&self, _profile: &UserProfile) -> Result<AiResponse, PlanError> {
        self.analyses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(PlanError::Transport("no scripted analysis".into())))
    }

    async fn finalize(
        &self,
        _profile: &UserProfile,
        answers: &Answers,
    ) -> Result<DietPlan, PlanError> {
        self.finalize_calls.lock().await.push(answers.clone());
        self.finals
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(PlanError::Transport("no scripted plan".into())))
    }
}
