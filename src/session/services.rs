use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use super::machine::{Action, Effect, SessionError, SessionState};
use super::store::SessionStore;
use crate::planner::PlanClient;

pub const ANALYSIS_FAILED: &str = "Analiz sırasında bir hata oluştu";
pub const FINALIZE_FAILED: &str = "Diyet planı oluşturulamadı. Lütfen tekrar deneyin.";

/// Calls the provider for `effect` and turns the outcome into the
/// completion action.
pub async fn run_effect(planner: &dyn PlanClient, effect: Effect) -> Action {
    match effect {
        Effect::Analyze(profile) => match planner.analyze(&profile).await {
            Ok(reply) => Action::Analyzed(reply),
            Err(e) => {
                warn!(error = %e, "analysis request failed");
                Action::RequestFailed(format!("{ANALYSIS_FAILED}: {e}"))
            }
        },
        Effect::Finalize(profile, answers) => match planner.finalize(&profile, &answers).await {
            Ok(plan) => Action::Finalized(plan),
            Err(e) => {
                warn!(error = %e, "final plan request failed");
                Action::RequestFailed(FINALIZE_FAILED.into())
            }
        },
    }
}

/// Applies `action` and, when it starts a provider call, waits for the call
/// and applies its completion. The call runs on its own task so a dropped
/// client connection cannot leave the session stuck in `Submitting`.
pub async fn dispatch(
    sessions: &SessionStore,
    planner: Arc<dyn PlanClient>,
    user_id: Uuid,
    action: Action,
) -> Result<SessionState, SessionError> {
    let t = sessions.apply(user_id, action).await?;
    let Some(effect) = t.effect else {
        return Ok(t.state);
    };

    let sessions = sessions.clone();
    let task = tokio::spawn(async move {
        let completion = run_effect(planner.as_ref(), effect).await;
        sessions.apply(user_id, completion).await
    });

    match task.await {
        Ok(done) => {
            let t = done?;
            info!(%user_id, state = t.state.name(), "session request completed");
            Ok(t.state)
        }
        Err(join_err) => {
            // The task panicked; the session is still `Submitting`.
            warn!(error = %join_err, %user_id, "session task aborted");
            Err(SessionError::InFlight)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::model::fixtures;
    use crate::plan::AiResponse;
    use crate::planner::{Answers, PlanError, ScriptedPlanClient};

    #[tokio::test]
    async fn analysis_failure_lands_in_failed_state() {
        let planner = Arc::new(ScriptedPlanClient::default());
        planner
            .push_analysis(Err(PlanError::Transport("timeout".into())))
            .await;
        let sessions = SessionStore::default();
        let id = Uuid::new_v4();

        let state = dispatch(
            &sessions,
            planner,
            id,
            Action::SubmitProfile(fixtures::profile()),
        )
        .await
        .unwrap();

        match state {
            SessionState::Failed { message } => {
                assert!(message.starts_with(ANALYSIS_FAILED));
                assert!(message.contains("timeout"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn questions_then_answers_produce_a_plan() {
        let planner = Arc::new(ScriptedPlanClient::default());
        planner
            .push_analysis(Ok(AiResponse::Questions {
                questions: vec!["Bütçeniz nedir?".into()],
            }))
            .await;
        planner.push_final(Ok(fixtures::plan())).await;
        let sessions = SessionStore::default();
        let id = Uuid::new_v4();

        let state = dispatch(
            &sessions,
            planner.clone(),
            id,
            Action::SubmitProfile(fixtures::profile()),
        )
        .await
        .unwrap();
        assert!(matches!(state, SessionState::AwaitingAnswers { ref questions, .. } if questions.len() == 1));

        let mut answers = Answers::new();
        answers.insert("Bütçeniz nedir?".into(), "Orta".into());
        let state = dispatch(&sessions, planner.clone(), id, Action::SubmitAnswers(answers.clone()))
            .await
            .unwrap();
        assert!(state.plan().is_some());
        assert_eq!(planner.finalize_calls().await, vec![answers]);
    }

    #[tokio::test]
    async fn finalize_failure_uses_fixed_message() {
        let planner = Arc::new(ScriptedPlanClient::default());
        planner
            .push_analysis(Ok(AiResponse::Questions {
                questions: vec!["Q".into()],
            }))
            .await;
        planner
            .push_final(Err(PlanError::Malformed("bad".into())))
            .await;
        let sessions = SessionStore::default();
        let id = Uuid::new_v4();
        dispatch(&sessions, planner.clone(), id, Action::SubmitProfile(fixtures::profile()))
            .await
            .unwrap();

        let mut answers = Answers::new();
        answers.insert("Q".into(), "A".into());
        let state = dispatch(&sessions, planner, id, Action::SubmitAnswers(answers))
            .await
            .unwrap();
        assert_eq!(
            state,
            SessionState::Failed {
                message: FINALIZE_FAILED.into()
            }
        );
    }
}
