use std::{collections::HashMap, sync::Arc};

use tokio::sync::Mutex;
use uuid::Uuid;

use super::machine::{transition, Action, SessionError, SessionState, Transition};
use crate::plan::{DietPlan, UserProfile};

/// In-memory session state per account. Sessions do not survive a restart.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<Uuid, SessionState>>>,
}

impl SessionStore {
    pub async fn snapshot(&self, user_id: Uuid) -> SessionState {
        self.inner
            .lock()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Runs one transition under the lock and commits the resulting state.
    pub async fn apply(
        &self,
        user_id: Uuid,
        action: Action,
    ) -> Result<Transition, SessionError> {
        let mut sessions = self.inner.lock().await;
        let current = sessions.entry(user_id).or_default();
        let t = transition(current, action)?;
        *current = t.state.clone();
        Ok(t)
    }

    pub async fn current_plan(&self, user_id: Uuid) -> Option<DietPlan> {
        self.inner
            .lock()
            .await
            .get(&user_id)
            .and_then(SessionState::plan)
            .map(|(_, plan)| plan.clone())
    }

    pub async fn current_profile_and_plan(
        &self,
        user_id: Uuid,
    ) -> Option<(UserProfile, DietPlan)> {
        self.inner
            .lock()
            .await
            .get(&user_id)
            .and_then(SessionState::plan)
            .map(|(profile, plan)| (profile.clone(), plan.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::model::fixtures;
    use crate::plan::AiResponse;

    #[tokio::test]
    async fn sessions_are_independent_per_account() {
        let store = SessionStore::default();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        store
            .apply(a, Action::SubmitProfile(fixtures::profile()))
            .await
            .unwrap();
        store
            .apply(
                a,
                Action::Analyzed(AiResponse::Plan {
                    plan: fixtures::plan(),
                }),
            )
            .await
            .unwrap();

        assert!(store.current_plan(a).await.is_some());
        assert!(store.current_plan(b).await.is_none());
        assert_eq!(store.snapshot(b).await, SessionState::Idle);
    }

    #[tokio::test]
    async fn rejected_action_leaves_state_untouched() {
        let store = SessionStore::default();
        let id = Uuid::new_v4();
        store
            .apply(id, Action::SubmitProfile(fixtures::profile()))
            .await
            .unwrap();
        let before = store.snapshot(id).await;
        assert!(store.apply(id, Action::Reset).await.is_err());
        assert_eq!(store.snapshot(id).await, before);
    }
}
