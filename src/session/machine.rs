//! Planning session of one account, modelled as a single state value.
//!
//! `transition` is pure: it never calls the AI provider itself. When a step
//! needs the provider it returns an [`Effect`]; the caller runs it and feeds
//! the outcome back as `Analyzed`, `Finalized` or `RequestFailed`.

use crate::plan::{AiResponse, DietPlan, UserProfile};
use crate::planner::Answers;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Analyzing,
    Finalizing,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Submitting {
        profile: UserProfile,
        step: Step,
    },
    AwaitingAnswers {
        profile: UserProfile,
        questions: Vec<String>,
    },
    PlanReady {
        profile: UserProfile,
        plan: DietPlan,
    },
    Failed {
        message: String,
    },
    TrackerOpen,
}

/// What the client renders for a state. Exactly one per state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Form,
    Loading,
    Error,
    Questions,
    Dashboard,
    Tracker,
}

#[derive(Debug, Clone)]
pub enum Action {
    SubmitProfile(UserProfile),
    SubmitAnswers(Answers),
    Analyzed(AiResponse),
    Finalized(DietPlan),
    RequestFailed(String),
    ToggleTracker,
    Reset,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Analyze(UserProfile),
    Finalize(UserProfile, Answers),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: SessionState,
    pub effect: Option<Effect>,
}

impl Transition {
    fn to(state: SessionState) -> Self {
        Self {
            state,
            effect: None,
        }
    }

    fn with(state: SessionState, effect: Effect) -> Self {
        Self {
            state,
            effect: Some(effect),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error("a plan request is already in progress")]
    InFlight,
    #[error("cannot {action} while the session is {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
    #[error("question `{0}` has no answer")]
    MissingAnswer(String),
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Submitting { .. } => "submitting",
            SessionState::AwaitingAnswers { .. } => "awaiting answers",
            SessionState::PlanReady { .. } => "showing a plan",
            SessionState::Failed { .. } => "failed",
            SessionState::TrackerOpen => "showing the tracker",
        }
    }

    pub fn view(&self) -> ViewKind {
        match self {
            SessionState::Idle => ViewKind::Form,
            SessionState::Submitting { .. } => ViewKind::Loading,
            SessionState::AwaitingAnswers { .. } => ViewKind::Questions,
            SessionState::PlanReady { .. } => ViewKind::Dashboard,
            SessionState::Failed { .. } => ViewKind::Error,
            SessionState::TrackerOpen => ViewKind::Tracker,
        }
    }

    pub fn plan(&self) -> Option<(&UserProfile, &DietPlan)> {
        match self {
            SessionState::PlanReady { profile, plan } => Some((profile, plan)),
            _ => None,
        }
    }
}

impl Action {
    fn name(&self) -> &'static str {
        match self {
            Action::SubmitProfile(_) => "submit a profile",
            Action::SubmitAnswers(_) => "submit answers",
            Action::Analyzed(_) => "accept an analysis",
            Action::Finalized(_) => "accept a plan",
            Action::RequestFailed(_) => "record a failure",
            Action::ToggleTracker => "toggle the tracker",
            Action::Reset => "reset",
        }
    }
}

/// Keeps only answers to the pending questions and requires all of them.
fn collect_answers(questions: &[String], mut given: Answers) -> Result<Answers, SessionError> {
    let mut answers = Answers::new();
    for q in questions {
        match given.remove(q).map(|a| a.trim().to_string()) {
            Some(a) if !a.is_empty() => {
                answers.insert(q.clone(), a);
            }
            _ => return Err(SessionError::MissingAnswer(q.clone())),
        }
    }
    Ok(answers)
}

pub fn transition(current: &SessionState, action: Action) -> Result<Transition, SessionError> {
    use SessionState as S;

    let invalid = |action: &Action| SessionError::InvalidTransition {
        action: action.name(),
        state: current.name(),
    };

    match (current, action) {
        (S::Submitting { .. }, Action::SubmitProfile(_) | Action::SubmitAnswers(_)) => {
            Err(SessionError::InFlight)
        }
        (_, Action::SubmitProfile(profile)) => Ok(Transition::with(
            S::Submitting {
                profile: profile.clone(),
                step: Step::Analyzing,
            },
            Effect::Analyze(profile),
        )),

        (S::AwaitingAnswers { profile, questions }, Action::SubmitAnswers(given)) => {
            let answers = collect_answers(questions, given)?;
            Ok(Transition::with(
                S::Submitting {
                    profile: profile.clone(),
                    step: Step::Finalizing,
                },
                Effect::Finalize(profile.clone(), answers),
            ))
        }
        // Nothing to answer: ignored.
        (_, Action::SubmitAnswers(_)) => Ok(Transition::to(current.clone())),

        (
            S::Submitting {
                profile,
                step: Step::Analyzing,
            },
            Action::Analyzed(reply),
        ) => Ok(Transition::to(match reply {
            AiResponse::Questions { questions } => S::AwaitingAnswers {
                profile: profile.clone(),
                questions,
            },
            AiResponse::Plan { plan } => S::PlanReady {
                profile: profile.clone(),
                plan,
            },
        })),
        (
            S::Submitting {
                profile,
                step: Step::Finalizing,
            },
            Action::Finalized(plan),
        ) => Ok(Transition::to(S::PlanReady {
            profile: profile.clone(),
            plan,
        })),
        (S::Submitting { .. }, Action::RequestFailed(message)) => {
            Ok(Transition::to(S::Failed { message }))
        }

        (S::Idle | S::PlanReady { .. } | S::Failed { .. }, Action::ToggleTracker) => {
            Ok(Transition::to(S::TrackerOpen))
        }
        (S::TrackerOpen, Action::ToggleTracker) => Ok(Transition::to(S::Idle)),

        (S::Submitting { .. }, action @ Action::Reset) => Err(invalid(&action)),
        (_, Action::Reset) => Ok(Transition::to(S::Idle)),

        (_, action) => Err(invalid(&action)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::model::fixtures;

    fn questions() -> Vec<String> {
        vec!["Bütçeniz nedir?".into()]
    }

    fn awaiting() -> SessionState {
        SessionState::AwaitingAnswers {
            profile: fixtures::profile(),
            questions: questions(),
        }
    }

    fn ready() -> SessionState {
        SessionState::PlanReady {
            profile: fixtures::profile(),
            plan: fixtures::plan(),
        }
    }

    fn analyzing() -> SessionState {
        SessionState::Submitting {
            profile: fixtures::profile(),
            step: Step::Analyzing,
        }
    }

    fn apply(s: &SessionState, a: Action) -> SessionState {
        transition(s, a).unwrap().state
    }

    #[test]
    fn profile_submission_starts_analysis() {
        let t = transition(
            &SessionState::Idle,
            Action::SubmitProfile(fixtures::profile()),
        )
        .unwrap();
        assert_eq!(t.state, analyzing());
        assert_eq!(t.effect, Some(Effect::Analyze(fixtures::profile())));
    }

    #[test]
    fn profile_submission_clears_error_and_tracker() {
        for from in [
            SessionState::Failed {
                message: "x".into(),
            },
            SessionState::TrackerOpen,
            ready(),
            awaiting(),
        ] {
            let t = transition(&from, Action::SubmitProfile(fixtures::profile())).unwrap();
            assert_eq!(t.state.view(), ViewKind::Loading);
        }
    }

    #[test]
    fn second_submission_while_in_flight_is_rejected() {
        assert_eq!(
            transition(&analyzing(), Action::SubmitProfile(fixtures::profile())),
            Err(SessionError::InFlight)
        );
        assert_eq!(
            transition(&analyzing(), Action::SubmitAnswers(Answers::new())),
            Err(SessionError::InFlight)
        );
    }

    #[test]
    fn analysis_outcomes() {
        let s = apply(
            &analyzing(),
            Action::Analyzed(AiResponse::Questions {
                questions: questions(),
            }),
        );
        assert_eq!(s, awaiting());

        let s = apply(
            &analyzing(),
            Action::Analyzed(AiResponse::Plan {
                plan: fixtures::plan(),
            }),
        );
        assert_eq!(s, ready());

        let s = apply(&analyzing(), Action::RequestFailed("boom".into()));
        assert_eq!(
            s,
            SessionState::Failed {
                message: "boom".into()
            }
        );
    }

    #[test]
    fn answers_go_to_finalize() {
        let mut given = Answers::new();
        given.insert("Bütçeniz nedir?".into(), " Orta ".into());
        given.insert("Unrelated".into(), "ignored".into());

        let t = transition(&awaiting(), Action::SubmitAnswers(given)).unwrap();
        let mut expected = Answers::new();
        expected.insert("Bütçeniz nedir?".into(), "Orta".into());
        assert_eq!(
            t.effect,
            Some(Effect::Finalize(fixtures::profile(), expected))
        );

        let s = apply(&t.state, Action::Finalized(fixtures::plan()));
        assert_eq!(s, ready());
    }

    #[test]
    fn blank_answer_is_rejected() {
        let mut given = Answers::new();
        given.insert("Bütçeniz nedir?".into(), "   ".into());
        assert_eq!(
            transition(&awaiting(), Action::SubmitAnswers(given)),
            Err(SessionError::MissingAnswer("Bütçeniz nedir?".into()))
        );
    }

    #[test]
    fn answers_without_pending_questions_are_a_noop() {
        for from in [SessionState::Idle, ready(), SessionState::TrackerOpen] {
            let t = transition(&from, Action::SubmitAnswers(Answers::new())).unwrap();
            assert_eq!(t.state, from);
            assert!(t.effect.is_none());
        }
    }

    #[test]
    fn tracker_toggles_from_allowed_states_only() {
        for from in [
            SessionState::Idle,
            ready(),
            SessionState::Failed {
                message: "x".into(),
            },
        ] {
            let s = apply(&from, Action::ToggleTracker);
            assert_eq!(s, SessionState::TrackerOpen);
            assert_eq!(apply(&s, Action::ToggleTracker), SessionState::Idle);
        }
        assert!(transition(&awaiting(), Action::ToggleTracker).is_err());
        assert!(transition(&analyzing(), Action::ToggleTracker).is_err());
    }

    #[test]
    fn reset_returns_to_idle_except_in_flight() {
        for from in [
            SessionState::Idle,
            awaiting(),
            ready(),
            SessionState::Failed {
                message: "x".into(),
            },
            SessionState::TrackerOpen,
        ] {
            assert_eq!(apply(&from, Action::Reset), SessionState::Idle);
        }
        assert!(matches!(
            transition(&analyzing(), Action::Reset),
            Err(SessionError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn stray_completions_are_rejected() {
        assert!(transition(&SessionState::Idle, Action::Finalized(fixtures::plan())).is_err());
        assert!(transition(&ready(), Action::RequestFailed("late".into())).is_err());
        // a final plan cannot complete an analysis step
        assert!(transition(&analyzing(), Action::Finalized(fixtures::plan())).is_err());
    }

    #[test]
    fn every_reachable_state_has_one_consistent_view() {
        let actions = || {
            let mut answers = Answers::new();
            answers.insert("Bütçeniz nedir?".into(), "Orta".into());
            vec![
                Action::SubmitProfile(fixtures::profile()),
                Action::SubmitAnswers(answers),
                Action::Analyzed(AiResponse::Questions {
                    questions: questions(),
                }),
                Action::Analyzed(AiResponse::Plan {
                    plan: fixtures::plan(),
                }),
                Action::Finalized(fixtures::plan()),
                Action::RequestFailed("err".into()),
                Action::ToggleTracker,
                Action::Reset,
            ]
        };

        let mut frontier = vec![SessionState::Idle];
        let mut seen = 0usize;
        for _depth in 0..5 {
            let mut next = Vec::new();
            for state in &frontier {
                for action in actions() {
                    let Ok(t) = transition(state, action) else {
                        continue;
                    };
                    seen += 1;
                    let s = t.state;
                    match s.view() {
                        ViewKind::Dashboard => assert!(s.plan().is_some()),
                        ViewKind::Loading => {
                            assert!(matches!(s, SessionState::Submitting { .. }))
                        }
                        ViewKind::Tracker => assert!(s.plan().is_none()),
                        ViewKind::Form => assert_eq!(s, SessionState::Idle),
                        ViewKind::Error => assert!(matches!(s, SessionState::Failed { .. })),
                        ViewKind::Questions => {
                            assert!(matches!(s, SessionState::AwaitingAnswers { .. }))
                        }
                    }
                    if !next.contains(&s) {
                        next.push(s);
                    }
                }
            }
            frontier = next;
        }
        assert!(seen > 0);
    }
}
