use serde::{Deserialize, Serialize};

use super::machine::SessionState;
use crate::plan::{
    nutrition::{basal_metabolic_rate, day_totals, macro_split, DayTotal, MacroShare},
    DietPlan, UserProfile,
};
use crate::planner::Answers;

#[derive(Debug, Deserialize)]
pub struct AnswersRequest {
    pub answers: Answers,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub profile: UserProfile,
    pub plan: DietPlan,
    pub basal_metabolic_rate: i64,
    pub macro_split: Vec<MacroShare>,
    pub day_totals: Vec<DayTotal>,
}

impl Dashboard {
    pub fn new(profile: &UserProfile, plan: &DietPlan) -> Self {
        Self {
            basal_metabolic_rate: basal_metabolic_rate(profile),
            macro_split: macro_split(&plan.macros),
            day_totals: day_totals(plan),
            profile: profile.clone(),
            plan: plan.clone(),
        }
    }
}

/// The one thing the client should render.
#[derive(Debug, Serialize)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum SessionView {
    Form,
    Loading,
    Error { message: String },
    Questions { questions: Vec<String> },
    Dashboard(Box<Dashboard>),
    Tracker,
}

impl From<&SessionState> for SessionView {
    fn from(state: &SessionState) -> Self {
        match state {
            SessionState::Idle => SessionView::Form,
            SessionState::Submitting { .. } => SessionView::Loading,
            SessionState::Failed { message } => SessionView::Error {
                message: message.clone(),
            },
            SessionState::AwaitingAnswers { questions, .. } => SessionView::Questions {
                questions: questions.clone(),
            },
            SessionState::PlanReady { profile, plan } => {
                SessionView::Dashboard(Box::new(Dashboard::new(profile, plan)))
            }
            SessionState::TrackerOpen => SessionView::Tracker,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ShoppingListResponse {
    pub items: Vec<String>,
}
