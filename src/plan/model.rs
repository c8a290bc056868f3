use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    Lose,
    Maintain,
    Gain,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl ActivityLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
        }
    }
}

impl Goal {
    pub fn as_str(self) -> &'static str {
        match self {
            Goal::Lose => "lose",
            Goal::Maintain => "maintain",
            Goal::Gain => "gain",
        }
    }
}

/// Form input captured at the start of a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub age: u32,
    pub gender: Gender,
    pub weight: f64, // kg
    pub height: f64, // cm
    pub activity_level: ActivityLevel,
    pub goal: Goal,
    #[serde(default)]
    pub restrictions: BTreeSet<String>,
    #[serde(default)]
    pub allergies: String,
    #[serde(default)]
    pub disliked_foods: String,
    #[serde(default)]
    pub medical_conditions: String,
    #[serde(default)]
    pub extra_notes: String,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProfileError {
    #[error("age must be between 1 and 120")]
    Age,
    #[error("weight must be between 20 and 300 kg")]
    Weight,
    #[error("height must be between 100 and 250 cm")]
    Height,
}

impl UserProfile {
    pub fn validate(&self) -> Result<(), ProfileError> {
        if !(1..=120).contains(&self.age) {
            return Err(ProfileError::Age);
        }
        if !(20.0..=300.0).contains(&self.weight) {
            return Err(ProfileError::Weight);
        }
        if !(100.0..=250.0).contains(&self.height) {
            return Err(ProfileError::Height);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Macros {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    /// Join key for favorites; unique across the whole plan.
    pub id: String,
    pub time: String,
    pub dish: String,
    pub description: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternatives: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DayPlan {
    pub day: String,
    pub meals: Vec<Meal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DietPlan {
    pub summary: String,
    pub daily_calories: f64,
    pub macros: Macros,
    pub weekly_plan: Vec<DayPlan>,
    pub tips: Vec<String>,
}

pub const DAYS_PER_PLAN: usize = 7;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanShapeError {
    #[error("plan must cover {DAYS_PER_PLAN} days, got {0}")]
    DayCount(usize),
    #[error("meal id `{0}` appears more than once")]
    DuplicateMealId(String),
    #[error("meal id must not be empty")]
    EmptyMealId,
}

impl DietPlan {
    pub fn meals(&self) -> impl Iterator<Item = &Meal> {
        self.weekly_plan.iter().flat_map(|d| d.meals.iter())
    }

    /// Checks the invariants the rest of the service relies on.
    pub fn validate(&self) -> Result<(), PlanShapeError> {
        if self.weekly_plan.len() != DAYS_PER_PLAN {
            return Err(PlanShapeError::DayCount(self.weekly_plan.len()));
        }
        let mut seen = HashSet::new();
        for meal in self.meals() {
            if meal.id.trim().is_empty() {
                return Err(PlanShapeError::EmptyMealId);
            }
            if !seen.insert(meal.id.as_str()) {
                return Err(PlanShapeError::DuplicateMealId(meal.id.clone()));
            }
        }
        Ok(())
    }
}

/// Reply of the analysis call: either follow-up questions or a finished plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AiResponse {
    Questions { questions: Vec<String> },
    Plan { plan: DietPlan },
}
