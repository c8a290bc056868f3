use serde::Serialize;

use super::model::{DayPlan, DietPlan, Gender, Macros, UserProfile};

pub const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
pub const KCAL_PER_GRAM_CARBS: f64 = 4.0;
pub const KCAL_PER_GRAM_FAT: f64 = 9.0;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MacroKind {
    Protein,
    Carbs,
    Fat,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MacroShare {
    pub kind: MacroKind,
    pub grams: f64,
    pub calories: f64,
    pub percent: f64,
}

/// Share of each macro in the calories coming from macros.
/// Empty when the macros carry no calories; zero shares are dropped.
pub fn macro_split(m: &Macros) -> Vec<MacroShare> {
    let parts = [
        (MacroKind::Protein, m.protein, m.protein * KCAL_PER_GRAM_PROTEIN),
        (MacroKind::Carbs, m.carbs, m.carbs * KCAL_PER_GRAM_CARBS),
        (MacroKind::Fat, m.fat, m.fat * KCAL_PER_GRAM_FAT),
    ];
    let total: f64 = parts.iter().map(|(_, _, kcal)| kcal).sum();
    if total <= 0.0 {
        return Vec::new();
    }
    parts
        .into_iter()
        .filter(|(_, _, kcal)| *kcal > 0.0)
        .map(|(kind, grams, calories)| MacroShare {
            kind,
            grams,
            calories,
            percent: calories / total * 100.0,
        })
        .collect()
}

/// Mifflin-St Jeor estimate, rounded to whole kcal.
pub fn basal_metabolic_rate(p: &UserProfile) -> i64 {
    let base = 10.0 * p.weight + 6.25 * p.height - 5.0 * f64::from(p.age);
    let offset = match p.gender {
        Gender::Male => 5.0,
        Gender::Female | Gender::Other => -161.0,
    };
    (base + offset).round() as i64
}

pub fn day_calories(day: &DayPlan) -> f64 {
    day.meals
        .iter()
        .map(|m| m.calories)
        .filter(|c| c.is_finite())
        .sum()
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayTotal {
    pub day: String,
    pub calories: f64,
}

pub fn day_totals(plan: &DietPlan) -> Vec<DayTotal> {
    plan.weekly_plan
        .iter()
        .map(|d| DayTotal {
            day: d.day.clone(),
            calories: day_calories(d),
        })
        .collect()
}
