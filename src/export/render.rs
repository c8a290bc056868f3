use askama::Template;
use time::{macros::format_description, Date};

use crate::plan::{
    nutrition::{basal_metabolic_rate, day_calories, macro_split, MacroKind},
    shopping::shopping_list,
    DietPlan, Meal, UserProfile,
};

pub fn file_name(profile: &UserProfile) -> String {
    format!("NutriAI_Diyet_Plani_{}yas.html", profile.age)
}

#[derive(Template)]
#[template(path = "export/plan.html")]
pub struct PlanDocument {
    pub title: String,
    pub generated_on: String,
    pub summary: String,
    pub daily_calories: String,
    pub basal_metabolic_rate: i64,
    pub macro_split: Vec<MacroRow>,
    pub days: Vec<DaySection>,
    pub tips: Vec<String>,
    pub shopping_list: Vec<String>,
}

pub struct MacroRow {
    pub label: &'static str,
    pub grams: String,
    pub percent: String,
}

pub struct DaySection {
    pub label: String,
    pub calories: String,
    pub meals: Vec<MealSection>,
}

pub struct MealSection {
    pub time: String,
    pub dish: String,
    pub description: String,
    pub nutrients: String,
    pub details: String,
    pub ingredients: Vec<String>,
    pub alternatives: Vec<String>,
}

fn macro_label(kind: MacroKind) -> &'static str {
    match kind {
        MacroKind::Protein => "Protein",
        MacroKind::Carbs => "Karbonhidrat",
        MacroKind::Fat => "Yağ",
    }
}

fn whole(n: f64) -> String {
    format!("{n:.0}")
}

impl From<&Meal> for MealSection {
    fn from(m: &Meal) -> Self {
        let details = [
            m.prep_time.as_deref().map(|t| format!("Hazırlık: {t}")),
            m.servings.as_deref().map(|s| format!("Porsiyon: {s}")),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" · ");

        Self {
            time: m.time.clone(),
            dish: m.dish.clone(),
            description: m.description.clone(),
            nutrients: format!(
                "{} kcal · P {} g · K {} g · Y {} g",
                whole(m.calories),
                whole(m.protein),
                whole(m.carbs),
                whole(m.fat)
            ),
            details,
            ingredients: m.ingredients.clone().unwrap_or_default(),
            alternatives: m.alternatives.clone().unwrap_or_default(),
        }
    }
}

impl PlanDocument {
    pub fn new(profile: &UserProfile, plan: &DietPlan, generated_on: Date) -> Self {
        let generated_on = generated_on
            .format(format_description!("[day].[month].[year]"))
            .unwrap_or_else(|_| generated_on.to_string());

        Self {
            title: format!("NutriAI Diyet Planı ({} yaş)", profile.age),
            generated_on,
            summary: plan.summary.clone(),
            daily_calories: whole(plan.daily_calories),
            basal_metabolic_rate: basal_metabolic_rate(profile),
            macro_split: macro_split(&plan.macros)
                .into_iter()
                .map(|s| MacroRow {
                    label: macro_label(s.kind),
                    grams: whole(s.grams),
                    percent: whole(s.percent),
                })
                .collect(),
            days: plan
                .weekly_plan
                .iter()
                .map(|d| DaySection {
                    label: d.day.clone(),
                    calories: whole(day_calories(d)),
                    meals: d.meals.iter().map(MealSection::from).collect(),
                })
                .collect(),
            tips: plan.tips.clone(),
            shopping_list: shopping_list(plan),
        }
    }
}
