//! Response schemas sent with each request so the provider returns JSON
//! matching `AiResponse` / `DietPlan`.

use serde_json::{json, Value};

fn string_list(description: &str) -> Value {
    json!({ "type": "ARRAY", "items": { "type": "STRING" }, "description": description })
}

fn meal() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "id": { "type": "STRING", "description": "Plan genelinde benzersiz öğün id'si" },
            "time": { "type": "STRING" },
            "dish": { "type": "STRING" },
            "description": { "type": "STRING" },
            "calories": { "type": "NUMBER" },
            "protein": { "type": "NUMBER" },
            "carbs": { "type": "NUMBER" },
            "fat": { "type": "NUMBER" },
            "prepTime": { "type": "STRING", "description": "Hazırlık süresi (ör. 20 dakika)" },
            "servings": { "type": "STRING", "description": "Porsiyon bilgisi (ör. 1 porsiyon)" },
            "ingredients": string_list("Malzemeler"),
            "alternatives": string_list("Alternatifler")
        },
        "required": ["id", "time", "dish", "description", "calories", "protein", "carbs", "fat"]
    })
}

pub fn plan_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": { "type": "STRING" },
            "dailyCalories": { "type": "NUMBER" },
            "macros": {
                "type": "OBJECT",
                "properties": {
                    "protein": { "type": "NUMBER" },
                    "carbs": { "type": "NUMBER" },
                    "fat": { "type": "NUMBER" }
                },
                "required": ["protein", "carbs", "fat"]
            },
            "weeklyPlan": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "day": { "type": "STRING" },
                        "meals": { "type": "ARRAY", "items": meal() }
                    },
                    "required": ["day", "meals"]
                }
            },
            "tips": string_list("Öneriler")
        },
        "required": ["summary", "dailyCalories", "macros", "weeklyPlan", "tips"]
    })
}

pub fn analysis_schema() -> Value {
    let mut plan = plan_schema();
    plan["description"] = json!("type 'plan' ise eksiksiz diyet planı");
    json!({
        "type": "OBJECT",
        "properties": {
            "type": { "type": "STRING", "enum": ["questions", "plan"] },
            "questions": string_list("type 'questions' ise sorulacak 2-3 soru"),
            "plan": plan
        },
        "required": ["type"]
    })
}
