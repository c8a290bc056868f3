pub mod model;
pub mod nutrition;
pub mod shopping;

pub use model::{
    ActivityLevel, AiResponse, DayPlan, DietPlan, Gender, Goal, Macros, Meal, UserProfile,
};
