use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::plan::{DietPlan, Meal};

/// Favorite meal ids. Ids from an older plan simply match nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct FavoriteMeals(BTreeSet<String>);

impl FavoriteMeals {
    pub fn contains(&self, meal_id: &str) -> bool {
        self.0.contains(meal_id)
    }

    /// Flips membership and returns whether the meal is now a favorite.
    pub fn toggle(&mut self, meal_id: &str) -> bool {
        if self.0.remove(meal_id) {
            false
        } else {
            self.0.insert(meal_id.to_string());
            true
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Favorite meals of `plan`, in plan order.
    pub fn meals_in<'p>(&self, plan: &'p DietPlan) -> Vec<&'p Meal> {
        plan.meals().filter(|m| self.contains(&m.id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::model::fixtures;

    #[test]
    fn double_toggle_restores_the_set() {
        let mut favs = FavoriteMeals::default();
        favs.toggle("gun1-kahvalti");
        let before = favs.clone();

        assert!(favs.toggle("gun2-aksam"));
        assert!(!favs.toggle("gun2-aksam"));
        assert_eq!(favs, before);

        assert!(!favs.toggle("gun1-kahvalti"));
        assert!(favs.toggle("gun1-kahvalti"));
        assert_eq!(favs, before);
    }

    #[test]
    fn stale_ids_match_nothing() {
        let plan = fixtures::plan();
        let mut favs = FavoriteMeals::default();
        favs.toggle("old-plan-meal");
        favs.toggle("gun3-aksam");
        favs.toggle("gun1-kahvalti");

        let dishes: Vec<_> = favs.meals_in(&plan).iter().map(|m| m.id.as_str()).collect();
        assert_eq!(dishes, vec!["gun1-kahvalti", "gun3-aksam"]);
    }

    #[test]
    fn stored_as_plain_array() {
        let mut favs = FavoriteMeals::default();
        favs.toggle("b");
        favs.toggle("a");
        assert_eq!(serde_json::to_string(&favs).unwrap(), r#"["a","b"]"#);
    }
}
