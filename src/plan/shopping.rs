//! Shopping list derived from the ingredient lines of a weekly plan.
//!
//! Lines are expected to look like `"2 adet elma"` or `"100g tavuk"`. The
//! unit vocabulary is fixed; anything else after the number becomes part of
//! the item name, and no unit conversion is attempted.

use std::collections::BTreeMap;
use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use super::model::DietPlan;

lazy_static! {
    static ref INGREDIENT_RE: Regex = Regex::new(
        r"(?is)^(\d+(?:\.\d+)?)\s*(?:(kg|g|adet|ml|lt|kase|bardak|yemek kaşığı|çay kaşığı)(?:\s+|$))?(.*)$"
    )
    .unwrap();
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ShoppingItem {
    pub item: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub quantity: f64,
}

impl fmt::Display for ShoppingItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.quantity)?;
        if let Some(unit) = &self.unit {
            write!(f, " {unit}")?;
        }
        if !self.item.is_empty() {
            write!(f, " {}", self.item)?;
        }
        Ok(())
    }
}

/// Splits one ingredient line into quantity, unit and item.
/// Returns `None` for blank lines.
pub fn parse_line(line: &str) -> Option<ShoppingItem> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let Some(caps) = INGREDIENT_RE.captures(line) else {
        return Some(ShoppingItem {
            item: line.to_lowercase(),
            unit: None,
            quantity: 1.0,
        });
    };
    let quantity = caps[1].parse::<f64>().unwrap_or(1.0);
    let unit = caps.get(2).map(|u| u.as_str().to_lowercase());
    let item = caps
        .get(3)
        .map(|m| m.as_str().trim().to_lowercase())
        .unwrap_or_default();
    Some(ShoppingItem {
        item,
        unit,
        quantity,
    })
}

/// Sums quantities per `item + unit`, ordered by item then unit.
pub fn aggregate<'a, I>(lines: I) -> Vec<ShoppingItem>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut totals: BTreeMap<(String, Option<String>), f64> = BTreeMap::new();
    for parsed in lines.into_iter().filter_map(parse_line) {
        *totals.entry((parsed.item, parsed.unit)).or_insert(0.0) += parsed.quantity;
    }
    totals
        .into_iter()
        .map(|((item, unit), quantity)| ShoppingItem {
            item,
            unit,
            quantity,
        })
        .collect()
}

pub fn ingredient_lines(plan: &DietPlan) -> impl Iterator<Item = &str> {
    plan.meals()
        .filter_map(|m| m.ingredients.as_ref())
        .flatten()
        .map(String::as_str)
}

pub fn shopping_list(plan: &DietPlan) -> Vec<String> {
    aggregate(ingredient_lines(plan))
        .iter()
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::model::fixtures;

    fn render(lines: &[&str]) -> Vec<String> {
        aggregate(lines.iter().copied())
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn mixed_lines_keep_distinct_keys() {
        assert_eq!(
            render(&["2 adet elma", "100g tavuk", "elma"]),
            vec!["1 elma", "2 adet elma", "100 g tavuk"]
        );
    }

    #[test]
    fn same_item_and_unit_are_summed_across_meals() {
        assert_eq!(
            render(&["100 g Tavuk", "150G tavuk", "1.5 lt süt", "0.5 LT süt"]),
            vec!["2 lt süt", "250 g tavuk"]
        );
    }

    #[test]
    fn unit_must_be_a_whole_token() {
        let parsed = parse_line("200 gram un").unwrap();
        assert_eq!(parsed.unit, None);
        assert_eq!(parsed.item, "gram un");
        assert_eq!(parsed.quantity, 200.0);

        let parsed = parse_line("2 yemek kaşığı zeytinyağı").unwrap();
        assert_eq!(parsed.unit.as_deref(), Some("yemek kaşığı"));
        assert_eq!(parsed.item, "zeytinyağı");
    }

    #[test]
    fn lines_without_a_number_count_once() {
        let parsed = parse_line("  Bir Tutam Tuz ").unwrap();
        assert_eq!(parsed.quantity, 1.0);
        assert_eq!(parsed.item, "bir tutam tuz");
        assert!(parse_line("   ").is_none());
    }

    #[test]
    fn output_is_sorted_and_unique() {
        let lines = [
            "3 adet yumurta",
            "yumurta",
            "1 adet yumurta",
            "50 g peynir",
            "2 bardak su",
            "peynir",
        ];
        let items = aggregate(lines.iter().copied());
        let keys: Vec<_> = items.iter().map(|i| (&i.item, &i.unit)).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(keys, sorted);

        let eggs = items
            .iter()
            .find(|i| i.item == "yumurta" && i.unit.as_deref() == Some("adet"))
            .unwrap();
        assert_eq!(eggs.quantity, 4.0);
    }

    #[test]
    fn plan_without_ingredients_contributes_nothing() {
        let plan = fixtures::plan();
        // every day has one meal with "2 adet yumurta" and one without ingredients
        assert_eq!(shopping_list(&plan), vec!["14 adet yumurta"]);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let plan = fixtures::plan();
        assert_eq!(shopping_list(&plan), shopping_list(&plan));
    }
}
