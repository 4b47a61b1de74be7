use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::catalog::FoodCatalog;
use crate::models::quantities::Quantities;

/// Outcome of a solve, reported as data rather than as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Unbounded,
    NotSolved,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SolveStatus::Optimal => "Optimal",
            SolveStatus::Infeasible => "Infeasible",
            SolveStatus::Unbounded => "Unbounded",
            SolveStatus::NotSolved => "Not Solved",
        };
        f.write_str(name)
    }
}

/// The answer to one optimize call.
///
/// `quantities` only holds foods with a strictly positive amount, in
/// catalog order. In the default integer mode every value is a whole number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Solution {
    pub status: SolveStatus,
    pub objective_value: Option<f64>,
    pub quantities: Quantities,
}

/// Per-food nutrient amounts contributed by the selected quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct FoodContribution {
    pub food_name: String,
    pub quantity: f64,
    pub cost: f64,
    pub amounts: Vec<(String, f64)>,
}

impl Solution {
    pub fn optimal(objective_value: f64, quantities: Quantities) -> Self {
        Self {
            status: SolveStatus::Optimal,
            objective_value: Some(objective_value),
            quantities,
        }
    }

    /// A non-optimal result carries no objective and no quantities.
    pub fn without_solution(status: SolveStatus) -> Self {
        Self {
            status,
            objective_value: None,
            quantities: Quantities::new(),
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }

    /// Total selected units across all foods.
    pub fn total_units(&self) -> f64 {
        self.quantities.values().sum()
    }

    /// Total amount of every nutrient present in the selection.
    pub fn nutrient_totals(&self, catalog: &FoodCatalog) -> BTreeMap<String, f64> {
        let mut totals = BTreeMap::new();
        for (name, qty) in self.quantities.iter() {
            if let Some(food) = catalog.get(name) {
                for (nutrient, amount) in &food.nutrients {
                    *totals.entry(nutrient.clone()).or_insert(0.0) += amount * qty;
                }
            }
        }
        totals
    }

    /// Total of a single nutrient across the selection.
    pub fn nutrient_total(&self, catalog: &FoodCatalog, nutrient: &str) -> f64 {
        self.quantities
            .iter()
            .filter_map(|(name, qty)| catalog.get(name).map(|f| f.amount(nutrient) * qty))
            .sum()
    }

    /// Break the selection down per food for the given nutrients,
    /// in catalog order.
    pub fn contributions(&self, catalog: &FoodCatalog, nutrients: &[&str]) -> Vec<FoodContribution> {
        catalog
            .iter()
            .filter_map(|food| {
                let qty = *self.quantities.get(&food.name)?;
                Some(FoodContribution {
                    food_name: food.name.clone(),
                    quantity: qty,
                    cost: food.cost * qty,
                    amounts: nutrients
                        .iter()
                        .map(|n| (n.to_string(), food.amount(n) * qty))
                        .collect(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FoodItem;

    fn catalog() -> FoodCatalog {
        FoodCatalog::new(vec![
            FoodItem::new("apple", 0.5)
                .with_nutrient("calories", 95.0)
                .with_nutrient("protein", 0.5),
            FoodItem::new("chicken_breast", 2.0)
                .with_nutrient("calories", 165.0)
                .with_nutrient("protein", 31.0),
        ])
        .unwrap()
    }

    fn sample_solution() -> Solution {
        let q: Quantities = [("apple", 2.0), ("chicken_breast", 1.0)].into_iter().collect();
        Solution::optimal(3.0, q)
    }

    #[test]
    fn test_without_solution_is_empty() {
        let s = Solution::without_solution(SolveStatus::Infeasible);
        assert!(!s.is_optimal());
        assert!(s.objective_value.is_none());
        assert!(s.quantities.is_empty());
    }

    #[test]
    fn test_nutrient_totals() {
        let totals = sample_solution().nutrient_totals(&catalog());
        assert!((totals["calories"] - 355.0).abs() < 1e-9);
        assert!((totals["protein"] - 32.0).abs() < 1e-9);
    }

    #[test]
    fn test_contributions_follow_catalog_order() {
        let rows = sample_solution().contributions(&catalog(), &["protein"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].food_name, "apple");
        assert_eq!(rows[1].amounts[0], ("protein".to_string(), 31.0));
        assert!((rows[0].cost - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(sample_solution()).unwrap();
        assert_eq!(json["status"], "Optimal");
        assert_eq!(json["objective_value"], 3.0);
        assert_eq!(json["quantities"]["apple"], 2);

        let none = serde_json::to_value(Solution::without_solution(SolveStatus::NotSolved)).unwrap();
        assert!(none["objective_value"].is_null());
        assert_eq!(none["status"], "NotSolved");
    }

    #[test]
    fn test_status_display() {
        assert_eq!(SolveStatus::NotSolved.to_string(), "Not Solved");
        assert_eq!(SolveStatus::Optimal.to_string(), "Optimal");
    }
}
