use std::collections::BTreeMap;

/// A purchasable food with a unit cost and per-unit nutrient amounts.
///
/// Nutrients missing from `nutrients` count as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct FoodItem {
    pub name: String,

    /// Currency units per unit quantity.
    pub cost: f64,

    pub nutrients: BTreeMap<String, f64>,
}

impl FoodItem {
    pub fn new(name: impl Into<String>, cost: f64) -> Self {
        Self {
            name: name.into(),
            cost,
            nutrients: BTreeMap::new(),
        }
    }

    /// Builder-style helper used by tests and the CSV loader.
    pub fn with_nutrient(mut self, nutrient: impl Into<String>, amount: f64) -> Self {
        self.nutrients.insert(nutrient.into(), amount);
        self
    }

    /// Amount of `nutrient` in one unit of this food.
    #[inline]
    pub fn amount(&self, nutrient: &str) -> f64 {
        self.nutrients.get(nutrient).copied().unwrap_or(0.0)
    }

    /// Non-negative finite cost and nutrient amounts.
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
            && self.cost.is_finite()
            && self.cost >= 0.0
            && self
                .nutrients
                .values()
                .all(|v| v.is_finite() && *v >= 0.0)
    }

    /// Debug string for logging.
    pub fn debug_string(&self) -> String {
        let nutrients: Vec<String> = self
            .nutrients
            .iter()
            .map(|(k, v)| format!("{}:{}", k, v))
            .collect();
        format!("{}: cost {} [{}]", self.name, self.cost, nutrients.join(" "))
    }
}
