use std::fmt;

use serde::Serialize;

/// Which side of a nutrient total a bound limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    Min,
    Max,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Min => "min",
            Direction::Max => "max",
        }
    }
}

/// Every bound the optimizer recognizes on its input boundary.
///
/// The order of `ALL` fixes the order constraints are added to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum BoundKey {
    MinCalories,
    MaxCalories,
    MinProtein,
    MaxProtein,
    MinFat,
    MaxFat,
    MinCarbs,
    MaxCarbs,
    MinFiber,
    MaxSugars,
    MinVitaminC,
}

impl BoundKey {
    pub const ALL: [BoundKey; 11] = [
        BoundKey::MinCalories,
        BoundKey::MaxCalories,
        BoundKey::MinProtein,
        BoundKey::MaxProtein,
        BoundKey::MinFat,
        BoundKey::MaxFat,
        BoundKey::MinCarbs,
        BoundKey::MaxCarbs,
        BoundKey::MinFiber,
        BoundKey::MaxSugars,
        BoundKey::MinVitaminC,
    ];

    /// The raw input key, e.g. `min_calories`.
    pub fn key(&self) -> &'static str {
        match self {
            BoundKey::MinCalories => "min_calories",
            BoundKey::MaxCalories => "max_calories",
            BoundKey::MinProtein => "min_protein",
            BoundKey::MaxProtein => "max_protein",
            BoundKey::MinFat => "min_fat",
            BoundKey::MaxFat => "max_fat",
            BoundKey::MinCarbs => "min_carbs",
            BoundKey::MaxCarbs => "max_carbs",
            BoundKey::MinFiber => "min_fiber",
            BoundKey::MaxSugars => "max_sugars",
            BoundKey::MinVitaminC => "min_vitamin_c",
        }
    }

    /// Catalog nutrient the bound applies to.
    pub fn nutrient(&self) -> &'static str {
        match self {
            BoundKey::MinCalories | BoundKey::MaxCalories => "calories",
            BoundKey::MinProtein | BoundKey::MaxProtein => "protein",
            BoundKey::MinFat | BoundKey::MaxFat => "fat",
            BoundKey::MinCarbs | BoundKey::MaxCarbs => "carbs",
            BoundKey::MinFiber => "fiber",
            BoundKey::MaxSugars => "sugars",
            BoundKey::MinVitaminC => "vitamin_c",
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            BoundKey::MinCalories
            | BoundKey::MinProtein
            | BoundKey::MinFat
            | BoundKey::MinCarbs
            | BoundKey::MinFiber
            | BoundKey::MinVitaminC => Direction::Min,
            BoundKey::MaxCalories
            | BoundKey::MaxProtein
            | BoundKey::MaxFat
            | BoundKey::MaxCarbs
            | BoundKey::MaxSugars => Direction::Max,
        }
    }

    pub fn from_key(key: &str) -> Option<BoundKey> {
        BoundKey::ALL.into_iter().find(|k| k.key() == key)
    }

    pub fn bound(&self, threshold: f64) -> NutrientBound {
        NutrientBound::new(self.nutrient(), self.direction(), threshold)
    }
}

impl fmt::Display for BoundKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A min or max limit on the total of one nutrient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutrientBound {
    pub nutrient: String,
    pub direction: Direction,
    pub threshold: f64,
}

impl NutrientBound {
    pub fn new(nutrient: impl Into<String>, direction: Direction, threshold: f64) -> Self {
        Self {
            nutrient: nutrient.into(),
            direction,
            threshold,
        }
    }

    /// Constraint label, e.g. `MinCalories` or `MaxSugars`.
    pub fn name(&self) -> String {
        let prefix = match self.direction {
            Direction::Min => "Min",
            Direction::Max => "Max",
        };
        let body: String = self
            .nutrient
            .split('_')
            .filter(|part| !part.is_empty())
            .map(|part| {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect();
        format!("{}{}", prefix, body)
    }

    /// Whether `total` respects the bound within `tolerance`.
    pub fn is_satisfied(&self, total: f64, tolerance: f64) -> bool {
        match self.direction {
            Direction::Min => total >= self.threshold - tolerance,
            Direction::Max => total <= self.threshold + tolerance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_round_trip() {
        for key in BoundKey::ALL {
            assert_eq!(BoundKey::from_key(key.key()), Some(key));
        }
        assert_eq!(BoundKey::from_key("min_sodium"), None);
    }

    #[test]
    fn test_key_prefix_matches_direction() {
        for key in BoundKey::ALL {
            let prefix = key.direction().as_str();
            assert!(key.key().starts_with(prefix), "{} vs {}", key, prefix);
            assert!(key.key().ends_with(key.nutrient()));
        }
    }

    #[test]
    fn test_constraint_names() {
        assert_eq!(BoundKey::MinCalories.bound(1.0).name(), "MinCalories");
        assert_eq!(BoundKey::MaxSugars.bound(1.0).name(), "MaxSugars");
        assert_eq!(BoundKey::MinVitaminC.bound(1.0).name(), "MinVitaminC");
    }

    #[test]
    fn test_is_satisfied() {
        let min = BoundKey::MinProtein.bound(30.0);
        assert!(min.is_satisfied(31.0, 1e-6));
        assert!(min.is_satisfied(30.0 - 1e-9, 1e-6));
        assert!(!min.is_satisfied(29.0, 1e-6));

        let max = BoundKey::MaxSugars.bound(50.0);
        assert!(max.is_satisfied(50.0, 1e-6));
        assert!(!max.is_satisfied(50.1, 1e-6));
    }
}
