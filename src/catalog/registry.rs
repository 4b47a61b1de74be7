use std::collections::{BTreeSet, HashMap};

use crate::error::{OptimizerError, Result};
use crate::models::FoodItem;

/// Read-only table of foods, kept in load order.
///
/// Built once at startup and shared by reference afterwards; nothing in the
/// crate mutates it after construction.
#[derive(Debug, Clone, Default)]
pub struct FoodCatalog {
    foods: Vec<FoodItem>,
    /// Position of each food in `foods`, keyed by identifier.
    index: HashMap<String, usize>,
}

impl FoodCatalog {
    /// Build a catalog, rejecting invalid entries and duplicate identifiers.
    pub fn new(foods: Vec<FoodItem>) -> Result<Self> {
        let mut index = HashMap::with_capacity(foods.len());
        for (i, food) in foods.iter().enumerate() {
            if !food.is_valid() {
                return Err(OptimizerError::InvalidCatalog(format!(
                    "invalid entry: {}",
                    food.debug_string()
                )));
            }
            if index.insert(food.name.clone(), i).is_some() {
                return Err(OptimizerError::InvalidCatalog(format!(
                    "duplicate food identifier: {}",
                    food.name
                )));
            }
        }
        Ok(Self { foods, index })
    }

    /// Get a food by identifier.
    pub fn get(&self, name: &str) -> Option<&FoodItem> {
        self.index.get(name).map(|&i| &self.foods[i])
    }

    /// Get a food by identifier or fail with `FoodNotFound`.
    pub fn require(&self, name: &str) -> Result<&FoodItem> {
        self.get(name)
            .ok_or_else(|| OptimizerError::FoodNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Position of a food in catalog order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Iterate foods in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &FoodItem> {
        self.foods.iter()
    }

    pub fn foods(&self) -> &[FoodItem] {
        &self.foods
    }

    /// Every nutrient named by at least one food, sorted.
    pub fn nutrient_names(&self) -> BTreeSet<&str> {
        self.foods
            .iter()
            .flat_map(|f| f.nutrients.keys().map(String::as_str))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.foods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }
}
