use serde::Serialize;
use serde_json::{Map, Value};
use strsim::jaro_winkler;
use tracing::{debug, warn};

use crate::catalog::FoodCatalog;
use crate::constraints::bounds::{BoundKey, NutrientBound};
use crate::error::{OptimizerError, Result};
use crate::models::Quantities;

/// Minimum similarity for a "did you mean" hint on an unknown key.
const SUGGESTION_THRESHOLD: f64 = 0.85;

/// Validated caller bounds, one optional threshold per recognized key.
///
/// `None` means the bound was not requested.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NutrientBounds {
    pub min_calories: Option<f64>,
    pub max_calories: Option<f64>,
    pub min_protein: Option<f64>,
    pub max_protein: Option<f64>,
    pub min_fat: Option<f64>,
    pub max_fat: Option<f64>,
    pub min_carbs: Option<f64>,
    pub max_carbs: Option<f64>,
    pub min_fiber: Option<f64>,
    pub max_sugars: Option<f64>,
    pub min_vitamin_c: Option<f64>,
}

impl NutrientBounds {
    /// Validate raw caller input.
    ///
    /// Unrecognized keys are skipped. A recognized key whose value is not
    /// inactive and does not parse as a finite non-negative number fails
    /// with `InvalidConstraint`.
    pub fn from_raw<'a, I>(raw: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a Value)>,
    {
        let mut bounds = NutrientBounds::default();
        for (key, value) in raw {
            let Some(bound_key) = BoundKey::from_key(key) else {
                match suggest_key(key) {
                    Some(hint) => warn!(key, hint, "ignoring unknown bound (did you mean '{}'?)", hint),
                    None => debug!(key, "ignoring unknown bound"),
                }
                continue;
            };
            bounds.set(bound_key, activation(key, value)?);
        }
        Ok(bounds)
    }

    /// Validate a JSON object of raw bounds.
    pub fn from_json_map(raw: &Map<String, Value>) -> Result<Self> {
        Self::from_raw(raw.iter().map(|(k, v)| (k.as_str(), v)))
    }

    /// Validate `key=value` string pairs, e.g. from the command line.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let values: Vec<(&str, Value)> = pairs
            .into_iter()
            .map(|(k, v)| (k, Value::String(v.to_string())))
            .collect();
        Self::from_raw(values.iter().map(|(k, v)| (*k, v)))
    }

    pub fn get(&self, key: BoundKey) -> Option<f64> {
        match key {
            BoundKey::MinCalories => self.min_calories,
            BoundKey::MaxCalories => self.max_calories,
            BoundKey::MinProtein => self.min_protein,
            BoundKey::MaxProtein => self.max_protein,
            BoundKey::MinFat => self.min_fat,
            BoundKey::MaxFat => self.max_fat,
            BoundKey::MinCarbs => self.min_carbs,
            BoundKey::MaxCarbs => self.max_carbs,
            BoundKey::MinFiber => self.min_fiber,
            BoundKey::MaxSugars => self.max_sugars,
            BoundKey::MinVitaminC => self.min_vitamin_c,
        }
    }

    pub fn set(&mut self, key: BoundKey, threshold: Option<f64>) {
        let slot = match key {
            BoundKey::MinCalories => &mut self.min_calories,
            BoundKey::MaxCalories => &mut self.max_calories,
            BoundKey::MinProtein => &mut self.min_protein,
            BoundKey::MaxProtein => &mut self.max_protein,
            BoundKey::MinFat => &mut self.min_fat,
            BoundKey::MaxFat => &mut self.max_fat,
            BoundKey::MinCarbs => &mut self.min_carbs,
            BoundKey::MaxCarbs => &mut self.max_carbs,
            BoundKey::MinFiber => &mut self.min_fiber,
            BoundKey::MaxSugars => &mut self.max_sugars,
            BoundKey::MinVitaminC => &mut self.min_vitamin_c,
        };
        *slot = threshold;
    }

    /// Active bounds in `BoundKey::ALL` order.
    pub fn active(&self) -> impl Iterator<Item = (BoundKey, f64)> + '_ {
        BoundKey::ALL
            .into_iter()
            .filter_map(|k| self.get(k).map(|t| (k, t)))
    }

    pub fn to_spec(&self) -> ConstraintSpec {
        ConstraintSpec::new(self.active().map(|(k, t)| k.bound(t)).collect())
    }
}

/// Decide whether a raw value switches its bound on.
///
/// Inactive: null, `false`, an empty or blank string, and anything that
/// parses to zero. Active: a finite positive number or numeric string.
/// Everything else is rejected.
pub fn activation(key: &str, value: &Value) -> Result<Option<f64>> {
    let reject = |reason: &str| OptimizerError::invalid_constraint(key, value.to_string(), reason);

    let parsed = match value {
        Value::Null | Value::Bool(false) => return Ok(None),
        Value::Bool(true) => return Err(reject("boolean is not a threshold")),
        Value::Number(n) => n.as_f64().ok_or_else(|| reject("not representable as a real"))?,
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            s.parse::<f64>().map_err(|_| reject("not a number"))?
        }
        Value::Array(_) | Value::Object(_) => return Err(reject("expected a number")),
    };

    if !parsed.is_finite() {
        return Err(reject("must be finite"));
    }
    if parsed < 0.0 {
        return Err(reject("must not be negative"));
    }
    if parsed == 0.0 {
        return Ok(None);
    }
    Ok(Some(parsed))
}

/// Closest recognized key for a probable typo.
pub fn suggest_key(unknown: &str) -> Option<&'static str> {
    let unknown = unknown.to_lowercase();
    BoundKey::ALL
        .iter()
        .map(|k| (k.key(), jaro_winkler(k.key(), &unknown)))
        .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(k, _)| k)
}

/// Ordered set of active nutrient bounds fed to the model builder.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConstraintSpec {
    bounds: Vec<NutrientBound>,
}

impl ConstraintSpec {
    pub fn new(bounds: Vec<NutrientBound>) -> Self {
        Self { bounds }
    }

    /// Validate a raw JSON object straight into a spec.
    pub fn from_json_map(raw: &Map<String, Value>) -> Result<Self> {
        Ok(NutrientBounds::from_json_map(raw)?.to_spec())
    }

    pub fn bounds(&self) -> &[NutrientBound] {
        &self.bounds
    }

    pub fn iter(&self) -> impl Iterator<Item = &NutrientBound> {
        self.bounds.iter()
    }

    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    /// Bounds not met by `quantities`, paired with the achieved total.
    pub fn violations(
        &self,
        catalog: &FoodCatalog,
        quantities: &Quantities,
        tolerance: f64,
    ) -> Vec<(&NutrientBound, f64)> {
        self.bounds
            .iter()
            .map(|bound| {
                let total: f64 = quantities
                    .iter()
                    .filter_map(|(name, qty)| catalog.get(name).map(|f| f.amount(&bound.nutrient) * qty))
                    .sum();
                (bound, total)
            })
            .filter(|(bound, total)| !bound.is_satisfied(*total, tolerance))
            .collect()
    }

    pub fn is_satisfied_by(
        &self,
        catalog: &FoodCatalog,
        quantities: &Quantities,
        tolerance: f64,
    ) -> bool {
        self.violations(catalog, quantities, tolerance).is_empty()
    }
}
