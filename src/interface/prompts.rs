use dialoguer::{Confirm, Input};
use serde_json::Value;

use crate::constraints::{BoundKey, NutrientBounds, activation};
use crate::error::Result;

/// Prompt for one bound; blank input leaves it inactive.
pub fn prompt_bound(key: BoundKey) -> Result<Option<f64>> {
    let input: String = Input::new()
        .with_prompt(format!(
            "{} ({} {}, blank to skip)",
            key.key(),
            key.direction().as_str(),
            key.nutrient()
        ))
        .allow_empty(true)
        .validate_with(|input: &String| -> std::result::Result<(), String> {
            activation(key.key(), &Value::String(input.clone()))
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()?;

    activation(key.key(), &Value::String(input))
}

/// Ask for every recognized bound in turn.
pub fn collect_bounds() -> Result<NutrientBounds> {
    let mut bounds = NutrientBounds::default();
    for key in BoundKey::ALL {
        bounds.set(key, prompt_bound(key)?);
    }
    Ok(bounds)
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}
