use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::catalog::FoodCatalog;
use crate::error::{OptimizerError, Result};
use crate::models::FoodItem;

/// Load a catalog from a JSON object keyed by food identifier.
///
/// ```json
/// { "apple": { "cost": 0.5, "calories": 95, "protein": 0.5 } }
/// ```
///
/// Entry order in the file is kept.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<FoodCatalog> {
    let content = fs::read_to_string(path)?;
    parse_catalog_json(&content)
}

/// Load a catalog, choosing CSV for a `.csv` extension and JSON otherwise.
pub fn load_catalog_path<P: AsRef<Path>>(path: P) -> Result<FoodCatalog> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if is_csv {
        load_catalog_csv(path)
    } else {
        load_catalog(path)
    }
}

/// One catalog entry as written in the JSON file: `cost` plus any number of
/// nutrient amounts.
#[derive(Debug, Deserialize)]
struct CatalogEntry {
    cost: f64,
    #[serde(flatten)]
    nutrients: BTreeMap<String, f64>,
}

impl CatalogEntry {
    fn into_food(self, name: &str) -> Result<FoodItem> {
        let mut food = FoodItem::new(name, check_amount(name, "cost", self.cost)?);
        for (nutrient, amount) in self.nutrients {
            let amount = check_amount(name, &nutrient, amount)?;
            food.nutrients.insert(nutrient, amount);
        }
        Ok(food)
    }
}

/// Parse the JSON catalog format from a string.
pub fn parse_catalog_json(content: &str) -> Result<FoodCatalog> {
    let entries: Map<String, Value> = serde_json::from_str(content).map_err(catalog_error)?;

    let mut foods = Vec::with_capacity(entries.len());
    for (name, value) in entries {
        let entry: CatalogEntry = serde_json::from_value(value).map_err(|e| {
            OptimizerError::InvalidCatalog(format!("entry for '{}': {}", name, e))
        })?;
        foods.push(entry.into_food(&name)?);
    }

    FoodCatalog::new(foods)
}

/// Shape errors are catalog errors; malformed JSON stays a JSON error.
fn catalog_error(err: serde_json::Error) -> OptimizerError {
    if err.is_data() {
        OptimizerError::InvalidCatalog(err.to_string())
    } else {
        OptimizerError::Json(err)
    }
}

fn check_amount(food: &str, field: &str, amount: f64) -> Result<f64> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(OptimizerError::InvalidCatalog(format!(
            "{}.{} must be a non-negative number, got {}",
            food, field, amount
        )));
    }
    Ok(amount)
}

/// Load a catalog from CSV.
///
/// The header needs a `name` and a `cost` column; every other column is a
/// nutrient. Empty nutrient cells count as zero.
pub fn load_catalog_csv<P: AsRef<Path>>(path: P) -> Result<FoodCatalog> {
    let reader = csv::Reader::from_path(path)?;
    read_catalog_csv(reader)
}

/// Parse the CSV catalog format from any reader.
pub fn read_catalog_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<FoodCatalog> {
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let name_col = column(&headers, "name")?;
    let cost_col = column(&headers, "cost")?;

    let mut foods = Vec::new();
    for record in reader.records() {
        let record = record?;
        let name = record.get(name_col).unwrap_or("").trim().to_string();
        if name.is_empty() {
            return Err(OptimizerError::InvalidCatalog(format!(
                "row {} has no food name",
                foods.len() + 1
            )));
        }

        let cost = csv_amount(&name, "cost", record.get(cost_col).unwrap_or(""))?
            .ok_or_else(|| OptimizerError::InvalidCatalog(format!("'{}' has no cost", name)))?;

        let mut food = FoodItem::new(name.as_str(), cost);
        for (i, header) in headers.iter().enumerate() {
            if i == name_col || i == cost_col {
                continue;
            }
            if let Some(amount) = csv_amount(&name, header, record.get(i).unwrap_or(""))? {
                food.nutrients.insert(header.clone(), amount);
            }
        }
        foods.push(food);
    }

    FoodCatalog::new(foods)
}

fn column(headers: &[String], wanted: &str) -> Result<usize> {
    headers.iter().position(|h| h == wanted).ok_or_else(|| {
        OptimizerError::InvalidCatalog(format!("CSV header has no '{}' column", wanted))
    })
}

fn csv_amount(food: &str, field: &str, cell: &str) -> Result<Option<f64>> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(None);
    }
    let amount: f64 = cell.parse().map_err(|_| {
        OptimizerError::InvalidCatalog(format!("{}.{} is not a number: {}", food, field, cell))
    })?;
    check_amount(food, field, amount).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FOODS_JSON: &str = r#"{
        "apple": {"calories": 95, "protein": 0.5, "fat": 0.2, "carbs": 25, "cost": 0.5},
        "banana": {"calories": 105, "protein": 1.3, "fat": 0.4, "carbs": 27, "cost": 0.3},
        "chicken_breast": {"calories": 165, "protein": 31, "fat": 3.6, "carbs": 0, "cost": 2.0}
    }"#;

    #[test]
    fn test_load_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(FOODS_JSON.as_bytes()).unwrap();

        let catalog = load_catalog(file.path()).unwrap();
        assert_eq!(catalog.len(), 3);

        let names: Vec<&str> = catalog.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["apple", "banana", "chicken_breast"]);

        let chicken = catalog.get("chicken_breast").unwrap();
        assert_eq!(chicken.cost, 2.0);
        assert_eq!(chicken.amount("protein"), 31.0);
        assert!(!chicken.nutrients.contains_key("cost"));
    }

    #[test]
    fn test_missing_cost_is_invalid() {
        let err = parse_catalog_json(r#"{"apple": {"calories": 95}}"#).unwrap_err();
        assert!(matches!(err, OptimizerError::InvalidCatalog(_)));
    }

    #[test]
    fn test_non_numeric_nutrient_is_invalid() {
        let err = parse_catalog_json(r#"{"apple": {"cost": 1, "calories": "lots"}}"#).unwrap_err();
        assert!(matches!(err, OptimizerError::InvalidCatalog(_)));
    }

    #[test]
    fn test_entry_must_be_an_object() {
        let err = parse_catalog_json(r#"{"apple": 0.5}"#).unwrap_err();
        assert!(matches!(err, OptimizerError::InvalidCatalog(_)));

        let err = parse_catalog_json(r#"{"apple": {"cost": 1, "vitamins": {"c": 8}}}"#).unwrap_err();
        assert!(matches!(err, OptimizerError::InvalidCatalog(_)));
    }

    #[test]
    fn test_integer_amounts_accepted() {
        let catalog = parse_catalog_json(r#"{"egg": {"cost": 1, "protein": 6}}"#).unwrap();
        let egg = catalog.get("egg").unwrap();
        assert_eq!(egg.cost, 1.0);
        assert_eq!(egg.amount("protein"), 6.0);
    }

    #[test]
    fn test_negative_cost_is_invalid() {
        assert!(parse_catalog_json(r#"{"apple": {"cost": -1}}"#).is_err());
    }

    #[test]
    fn test_non_object_root_is_invalid() {
        assert!(matches!(
            parse_catalog_json("[1, 2]"),
            Err(OptimizerError::InvalidCatalog(_))
        ));
        assert!(matches!(
            parse_catalog_json("not json"),
            Err(OptimizerError::Json(_))
        ));
    }

    #[test]
    fn test_load_csv() {
        let csv_data = "Name,Cost,Calories,Protein,Vitamin_C\n\
                        apple,0.5,95,0.5,8.4\n\
                        chicken_breast,2.0,165,31,\n";
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(csv_data.as_bytes()).unwrap();

        let catalog = load_catalog_csv(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        let chicken = catalog.get("chicken_breast").unwrap();
        assert_eq!(chicken.amount("protein"), 31.0);
        assert_eq!(chicken.amount("vitamin_c"), 0.0);
        assert_eq!(catalog.get("apple").unwrap().amount("vitamin_c"), 8.4);
    }

    #[test]
    fn test_load_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(b"name,cost,calories\napple,0.5,95\n").unwrap();
        let catalog = load_catalog_path(file.path()).unwrap();
        assert_eq!(catalog.get("apple").unwrap().amount("calories"), 95.0);

        let mut json = NamedTempFile::new().unwrap();
        json.write_all(FOODS_JSON.as_bytes()).unwrap();
        assert_eq!(load_catalog_path(json.path()).unwrap().len(), 3);
    }

    #[test]
    fn test_csv_duplicate_rows_rejected() {
        let csv_data = "name,cost\napple,1\napple,2\n";
        let reader = csv::Reader::from_reader(csv_data.as_bytes());
        assert!(matches!(
            read_catalog_csv(reader),
            Err(OptimizerError::InvalidCatalog(_))
        ));
    }

    #[test]
    fn test_csv_requires_cost_column() {
        let reader = csv::Reader::from_reader("name,calories\napple,95\n".as_bytes());
        assert!(read_catalog_csv(reader).is_err());
    }
}
