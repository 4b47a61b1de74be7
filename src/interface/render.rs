use crate::catalog::FoodCatalog;
use crate::constraints::{BoundKey, NutrientBounds};
use crate::models::Solution;
use crate::planner::constants::MACRO_NUTRIENTS;

/// Format a quantity without a trailing `.0` for whole units.
pub fn format_quantity(qty: f64) -> String {
    if qty.fract() == 0.0 {
        format!("{:.0}", qty)
    } else {
        format!("{:.3}", qty)
    }
}

/// Display a solution with per-food macro contributions.
pub fn display_solution(solution: &Solution, catalog: &FoodCatalog) {
    println!();
    println!("=== Solution Status: {} ===", solution.status);

    let Some(cost) = solution.objective_value else {
        println!("No feasible solution found.");
        println!();
        return;
    };

    println!("Objective Value (Total Cost): {:.2}", cost);
    println!();

    if solution.quantities.is_empty() {
        println!("Nothing to buy: no bounds require any food.");
        println!();
        return;
    }

    let rows = solution.contributions(catalog, &MACRO_NUTRIENTS);
    let max_name_len = rows.iter().map(|r| r.food_name.len()).max().unwrap_or(10).max(4);

    print!("{:<width$}  {:>8}  {:>8}", "Food", "Qty", "Cost", width = max_name_len);
    for nutrient in MACRO_NUTRIENTS {
        print!("  {:>9}", format!("{} (g)", nutrient));
    }
    println!();

    for row in &rows {
        print!(
            "{:<width$}  {:>8}  {:>8.2}",
            row.food_name,
            format_quantity(row.quantity),
            row.cost,
            width = max_name_len
        );
        for (_, amount) in &row.amounts {
            print!("  {:>9.1}", amount);
        }
        println!();
    }

    println!();
    println!("--- Totals ---");
    println!("Units: {}", format_quantity(solution.total_units()));
    for (nutrient, total) in solution.nutrient_totals(catalog) {
        println!("{}: {:.1}", nutrient, total);
    }
    println!();
}

/// Display the catalog with costs and nutrients.
pub fn display_food_list(catalog: &FoodCatalog, title: &str) {
    if catalog.is_empty() {
        println!("{}: (none)", title);
        return;
    }

    println!();
    println!("=== {} ({} items) ===", title, catalog.len());
    let nutrients: Vec<&str> = catalog.nutrient_names().into_iter().collect();
    println!("Nutrients: {}", nutrients.join(", "));
    println!();

    for food in catalog.iter() {
        let nutrients: Vec<String> = food
            .nutrients
            .iter()
            .map(|(k, v)| format!("{} {}", k, v))
            .collect();
        println!("  {} - cost {:.2}, {}", food.name, food.cost, nutrients.join(", "));
    }

    println!();
}

/// Display the bound keys the optimizer understands.
pub fn display_recognized_bounds() {
    println!();
    println!("=== Recognized bounds ===");
    println!();
    for key in BoundKey::ALL {
        println!("  {:<14} {} total {}", key.key(), key.direction().as_str(), key.nutrient());
    }
    println!();
}

/// Display the active bounds of a request.
pub fn display_bounds(bounds: &NutrientBounds) {
    let active: Vec<(BoundKey, f64)> = bounds.active().collect();
    if active.is_empty() {
        println!("No bounds requested.");
        return;
    }
    println!("Bounds:");
    for (key, threshold) in active {
        println!("  {} = {}", key, threshold);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(3.0), "3");
        assert_eq!(format_quantity(0.25), "0.250");
    }
}
