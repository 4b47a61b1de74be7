use assert_float_eq::assert_float_absolute_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use nutrition_optimizer_rs::constraints::NutrientBounds;
use nutrition_optimizer_rs::planner::solve_bounds;
use nutrition_optimizer_rs::solver::{BranchAndBound, SolverConfig};
use nutrition_optimizer_rs::{FoodCatalog, FoodItem, SolveStatus};

const FOODS: usize = 3;
const MIN_FOOD_CALORIES: f64 = 50.0;
const MAX_TOTAL_CALORIES: f64 = 600.0;
// No food can appear more often than this under the calorie cap.
const MAX_UNITS: usize = (MAX_TOTAL_CALORIES / MIN_FOOD_CALORIES) as usize;

fn random_catalog(rng: &mut StdRng) -> FoodCatalog {
    let foods = (0..FOODS)
        .map(|i| {
            let cost = (rng.gen_range(0.1..3.0_f64) * 100.0).round() / 100.0;
            FoodItem::new(format!("food_{}", i), cost)
                .with_nutrient("calories", rng.gen_range(MIN_FOOD_CALORIES..300.0).round())
                .with_nutrient("protein", rng.gen_range(0.0..30.0_f64).round())
        })
        .collect();
    FoodCatalog::new(foods).unwrap()
}

fn random_bounds(rng: &mut StdRng) -> NutrientBounds {
    NutrientBounds {
        min_calories: Some(rng.gen_range(100.0..400.0_f64).round()),
        max_calories: Some(rng.gen_range(300.0..MAX_TOTAL_CALORIES).round()),
        min_protein: Some(rng.gen_range(1.0..60.0_f64).round()),
        ..NutrientBounds::default()
    }
}

fn is_feasible(catalog: &FoodCatalog, bounds: &NutrientBounds, qty: &[usize]) -> bool {
    let total = |nutrient: &str| -> f64 {
        catalog
            .iter()
            .zip(qty)
            .map(|(food, &q)| food.amount(nutrient) * q as f64)
            .sum()
    };
    let calories = total("calories");
    let protein = total("protein");
    bounds.min_calories.is_none_or(|b| calories >= b - 1e-9)
        && bounds.max_calories.is_none_or(|b| calories <= b + 1e-9)
        && bounds.min_protein.is_none_or(|b| protein >= b - 1e-9)
}

/// Cheapest feasible cost by exhaustive enumeration, if any.
fn brute_force(catalog: &FoodCatalog, bounds: &NutrientBounds) -> Option<f64> {
    let mut best: Option<f64> = None;
    let mut qty = [0usize; FOODS];
    loop {
        if is_feasible(catalog, bounds, &qty) {
            let cost: f64 = catalog
                .iter()
                .zip(&qty)
                .map(|(food, &q)| food.cost * q as f64)
                .sum();
            if best.is_none_or(|b| cost < b) {
                best = Some(cost);
            }
        }

        // Odometer increment over 0..=MAX_UNITS per food.
        let mut i = 0;
        while i < FOODS {
            qty[i] += 1;
            if qty[i] <= MAX_UNITS {
                break;
            }
            qty[i] = 0;
            i += 1;
        }
        if i == FOODS {
            return best;
        }
    }
}

#[test]
fn test_matches_brute_force_on_random_catalogs() {
    let mut rng = StdRng::seed_from_u64(7);
    let config = SolverConfig::default();
    let solver = BranchAndBound::new(config.clone());

    for case in 0..60 {
        let catalog = random_catalog(&mut rng);
        let bounds = random_bounds(&mut rng);

        let solution = solve_bounds(&bounds, &catalog, &config, &solver).unwrap();
        match brute_force(&catalog, &bounds) {
            Some(expected) => {
                assert_eq!(
                    solution.status,
                    SolveStatus::Optimal,
                    "case {}: {:?} {:?}",
                    case,
                    bounds,
                    catalog.foods()
                );
                assert_float_absolute_eq!(solution.objective_value.unwrap(), expected, 1e-6);
            }
            None => assert_eq!(
                solution.status,
                SolveStatus::Infeasible,
                "case {}: {:?}",
                case,
                bounds
            ),
        }
    }
}

#[test]
fn test_optimal_solutions_are_feasible_and_integral() {
    let mut rng = StdRng::seed_from_u64(42);
    let config = SolverConfig::default();
    let solver = BranchAndBound::new(config.clone());

    for _ in 0..40 {
        let catalog = random_catalog(&mut rng);
        let bounds = random_bounds(&mut rng);
        let solution = solve_bounds(&bounds, &catalog, &config, &solver).unwrap();
        if solution.status != SolveStatus::Optimal {
            continue;
        }

        let qty: Vec<usize> = catalog
            .iter()
            .map(|food| {
                let q = solution.quantities.get(&food.name).copied().unwrap_or(0.0);
                assert_eq!(q.fract(), 0.0);
                q as usize
            })
            .collect();
        assert!(is_feasible(&catalog, &bounds, &qty));
        assert!(bounds.to_spec().is_satisfied_by(&catalog, &solution.quantities, 1e-6));
    }
}

#[test]
fn test_tightening_protein_never_lowers_cost() {
    let mut rng = StdRng::seed_from_u64(99);
    let config = SolverConfig::default();
    let solver = BranchAndBound::new(config.clone());

    for _ in 0..15 {
        let catalog = random_catalog(&mut rng);
        let mut bounds = random_bounds(&mut rng);
        let mut previous: Option<f64> = Some(0.0);

        for threshold in [5.0, 15.0, 25.0, 40.0, 60.0] {
            bounds.min_protein = Some(threshold);
            let solution = solve_bounds(&bounds, &catalog, &config, &solver).unwrap();
            match (previous, solution.objective_value) {
                (Some(prev), Some(cost)) => assert!(cost >= prev - 1e-9),
                // Once infeasible, a tighter bound stays infeasible.
                (None, cost) => assert!(cost.is_none()),
                (Some(_), None) => assert_eq!(solution.status, SolveStatus::Infeasible),
            }
            previous = solution.objective_value;
        }
    }
}
