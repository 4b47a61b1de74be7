use tracing::debug;

use crate::catalog::FoodCatalog;
use crate::constraints::{ConstraintSpec, Direction, NutrientBound};
use crate::planner::constants::PROBLEM_NAME;
use crate::solver::{LinearConstraint, LinearProgram, Sense, VariableDomain};

/// Translate a catalog and its active bounds into a linear program.
///
/// One variable per food in catalog order, cost as objective coefficient,
/// and one row per bound over the per-unit nutrient amounts. An empty spec
/// yields a program with no rows, whose optimum is all zeros.
pub fn build_program(catalog: &FoodCatalog, spec: &ConstraintSpec, domain: VariableDomain) -> LinearProgram {
    let variables: Vec<String> = catalog.iter().map(|f| f.name.clone()).collect();
    let objective: Vec<f64> = catalog.iter().map(|f| f.cost).collect();
    let constraints: Vec<LinearConstraint> = spec.iter().map(|b| bound_row(catalog, b)).collect();

    debug!(
        variables = variables.len(),
        constraints = constraints.len(),
        ?domain,
        "built linear program"
    );

    LinearProgram {
        name: PROBLEM_NAME.to_string(),
        variables,
        objective,
        constraints,
        domain,
    }
}

fn bound_row(catalog: &FoodCatalog, bound: &NutrientBound) -> LinearConstraint {
    let coefficients = catalog.iter().map(|f| f.amount(&bound.nutrient)).collect();
    let sense = match bound.direction {
        Direction::Min => Sense::GreaterEqual,
        Direction::Max => Sense::LessEqual,
    };
    LinearConstraint::new(bound.name(), coefficients, sense, bound.threshold)
}
