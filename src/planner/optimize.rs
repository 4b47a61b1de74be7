use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::catalog::FoodCatalog;
use crate::constraints::{ConstraintSpec, NutrientBounds};
use crate::error::Result;
use crate::models::Solution;
use crate::planner::constants::BOUND_CHECK_TOLERANCE;
use crate::planner::extract::extract_solution;
use crate::planner::model::build_program;
use crate::solver::{BranchAndBound, Solver, SolverConfig};

/// Find the cheapest selection of foods meeting the requested bounds.
///
/// `constraints` is the caller's raw mapping (e.g. a decoded JSON body).
/// Invalid bound values fail with `InvalidConstraint` before any solving;
/// every solver outcome comes back as a `Solution` status.
pub fn optimize(constraints: &Map<String, Value>, catalog: &FoodCatalog) -> Result<Solution> {
    optimize_with(constraints, catalog, &SolverConfig::default())
}

/// Same as [`optimize`] with explicit solver settings.
pub fn optimize_with(
    constraints: &Map<String, Value>,
    catalog: &FoodCatalog,
    config: &SolverConfig,
) -> Result<Solution> {
    let bounds = NutrientBounds::from_json_map(constraints)?;
    let solver = BranchAndBound::new(config.clone());
    solve_bounds(&bounds, catalog, config, &solver)
}

/// Solve already-validated bounds with any solver backend.
pub fn solve_bounds(
    bounds: &NutrientBounds,
    catalog: &FoodCatalog,
    config: &SolverConfig,
    solver: &dyn Solver,
) -> Result<Solution> {
    solve_spec(&bounds.to_spec(), catalog, config, solver)
}

/// Build, solve and extract for one constraint spec.
pub fn solve_spec(
    spec: &ConstraintSpec,
    catalog: &FoodCatalog,
    config: &SolverConfig,
    solver: &dyn Solver,
) -> Result<Solution> {
    info!(
        foods = catalog.len(),
        bounds = spec.len(),
        domain = ?config.domain,
        "starting optimization"
    );

    let program = build_program(catalog, spec, config.domain);
    let output = solver.solve(&program);
    let solution = extract_solution(catalog, &program, &output, config.integrality_tolerance)?;

    if solution.is_optimal() {
        for (bound, total) in spec.violations(catalog, &solution.quantities, BOUND_CHECK_TOLERANCE) {
            warn!(
                bound = %bound.name(),
                threshold = bound.threshold,
                total,
                "returned selection misses a bound"
            );
        }
    }

    match solution.objective_value {
        Some(cost) => info!(
            status = %solution.status,
            cost,
            foods = solution.quantities.len(),
            nodes = output.stats.nodes,
            lp_iterations = output.stats.lp_iterations,
            "optimization finished"
        ),
        None => warn!(
            status = %solution.status,
            nodes = output.stats.nodes,
            "no optimal solution found"
        ),
    }

    Ok(solution)
}
