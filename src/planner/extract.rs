use tracing::{debug, warn};

use crate::catalog::FoodCatalog;
use crate::error::Result;
use crate::models::{Quantities, Solution, SolveStatus};
use crate::solver::{LinearProgram, SolverOutput, VariableDomain};

/// Turn raw solver output into a `Solution`.
///
/// Integer values are rounded to the nearest whole unit, continuous values
/// within `tolerance` of zero are dropped, and the objective is recomputed
/// from catalog costs so it always agrees with the returned quantities.
pub fn extract_solution(
    catalog: &FoodCatalog,
    program: &LinearProgram,
    output: &SolverOutput,
    tolerance: f64,
) -> Result<Solution> {
    if output.status != SolveStatus::Optimal {
        return Ok(Solution::without_solution(output.status));
    }

    let mut quantities = Quantities::new();
    let mut objective = 0.0;

    for (name, &raw) in program.variables.iter().zip(&output.values) {
        let qty = match program.domain {
            VariableDomain::Integer => {
                let rounded = raw.round();
                if (raw - rounded).abs() > tolerance {
                    warn!(food = %name, value = raw, "solver returned a non-integral quantity");
                }
                rounded
            }
            VariableDomain::Continuous => raw,
        };

        if qty <= tolerance {
            continue;
        }

        let food = catalog.require(name)?;
        objective += food.cost * qty;
        debug!(food = %name, quantity = qty, "selected");
        quantities.insert(name.as_str(), qty);
    }

    if let Some(reported) = output.objective {
        if (reported - objective).abs() > tolerance * (1.0 + objective.abs()) {
            debug!(reported, recomputed = objective, "solver objective differs from recomputed cost");
        }
    }

    Ok(Solution::optimal(objective, quantities))
}
