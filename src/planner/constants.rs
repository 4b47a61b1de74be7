// ─────────────────────────────────────────────────────────────────────────────
// Numeric tolerances
// ─────────────────────────────────────────────────────────────────────────────

/// A value within this distance of an integer counts as integral.
pub const INTEGRALITY_TOLERANCE: f64 = 1e-6;

/// A node whose relaxed objective is not better than the incumbent by more
/// than this is pruned.
pub const PRUNE_TOLERANCE: f64 = 1e-6;

/// Pivot and reduced-cost threshold inside the simplex tableau.
pub const PIVOT_EPSILON: f64 = 1e-9;

/// Phase-one residual (scaled by the largest right-hand side) above which a
/// relaxation is declared infeasible.
pub const FEASIBILITY_TOLERANCE: f64 = 1e-7;

/// Slack allowed when checking a returned selection against its bounds.
pub const BOUND_CHECK_TOLERANCE: f64 = 1e-6;

// ─────────────────────────────────────────────────────────────────────────────
// Search budgets
// ─────────────────────────────────────────────────────────────────────────────

/// Branch-and-bound nodes explored before giving up with `NotSolved`.
pub const DEFAULT_MAX_NODES: usize = 100_000;

/// Simplex pivots allowed for a single relaxation.
pub const DEFAULT_MAX_LP_ITERATIONS: usize = 10_000;

// ─────────────────────────────────────────────────────────────────────────────
// Model naming
// ─────────────────────────────────────────────────────────────────────────────

pub const PROBLEM_NAME: &str = "Nutrition_Optimization";

pub const OBJECTIVE_NAME: &str = "Total_Cost";

/// Prefix for decision variable names in exported models.
pub const VARIABLE_PREFIX: &str = "quantity_";

// ─────────────────────────────────────────────────────────────────────────────
// Display
// ─────────────────────────────────────────────────────────────────────────────

/// Nutrients broken down per food in the solution report.
pub const MACRO_NUTRIENTS: [&str; 3] = ["protein", "carbs", "fat"];
