pub mod branch_bound;
pub mod program;
pub mod simplex;

use std::time::Duration;

use crate::models::SolveStatus;
use crate::planner::constants::{DEFAULT_MAX_LP_ITERATIONS, DEFAULT_MAX_NODES, INTEGRALITY_TOLERANCE};

pub use branch_bound::BranchAndBound;
pub use program::{LinearConstraint, LinearProgram, Sense, VariableDomain};
pub use simplex::{LpOutcome, solve_lp};

/// Runtime knobs for a solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    pub domain: VariableDomain,
    /// Branch-and-bound nodes allowed before returning `NotSolved`.
    pub max_nodes: usize,
    /// Pivots allowed per relaxation.
    pub max_lp_iterations: usize,
    /// Wall-clock budget for the whole search.
    pub time_limit: Option<Duration>,
    pub integrality_tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            domain: VariableDomain::Integer,
            max_nodes: DEFAULT_MAX_NODES,
            max_lp_iterations: DEFAULT_MAX_LP_ITERATIONS,
            time_limit: None,
            integrality_tolerance: INTEGRALITY_TOLERANCE,
        }
    }
}

/// Work done during a solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveStats {
    pub nodes: usize,
    pub lp_iterations: usize,
}

/// Raw solver answer: a status plus one value per program variable when
/// the status is `Optimal`.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverOutput {
    pub status: SolveStatus,
    pub values: Vec<f64>,
    pub objective: Option<f64>,
    pub stats: SolveStats,
}

impl SolverOutput {
    pub fn optimal(values: Vec<f64>, objective: f64, stats: SolveStats) -> Self {
        Self {
            status: SolveStatus::Optimal,
            values,
            objective: Some(objective),
            stats,
        }
    }

    pub fn without_values(status: SolveStatus, stats: SolveStats) -> Self {
        Self {
            status,
            values: Vec::new(),
            objective: None,
            stats,
        }
    }
}

/// Anything that can answer a linear program.
///
/// The built-in backend is [`BranchAndBound`]; another engine (for example a
/// wrapper around an external solver process) only needs to honour the same
/// status contract. Solvers must be `Send + Sync` so a single instance can
/// serve concurrent requests.
pub trait Solver: Send + Sync {
    fn solve(&self, program: &LinearProgram) -> SolverOutput;
}
