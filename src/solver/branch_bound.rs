use std::time::Instant;

use tracing::{debug, info, warn};

use crate::models::SolveStatus;
use crate::planner::constants::{BOUND_CHECK_TOLERANCE, PRUNE_TOLERANCE};
use crate::solver::program::{LinearConstraint, LinearProgram, Sense, VariableDomain};
use crate::solver::simplex::{LpOutcome, solve_lp};
use crate::solver::{SolveStats, Solver, SolverConfig, SolverOutput};

/// Integer solver: simplex relaxations explored depth-first with
/// floor/ceiling branching.
///
/// Continuous programs are answered by a single relaxation.
#[derive(Debug, Clone, Default)]
pub struct BranchAndBound {
    config: SolverConfig,
}

/// Extra variable bounds accumulated along one branch.
#[derive(Debug, Clone)]
struct Node {
    lower: Vec<f64>,
    upper: Vec<Option<f64>>,
    depth: usize,
}

impl Node {
    fn root(n: usize) -> Self {
        Self {
            lower: vec![0.0; n],
            upper: vec![None; n],
            depth: 0,
        }
    }

    fn with_upper(&self, var: usize, bound: f64) -> Self {
        let mut child = self.clone();
        child.upper[var] = Some(child.upper[var].map_or(bound, |u| u.min(bound)));
        child.depth += 1;
        child
    }

    fn with_lower(&self, var: usize, bound: f64) -> Self {
        let mut child = self.clone();
        child.lower[var] = child.lower[var].max(bound);
        child.depth += 1;
        child
    }

    /// Program rows plus one row per tightened variable bound.
    fn rows(&self, program: &LinearProgram) -> Vec<LinearConstraint> {
        let n = program.num_variables();
        let mut rows = program.constraints.clone();
        for var in 0..n {
            if self.lower[var] > 0.0 {
                rows.push(LinearConstraint::variable_bound(
                    format!("branch_lb_{}", var),
                    n,
                    var,
                    Sense::GreaterEqual,
                    self.lower[var],
                ));
            }
            if let Some(upper) = self.upper[var] {
                rows.push(LinearConstraint::variable_bound(
                    format!("branch_ub_{}", var),
                    n,
                    var,
                    Sense::LessEqual,
                    upper,
                ));
            }
        }
        rows
    }
}

/// Incumbent integer point and its objective.
struct Incumbent {
    x: Vec<f64>,
    objective: f64,
}

impl BranchAndBound {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Most fractional variable, lowest index on ties.
    fn branching_variable(&self, x: &[f64]) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (j, v) in x.iter().enumerate() {
            let distance = (v - v.round()).abs();
            if distance <= self.config.integrality_tolerance {
                continue;
            }
            if best.is_none_or(|(_, d)| distance > d + PRUNE_TOLERANCE) {
                best = Some((j, distance));
            }
        }
        best.map(|(j, _)| j)
    }

    fn budget_exhausted(&self, stats: &SolveStats, started: Instant) -> bool {
        if stats.nodes >= self.config.max_nodes {
            return true;
        }
        self.config
            .time_limit
            .is_some_and(|limit| started.elapsed() >= limit)
    }

    fn solve_relaxation(&self, program: &LinearProgram) -> SolverOutput {
        let outcome = solve_lp(
            &program.objective,
            &program.constraints,
            self.config.max_lp_iterations,
        );
        let stats = SolveStats {
            nodes: 1,
            lp_iterations: outcome.iterations(),
        };
        match outcome {
            LpOutcome::Optimal { x, objective, .. } => SolverOutput::optimal(x, objective, stats),
            LpOutcome::Infeasible { .. } => SolverOutput::without_values(SolveStatus::Infeasible, stats),
            LpOutcome::Unbounded { .. } => SolverOutput::without_values(SolveStatus::Unbounded, stats),
            LpOutcome::IterationLimit { .. } => SolverOutput::without_values(SolveStatus::NotSolved, stats),
        }
    }

    fn solve_integer(&self, program: &LinearProgram) -> SolverOutput {
        let started = Instant::now();
        let mut stats = SolveStats::default();
        let mut incumbent: Option<Incumbent> = None;
        let mut stack = vec![Node::root(program.num_variables())];

        while let Some(node) = stack.pop() {
            if self.budget_exhausted(&stats, started) {
                warn!(
                    nodes = stats.nodes,
                    open = stack.len() + 1,
                    has_incumbent = incumbent.is_some(),
                    "branch-and-bound budget exhausted"
                );
                return SolverOutput::without_values(SolveStatus::NotSolved, stats);
            }
            stats.nodes += 1;

            let outcome = solve_lp(&program.objective, &node.rows(program), self.config.max_lp_iterations);
            stats.lp_iterations += outcome.iterations();

            let (x, bound) = match outcome {
                LpOutcome::Optimal { x, objective, .. } => (x, objective),
                LpOutcome::Infeasible { .. } => continue,
                LpOutcome::Unbounded { .. } => {
                    return SolverOutput::without_values(SolveStatus::Unbounded, stats);
                }
                LpOutcome::IterationLimit { .. } => {
                    warn!(depth = node.depth, "relaxation hit its iteration limit");
                    return SolverOutput::without_values(SolveStatus::NotSolved, stats);
                }
            };

            if incumbent
                .as_ref()
                .is_some_and(|best| bound >= best.objective - PRUNE_TOLERANCE)
            {
                continue;
            }

            let branch_on = match self.branching_variable(&x) {
                Some(var) => Some(var),
                None => {
                    let rounded: Vec<f64> = x.iter().map(|v| v.round()).collect();
                    if program.is_feasible(&rounded, BOUND_CHECK_TOLERANCE) {
                        let objective = program.objective_value(&rounded);
                        debug!(objective, depth = node.depth, nodes = stats.nodes, "new incumbent");
                        incumbent = Some(Incumbent { x: rounded, objective });
                        None
                    } else {
                        // Rounding within tolerance broke a row with large coefficients.
                        let var = largest_rounding_error(&x);
                        if var.is_none() {
                            debug!(depth = node.depth, "integral point violates a row, dropping node");
                        }
                        var
                    }
                }
            };

            if let Some(var) = branch_on {
                let value = x[var];
                // Ceiling branch is pushed last so it is explored first.
                stack.push(node.with_upper(var, value.floor()));
                stack.push(node.with_lower(var, value.ceil()));
            }
        }

        info!(
            nodes = stats.nodes,
            lp_iterations = stats.lp_iterations,
            "branch-and-bound finished"
        );
        match incumbent {
            Some(best) => SolverOutput::optimal(best.x, best.objective, stats),
            None => SolverOutput::without_values(SolveStatus::Infeasible, stats),
        }
    }
}

/// Variable farthest from its nearest integer, lowest index on ties.
/// `None` when every value is exactly integral.
fn largest_rounding_error(x: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (j, v) in x.iter().enumerate() {
        let distance = (v - v.round()).abs();
        if distance > 0.0 && best.is_none_or(|(_, d)| distance > d) {
            best = Some((j, distance));
        }
    }
    best.map(|(j, _)| j)
}

impl Solver for BranchAndBound {
    fn solve(&self, program: &LinearProgram) -> SolverOutput {
        match program.domain {
            VariableDomain::Continuous => self.solve_relaxation(program),
            VariableDomain::Integer => self.solve_integer(program),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn program(objective: Vec<f64>, constraints: Vec<LinearConstraint>) -> LinearProgram {
        LinearProgram {
            name: "test".to_string(),
            variables: (0..objective.len()).map(|i| format!("x{}", i)).collect(),
            objective,
            constraints,
            domain: VariableDomain::Integer,
        }
    }

    #[test]
    fn test_integral_relaxation_returned_directly() {
        let p = program(vec![1.0, 1.0], vec![LinearConstraint::new("c", vec![1.0, 1.0], Sense::GreaterEqual, 3.0)]);
        let out = BranchAndBound::default().solve(&p);
        assert_eq!(out.status, SolveStatus::Optimal);
        assert_eq!(out.stats.nodes, 1);
        assert!((out.objective.unwrap() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_branching_finds_integer_optimum() {
        // min 0.5a + 2b s.t. 0.5a + 31b >= 30 -> b = 1 (cost 2) beats a = 60 (cost 30)
        let p = program(
            vec![0.5, 2.0],
            vec![LinearConstraint::new("MinProtein", vec![0.5, 31.0], Sense::GreaterEqual, 30.0)],
        );
        let out = BranchAndBound::default().solve(&p);
        assert_eq!(out.status, SolveStatus::Optimal);
        assert_eq!(out.values, vec![0.0, 1.0]);
        assert!((out.objective.unwrap() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_knapsack_style_branching() {
        // min 3a + 5b s.t. 2a + 4b >= 7 -> relaxation 8.75, integer optimum b = 2 (10)
        let p = program(
            vec![3.0, 5.0],
            vec![LinearConstraint::new("c", vec![2.0, 4.0], Sense::GreaterEqual, 7.0)],
        );
        let out = BranchAndBound::default().solve(&p);
        assert_eq!(out.status, SolveStatus::Optimal);
        assert!((out.objective.unwrap() - 10.0).abs() < 1e-9, "{:?}", out);
        assert!(p.is_feasible(&out.values, 1e-9));
    }

    #[test]
    fn test_no_integer_point_is_infeasible() {
        // 0.4 <= x <= 0.6 has a continuous solution but no integer one.
        let p = program(
            vec![1.0],
            vec![
                LinearConstraint::new("lo", vec![1.0], Sense::GreaterEqual, 0.4),
                LinearConstraint::new("hi", vec![1.0], Sense::LessEqual, 0.6),
            ],
        );
        let out = BranchAndBound::default().solve(&p);
        assert_eq!(out.status, SolveStatus::Infeasible);
        assert!(out.values.is_empty());
    }

    #[test]
    fn test_continuous_domain_skips_branching() {
        let mut p = program(
            vec![1.0],
            vec![LinearConstraint::new("lo", vec![2.0], Sense::GreaterEqual, 1.0)],
        );
        p.domain = VariableDomain::Continuous;
        let out = BranchAndBound::default().solve(&p);
        assert_eq!(out.status, SolveStatus::Optimal);
        assert!((out.values[0] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_unbounded_reported() {
        let p = program(vec![-1.0], vec![]);
        let out = BranchAndBound::default().solve(&p);
        assert_eq!(out.status, SolveStatus::Unbounded);
    }

    #[test]
    fn test_node_budget_gives_not_solved() {
        let p = program(
            vec![3.0, 5.0],
            vec![LinearConstraint::new("c", vec![2.0, 4.0], Sense::GreaterEqual, 7.0)],
        );
        let solver = BranchAndBound::new(SolverConfig {
            max_nodes: 1,
            ..SolverConfig::default()
        });
        let out = solver.solve(&p);
        assert_eq!(out.status, SolveStatus::NotSolved);
        assert!(out.objective.is_none());
    }

    #[test]
    fn test_zero_time_limit_gives_not_solved() {
        let p = program(vec![1.0], vec![]);
        let solver = BranchAndBound::new(SolverConfig {
            time_limit: Some(Duration::ZERO),
            ..SolverConfig::default()
        });
        assert_eq!(solver.solve(&p).status, SolveStatus::NotSolved);
    }

    #[test]
    fn test_near_integral_point_is_checked_against_rows() {
        // Relaxation gives x = 1.0000005, within integrality tolerance, but
        // rounding to 1 leaves the row 0.0005 short.
        let p = program(
            vec![1.0],
            vec![LinearConstraint::new("MinCalories", vec![1000.0], Sense::GreaterEqual, 1000.0005)],
        );
        let out = BranchAndBound::default().solve(&p);
        assert_eq!(out.status, SolveStatus::Optimal);
        assert_eq!(out.values, vec![2.0]);
        assert!((out.objective.unwrap() - 2.0).abs() < 1e-9);
        assert!(p.is_feasible(&out.values, 1e-9));
    }

    #[test]
    fn test_largest_rounding_error() {
        assert_eq!(largest_rounding_error(&[1.0, 2.0000001, 2.9999995]), Some(2));
        assert_eq!(largest_rounding_error(&[1.0, 3.0]), None);
    }

    #[test]
    fn test_branching_variable_prefers_most_fractional() {
        let solver = BranchAndBound::default();
        assert_eq!(solver.branching_variable(&[1.0, 2.2, 3.5, 0.6]), Some(2));
        assert_eq!(solver.branching_variable(&[1.0, 2.0000000001]), None);
    }
}
