//! Dense two-phase tableau simplex for `min c·x, A x (<=|>=|=) b, x >= 0`.
//!
//! Entering and leaving variables follow Bland's rule, so degenerate
//! problems cannot cycle and the pivot sequence is fixed for a given input.

use crate::planner::constants::{FEASIBILITY_TOLERANCE, PIVOT_EPSILON};
use crate::solver::program::{LinearConstraint, Sense};

/// Result of solving one linear relaxation.
#[derive(Debug, Clone, PartialEq)]
pub enum LpOutcome {
    Optimal {
        x: Vec<f64>,
        objective: f64,
        iterations: usize,
    },
    Infeasible {
        iterations: usize,
    },
    Unbounded {
        iterations: usize,
    },
    IterationLimit {
        iterations: usize,
    },
}

impl LpOutcome {
    pub fn iterations(&self) -> usize {
        match self {
            LpOutcome::Optimal { iterations, .. }
            | LpOutcome::Infeasible { iterations }
            | LpOutcome::Unbounded { iterations }
            | LpOutcome::IterationLimit { iterations } => *iterations,
        }
    }
}

/// How a phase of the simplex loop ended.
enum Phase {
    Optimal,
    Unbounded,
    IterationLimit,
}

struct Tableau {
    /// `m` rows of `cols + 1` entries; the last entry is the right-hand side.
    rows: Vec<Vec<f64>>,
    basis: Vec<usize>,
    cols: usize,
    /// Columns at or past this index are artificial.
    artificial_start: usize,
    iterations: usize,
}

impl Tableau {
    fn new(num_vars: usize, constraints: &[LinearConstraint]) -> Self {
        // Rows with a negative right-hand side are negated first, which can
        // turn a <= row into a >= row and vice versa.
        let normalized: Vec<(Vec<f64>, Sense, f64)> = constraints
            .iter()
            .map(|c| {
                let mut coefficients = c.coefficients.clone();
                coefficients.resize(num_vars, 0.0);
                if c.rhs < 0.0 {
                    let negated = coefficients.iter().map(|a| -a).collect();
                    (negated, c.sense.flipped(), -c.rhs)
                } else {
                    (coefficients, c.sense, c.rhs)
                }
            })
            .collect();

        let num_slack = normalized.iter().filter(|(_, s, _)| *s != Sense::Equal).count();
        let num_artificial = normalized
            .iter()
            .filter(|(_, s, _)| *s != Sense::LessEqual)
            .count();

        let artificial_start = num_vars + num_slack;
        let cols = artificial_start + num_artificial;

        let mut rows = Vec::with_capacity(normalized.len());
        let mut basis = Vec::with_capacity(normalized.len());
        let mut next_slack = num_vars;
        let mut next_artificial = artificial_start;

        for (coefficients, sense, rhs) in normalized {
            let mut row = vec![0.0; cols + 1];
            row[..num_vars].copy_from_slice(&coefficients);
            row[cols] = rhs;

            match sense {
                Sense::LessEqual => {
                    row[next_slack] = 1.0;
                    basis.push(next_slack);
                    next_slack += 1;
                }
                Sense::GreaterEqual => {
                    row[next_slack] = -1.0;
                    row[next_artificial] = 1.0;
                    basis.push(next_artificial);
                    next_slack += 1;
                    next_artificial += 1;
                }
                Sense::Equal => {
                    row[next_artificial] = 1.0;
                    basis.push(next_artificial);
                    next_artificial += 1;
                }
            }
            rows.push(row);
        }

        Self {
            rows,
            basis,
            cols,
            artificial_start,
            iterations: 0,
        }
    }

    fn rhs(&self, row: usize) -> f64 {
        self.rows[row][self.cols]
    }

    fn has_artificials(&self) -> bool {
        self.cols > self.artificial_start
    }

    /// Objective value of the current basic solution under `costs`.
    fn value(&self, costs: &[f64]) -> f64 {
        self.basis
            .iter()
            .enumerate()
            .map(|(i, &b)| costs[b] * self.rhs(i))
            .sum()
    }

    fn reduced_cost(&self, costs: &[f64], col: usize) -> f64 {
        let basic: f64 = self
            .basis
            .iter()
            .enumerate()
            .map(|(i, &b)| costs[b] * self.rows[i][col])
            .sum();
        costs[col] - basic
    }

    fn pivot(&mut self, pivot_row: usize, col: usize) {
        let divisor = self.rows[pivot_row][col];
        for v in self.rows[pivot_row].iter_mut() {
            *v /= divisor;
        }

        let pivot = self.rows[pivot_row].clone();
        for (i, row) in self.rows.iter_mut().enumerate() {
            if i == pivot_row {
                continue;
            }
            let factor = row[col];
            if factor != 0.0 {
                for (v, p) in row.iter_mut().zip(&pivot) {
                    *v -= factor * p;
                }
                row[col] = 0.0;
            }
        }
        self.basis[pivot_row] = col;
    }

    /// Run simplex pivots under `costs`, letting only columns below
    /// `enter_limit` enter the basis.
    fn optimize(&mut self, costs: &[f64], enter_limit: usize, max_iterations: usize) -> Phase {
        loop {
            let entering = (0..enter_limit)
                .find(|&j| !self.basis.contains(&j) && self.reduced_cost(costs, j) < -PIVOT_EPSILON);

            let Some(col) = entering else {
                return Phase::Optimal;
            };

            if self.iterations >= max_iterations {
                return Phase::IterationLimit;
            }

            let mut leaving: Option<(usize, f64)> = None;
            for (i, row) in self.rows.iter().enumerate() {
                let a = row[col];
                if a <= PIVOT_EPSILON {
                    continue;
                }
                let ratio = row[self.cols] / a;
                leaving = match leaving {
                    None => Some((i, ratio)),
                    Some((best, best_ratio)) => {
                        let tie = (ratio - best_ratio).abs() <= PIVOT_EPSILON;
                        if ratio < best_ratio - PIVOT_EPSILON || (tie && self.basis[i] < self.basis[best]) {
                            Some((i, ratio))
                        } else {
                            Some((best, best_ratio))
                        }
                    }
                };
            }

            let Some((row, _)) = leaving else {
                return Phase::Unbounded;
            };

            self.pivot(row, col);
            self.iterations += 1;
        }
    }

    /// Pivot zero-valued artificials out of the basis after phase one.
    ///
    /// A row with no usable structural or slack entry is redundant and keeps
    /// its artificial at zero.
    fn evict_artificials(&mut self) {
        for row in 0..self.rows.len() {
            if self.basis[row] < self.artificial_start {
                continue;
            }
            if let Some(col) =
                (0..self.artificial_start).find(|&j| self.rows[row][j].abs() > PIVOT_EPSILON)
            {
                self.pivot(row, col);
            }
        }
    }

    fn primal(&self, num_vars: usize) -> Vec<f64> {
        let mut x = vec![0.0; num_vars];
        for (i, &b) in self.basis.iter().enumerate() {
            if b < num_vars {
                x[b] = self.rhs(i).max(0.0);
            }
        }
        x
    }
}

/// Solve `min objective·x` subject to `constraints` and `x >= 0`.
///
/// `max_iterations` caps the pivots across both phases.
pub fn solve_lp(objective: &[f64], constraints: &[LinearConstraint], max_iterations: usize) -> LpOutcome {
    let num_vars = objective.len();
    let mut tableau = Tableau::new(num_vars, constraints);

    if tableau.has_artificials() {
        let phase_one: Vec<f64> = (0..tableau.cols)
            .map(|j| if j >= tableau.artificial_start { 1.0 } else { 0.0 })
            .collect();

        match tableau.optimize(&phase_one, tableau.cols, max_iterations) {
            Phase::IterationLimit => {
                return LpOutcome::IterationLimit {
                    iterations: tableau.iterations,
                };
            }
            // Phase one is bounded below by zero.
            Phase::Unbounded | Phase::Optimal => {}
        }

        let scale = constraints.iter().map(|c| c.rhs.abs()).fold(1.0, f64::max);
        if tableau.value(&phase_one) > FEASIBILITY_TOLERANCE * scale {
            return LpOutcome::Infeasible {
                iterations: tableau.iterations,
            };
        }
        tableau.evict_artificials();
    }

    let mut phase_two = vec![0.0; tableau.cols];
    phase_two[..num_vars].copy_from_slice(objective);

    let enter_limit = tableau.artificial_start;
    match tableau.optimize(&phase_two, enter_limit, max_iterations) {
        Phase::Optimal => {
            let x = tableau.primal(num_vars);
            let objective_value = objective.iter().zip(&x).map(|(c, v)| c * v).sum();
            LpOutcome::Optimal {
                x,
                objective: objective_value,
                iterations: tableau.iterations,
            }
        }
        Phase::Unbounded => LpOutcome::Unbounded {
            iterations: tableau.iterations,
        },
        Phase::IterationLimit => LpOutcome::IterationLimit {
            iterations: tableau.iterations,
        },
    }
}
