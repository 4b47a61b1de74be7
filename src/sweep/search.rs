use tracing::{debug, info};

use crate::catalog::FoodCatalog;
use crate::constraints::{BoundKey, Direction, NutrientBounds};
use crate::error::{OptimizerError, Result};
use crate::models::SolveStatus;
use crate::planner::solve_bounds;
use crate::solver::{BranchAndBound, SolverConfig};

/// Objective slack allowed when checking monotonicity.
const MONOTONE_TOLERANCE: f64 = 1e-6;

/// Most thresholds a single sweep may solve.
pub const MAX_SWEEP_POINTS: usize = 10_000;

/// Configuration for a threshold sweep.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Bound whose threshold is stepped.
    pub key: BoundKey,
    pub from: f64,
    pub to: f64,
    pub step: f64,
    /// Bounds held fixed at every point. The swept key is overwritten.
    pub base: NutrientBounds,
    pub solver: SolverConfig,
}

/// Outcome of one sweep point.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepPoint {
    pub threshold: f64,
    pub status: SolveStatus,
    pub objective: Option<f64>,
    /// Number of distinct foods selected.
    pub foods: usize,
    /// Total units bought.
    pub units: f64,
}

impl SweepPoint {
    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }
}

impl SweepConfig {
    /// Thresholds from `from` to `to` inclusive.
    ///
    /// Values are computed as `from + i * step` so rounding does not drift.
    pub fn thresholds(&self) -> Result<Vec<f64>> {
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(OptimizerError::InvalidInput(format!(
                "sweep step must be positive, got {}",
                self.step
            )));
        }
        if !self.from.is_finite() || !self.to.is_finite() || self.from > self.to {
            return Err(OptimizerError::InvalidInput(format!(
                "sweep range {}..{} is empty",
                self.from, self.to
            )));
        }

        let steps = ((self.to - self.from) / self.step + 1e-9).floor();
        if steps >= MAX_SWEEP_POINTS as f64 {
            return Err(OptimizerError::InvalidInput(format!(
                "sweep {}..{} by {} needs more than {} points",
                self.from, self.to, self.step, MAX_SWEEP_POINTS
            )));
        }
        let count = steps as usize + 1;
        Ok((0..count).map(|i| self.from + i as f64 * self.step).collect())
    }
}

/// Solve once per threshold, holding the other bounds fixed.
///
/// A threshold of zero or less switches the swept bound off, matching how a
/// zero value is treated on input.
pub fn run_sweep(config: &SweepConfig, catalog: &FoodCatalog) -> Result<Vec<SweepPoint>> {
    let thresholds = config.thresholds()?;
    let solver = BranchAndBound::new(config.solver.clone());

    info!(key = %config.key, points = thresholds.len(), "starting sweep");

    let mut points = Vec::with_capacity(thresholds.len());
    for threshold in thresholds {
        let mut bounds = config.base.clone();
        bounds.set(config.key, (threshold > 0.0).then_some(threshold));

        let solution = solve_bounds(&bounds, catalog, &config.solver, &solver)?;
        debug!(threshold, status = %solution.status, "sweep point solved");

        points.push(SweepPoint {
            threshold,
            status: solution.status,
            objective: solution.objective_value,
            foods: solution.quantities.len(),
            units: solution.total_units(),
        });
    }

    Ok(points)
}

/// The cheapest optimal point; the lowest threshold wins a tie.
pub fn cheapest_feasible(points: &[SweepPoint]) -> Option<&SweepPoint> {
    points
        .iter()
        .filter_map(|p| p.objective.filter(|_| p.is_optimal()).map(|cost| (p, cost)))
        .fold(None, |best: Option<(&SweepPoint, f64)>, (p, cost)| match best {
            Some((_, best_cost)) if best_cost <= cost => best,
            _ => Some((p, cost)),
        })
        .map(|(p, _)| p)
}

/// Check that cost never improves as the swept bound tightens.
///
/// Raising a minimum tightens it; raising a maximum loosens it. Points that
/// are not `Optimal` or `Infeasible` carry no information and are skipped.
pub fn is_monotone(points: &[SweepPoint], direction: Direction) -> bool {
    let mut ordered: Vec<&SweepPoint> = points
        .iter()
        .filter(|p| matches!(p.status, SolveStatus::Optimal | SolveStatus::Infeasible))
        .collect();
    if direction == Direction::Max {
        ordered.reverse();
    }

    // Walk from loosest to tightest.
    let mut previous: Option<f64> = None;
    let mut seen_infeasible = false;
    for point in ordered {
        match point.objective.filter(|_| point.is_optimal()) {
            Some(cost) => {
                if seen_infeasible {
                    return false;
                }
                if previous.is_some_and(|prev| cost < prev - MONOTONE_TOLERANCE) {
                    return false;
                }
                previous = Some(cost);
            }
            None => seen_infeasible = true,
        }
    }
    true
}
