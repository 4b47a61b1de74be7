use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::sweep::search::{SweepConfig, SweepPoint, cheapest_feasible, is_monotone};

/// Round a float to n decimal places.
fn truncate(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

fn format_cost(objective: Option<f64>) -> String {
    objective.map(|c| format!("{:.2}", c)).unwrap_or_else(|| "-".to_string())
}

/// Print one row per sweep point.
pub fn print_sweep(config: &SweepConfig, points: &[SweepPoint]) {
    println!("\n=== Sweep of {} ({} points) ===\n", config.key, points.len());
    println!("{:>10}  {:<11}  {:>8}  {:>5}  {:>7}", "threshold", "status", "cost", "foods", "units");

    for p in points {
        println!(
            "{:>10.2}  {:<11}  {:>8}  {:>5}  {:>7.1}",
            p.threshold,
            p.status.to_string(),
            format_cost(p.objective),
            p.foods,
            p.units
        );
    }

    println!();
    match cheapest_feasible(points) {
        Some(best) => println!(
            "Cheapest feasible: {} = {:.2} at cost {}",
            config.key,
            best.threshold,
            format_cost(best.objective)
        ),
        None => println!("No feasible point in range."),
    }
    if !is_monotone(points, config.key.direction()) {
        println!("Warning: cost is not monotone in the swept bound.");
    }
}

/// Write all points to a CSV file.
pub fn write_csv(points: &[SweepPoint], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["threshold", "status", "objective", "foods", "units"])?;

    for p in points {
        wtr.write_record([
            format!("{:.3}", p.threshold),
            p.status.to_string(),
            p.objective.map(|c| format!("{:.4}", c)).unwrap_or_default(),
            p.foods.to_string(),
            format!("{:.3}", p.units),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write a JSON summary of the sweep and its cheapest feasible point.
pub fn write_summary_json(config: &SweepConfig, points: &[SweepPoint], path: &Path) -> Result<()> {
    let best = cheapest_feasible(points).map(|p| {
        serde_json::json!({
            "threshold": truncate(p.threshold, 3),
            "objective": p.objective.map(|c| truncate(c, 4)),
            "foods": p.foods,
            "units": truncate(p.units, 3),
        })
    });

    let json = serde_json::json!({
        "key": config.key.key(),
        "range": {
            "from": config.from,
            "to": config.to,
            "step": config.step,
        },
        "base": config.base,
        "points": points.len(),
        "feasible": points.iter().filter(|p| p.is_optimal()).count(),
        "monotone": is_monotone(points, config.key.direction()),
        "cheapest_feasible": best,
    });

    let mut file = File::create(path)?;
    file.write_all(serde_json::to_string_pretty(&json)?.as_bytes())?;
    Ok(())
}
