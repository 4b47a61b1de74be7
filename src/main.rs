use std::fs;
use std::path::Path;

use clap::Parser;
use serde_json::{Map, Value};
use tracing::info;

use nutrition_optimizer_rs::catalog::{FoodCatalog, load_catalog_path};
use nutrition_optimizer_rs::cli::{Cli, Command, OptimizeArgs};
use nutrition_optimizer_rs::constraints::NutrientBounds;
use nutrition_optimizer_rs::error::{OptimizerError, Result};
use nutrition_optimizer_rs::interface::{
    collect_bounds, display_bounds, display_food_list, display_recognized_bounds,
    display_solution, prompt_yes_no,
};
use nutrition_optimizer_rs::logging::init_logging;
use nutrition_optimizer_rs::planner::{build_program, solve_bounds};
use nutrition_optimizer_rs::solver::BranchAndBound;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    match cli.command.unwrap_or_default() {
        Command::Optimize(args) => cmd_optimize(&load_catalog(&cli.foods)?, &args),
        Command::Foods => {
            display_food_list(&load_catalog(&cli.foods)?, "Food catalog");
            Ok(())
        }
        Command::Bounds => {
            display_recognized_bounds();
            Ok(())
        }
    }
}

fn load_catalog(path: &Path) -> Result<FoodCatalog> {
    let catalog = load_catalog_path(path)?;
    info!(path = %path.display(), foods = catalog.len(), "catalog loaded");
    Ok(catalog)
}

/// Collect bounds, solve, and print the result.
fn cmd_optimize(catalog: &FoodCatalog, args: &OptimizeArgs) -> Result<()> {
    let bounds = if args.interactive {
        let bounds = collect_bounds()?;
        println!();
        display_bounds(&bounds);
        if !prompt_yes_no("Solve with these bounds?", true)? {
            return Ok(());
        }
        bounds
    } else {
        NutrientBounds::from_json_map(&raw_bounds(args)?)?
    };

    let config = args.solver.config();

    if let Some(path) = &args.write_lp {
        build_program(catalog, &bounds.to_spec(), config.domain).write_lp(path)?;
        info!(path = %path.display(), "model written");
    }

    let solver = BranchAndBound::new(config.clone());
    let solution = solve_bounds(&bounds, catalog, &config, &solver)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&solution)?);
    } else {
        display_solution(&solution, catalog);
    }

    Ok(())
}

/// Merge the constraints file with `--set` pairs; later pairs win.
fn raw_bounds(args: &OptimizeArgs) -> Result<Map<String, Value>> {
    let mut raw = match &args.constraints {
        Some(path) => read_constraints_file(path)?,
        None => Map::new(),
    };
    for (key, value) in &args.bounds {
        raw.insert(key.clone(), Value::String(value.clone()));
    }
    Ok(raw)
}

fn read_constraints_file(path: &Path) -> Result<Map<String, Value>> {
    let content = fs::read_to_string(path)?;
    match serde_json::from_str::<Value>(&content)? {
        Value::Object(map) => Ok(map),
        other => Err(OptimizerError::InvalidInput(format!(
            "{} must hold a JSON object of bounds, found {}",
            path.display(),
            other
        ))),
    }
}
