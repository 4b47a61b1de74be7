use std::path::PathBuf;

use clap::Parser;

use nutrition_optimizer_rs::catalog::load_catalog_path;
use nutrition_optimizer_rs::cli::{SolverArgs, parse_key_val};
use nutrition_optimizer_rs::constraints::{BoundKey, NutrientBounds, suggest_key};
use nutrition_optimizer_rs::error::{OptimizerError, Result};
use nutrition_optimizer_rs::logging::init_logging;
use nutrition_optimizer_rs::sweep::{
    SweepConfig, print_sweep, run_sweep, write_csv, write_summary_json,
};

#[derive(Parser, Debug)]
#[command(name = "sweep")]
#[command(about = "Step one nutrient bound across a range and solve each point")]
struct Args {
    /// Bound to sweep, e.g. min_protein
    #[arg(long)]
    key: String,

    /// First threshold
    #[arg(long, default_value = "0")]
    from: f64,

    /// Last threshold (inclusive)
    #[arg(long)]
    to: f64,

    /// Threshold increment
    #[arg(long, default_value = "10")]
    step: f64,

    /// Bounds held fixed at every point, as KEY=VALUE
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    bounds: Vec<(String, String)>,

    /// Path to the food catalog
    #[arg(long, env = "NUTRI_FOODS", default_value = "data/foods.json")]
    foods: PathBuf,

    #[command(flatten)]
    solver: SolverArgs,

    /// Output CSV file for all points
    #[arg(long, default_value = "sweep_results.csv")]
    csv: PathBuf,

    /// Output JSON summary file
    #[arg(long, default_value = "sweep_summary.json")]
    json: PathBuf,

    /// Log debug events
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose, None)?;

    let key = BoundKey::from_key(&args.key).ok_or_else(|| {
        let hint = suggest_key(&args.key)
            .map(|k| format!(" (did you mean '{}'?)", k))
            .unwrap_or_default();
        OptimizerError::InvalidInput(format!("unknown bound '{}'{}", args.key, hint))
    })?;

    let catalog = load_catalog_path(&args.foods)?;
    println!("Loaded {} foods from {:?}", catalog.len(), args.foods);

    let base = NutrientBounds::from_pairs(args.bounds.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;

    let config = SweepConfig {
        key,
        from: args.from,
        to: args.to,
        step: args.step,
        base,
        solver: args.solver.config(),
    };

    let points = run_sweep(&config, &catalog)?;
    print_sweep(&config, &points);

    write_csv(&points, &args.csv)?;
    println!("Results written to {:?}", args.csv);

    write_summary_json(&config, &points, &args.json)?;
    println!("Summary written to {:?}", args.json);

    Ok(())
}
