use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::planner::constants::{DEFAULT_MAX_LP_ITERATIONS, DEFAULT_MAX_NODES};
use crate::solver::{SolverConfig, VariableDomain};

/// Nutrition optimizer: the cheapest basket of foods that meets your nutrient bounds.
#[derive(Parser, Debug)]
#[command(name = "nutrition-optimizer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the food catalog (JSON object, or CSV with a .csv extension).
    #[arg(short, long, env = "NUTRI_FOODS", default_value = "data/foods.json")]
    pub foods: PathBuf,

    /// Log debug events.
    #[arg(short, long)]
    pub verbose: bool,

    /// Append log output to this file instead of stderr.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Solve for the cheapest selection meeting the given bounds.
    Optimize(OptimizeArgs),

    /// List the foods in the catalog.
    Foods,

    /// List the recognized bound keys.
    Bounds,
}

impl Default for Command {
    fn default() -> Self {
        Command::Optimize(OptimizeArgs::default())
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct OptimizeArgs {
    /// A bound as KEY=VALUE, e.g. --set min_protein=30 (repeatable).
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub bounds: Vec<(String, String)>,

    /// JSON file with a bounds object; --set entries override it.
    #[arg(long)]
    pub constraints: Option<PathBuf>,

    /// Ask for each bound interactively.
    #[arg(short, long)]
    pub interactive: bool,

    #[command(flatten)]
    pub solver: SolverArgs,

    /// Print the solution as JSON.
    #[arg(long)]
    pub json: bool,

    /// Write the generated model in LP format to this path.
    #[arg(long)]
    pub write_lp: Option<PathBuf>,
}

/// Solver settings shared by every binary.
#[derive(Args, Debug, Clone)]
pub struct SolverArgs {
    /// Allow fractional quantities instead of whole units.
    #[arg(long)]
    pub continuous: bool,

    /// Branch-and-bound node budget.
    #[arg(long, env = "NUTRI_MAX_NODES", default_value_t = DEFAULT_MAX_NODES)]
    pub max_nodes: usize,

    /// Pivot budget for each linear relaxation.
    #[arg(long, default_value_t = DEFAULT_MAX_LP_ITERATIONS)]
    pub max_lp_iterations: usize,

    /// Wall-clock budget in milliseconds.
    #[arg(long, env = "NUTRI_TIME_LIMIT_MS")]
    pub time_limit_ms: Option<u64>,
}

impl Default for SolverArgs {
    fn default() -> Self {
        Self {
            continuous: false,
            max_nodes: DEFAULT_MAX_NODES,
            max_lp_iterations: DEFAULT_MAX_LP_ITERATIONS,
            time_limit_ms: None,
        }
    }
}

impl SolverArgs {
    pub fn config(&self) -> SolverConfig {
        SolverConfig {
            domain: if self.continuous {
                VariableDomain::Continuous
            } else {
                VariableDomain::Integer
            },
            max_nodes: self.max_nodes,
            max_lp_iterations: self.max_lp_iterations,
            time_limit: self.time_limit_ms.map(Duration::from_millis),
            ..SolverConfig::default()
        }
    }
}

/// Parse `KEY=VALUE`. The value may be empty, which leaves the bound off.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{}'", s));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("min_protein=30"),
            Ok(("min_protein".to_string(), "30".to_string()))
        );
        assert_eq!(
            parse_key_val("max_sugars="),
            Ok(("max_sugars".to_string(), String::new()))
        );
        assert!(parse_key_val("min_protein").is_err());
        assert!(parse_key_val("=5").is_err());
    }

    #[test]
    fn test_cli_parses_optimize() {
        let cli = Cli::try_parse_from([
            "nutrition-optimizer",
            "--foods",
            "foods.csv",
            "optimize",
            "--set",
            "min_protein=30",
            "--set",
            "max_calories=2500",
            "--continuous",
            "--time-limit-ms",
            "500",
        ])
        .unwrap();

        assert_eq!(cli.foods, PathBuf::from("foods.csv"));
        let Some(Command::Optimize(args)) = cli.command else {
            panic!("expected optimize");
        };
        assert_eq!(args.bounds.len(), 2);
        let config = args.solver.config();
        assert_eq!(config.domain, VariableDomain::Continuous);
        assert_eq!(config.time_limit, Some(Duration::from_millis(500)));
        assert_eq!(config.max_nodes, DEFAULT_MAX_NODES);
    }

    #[test]
    fn test_default_command_is_optimize() {
        let cli = Cli::try_parse_from(["nutrition-optimizer"]).unwrap();
        assert!(matches!(cli.command.unwrap_or_default(), Command::Optimize(_)));
    }
}
