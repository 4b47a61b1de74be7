pub mod output;
pub mod search;

pub use output::{print_sweep, write_csv, write_summary_json};
pub use search::{MAX_SWEEP_POINTS, SweepConfig, SweepPoint, cheapest_feasible, is_monotone, run_sweep};
