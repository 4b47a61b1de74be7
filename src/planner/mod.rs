pub mod constants;
pub mod extract;
pub mod lp_format;
pub mod model;
pub mod optimize;

pub use constants::*;
pub use extract::extract_solution;
pub use model::build_program;
pub use optimize::{optimize, optimize_with, solve_bounds, solve_spec};
