pub mod catalog;
pub mod cli;
pub mod constraints;
pub mod error;
pub mod interface;
pub mod logging;
pub mod models;
pub mod planner;
pub mod solver;
pub mod sweep;

pub use catalog::FoodCatalog;
pub use constraints::{ConstraintSpec, NutrientBounds};
pub use error::{OptimizerError, Result};
pub use models::{FoodItem, Quantities, Solution, SolveStatus};
pub use planner::optimize;
