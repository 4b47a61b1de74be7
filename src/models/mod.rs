pub mod food;
pub mod quantities;
pub mod solution;

pub use food::FoodItem;
pub use quantities::Quantities;
pub use solution::{FoodContribution, Solution, SolveStatus};
