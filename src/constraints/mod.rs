pub mod bounds;
pub mod spec;

pub use bounds::{BoundKey, Direction, NutrientBound};
pub use spec::{ConstraintSpec, NutrientBounds, activation, suggest_key};
