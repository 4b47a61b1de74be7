pub mod prompts;
pub mod render;

pub use prompts::{collect_bounds, prompt_bound, prompt_yes_no};
pub use render::{
    display_bounds, display_food_list, display_recognized_bounds, display_solution, format_quantity,
};
