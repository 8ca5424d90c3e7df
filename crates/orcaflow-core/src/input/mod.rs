pub mod params;
pub mod template;

pub use template::{InputSpec, render_input, write_input};
