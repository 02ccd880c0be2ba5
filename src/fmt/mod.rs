//! Rendering helpers shared by every transport: level colors and argument formatting.

mod args;
mod color;

pub use args::{Args, render_values};
pub use color::{Color, colorize, colorize_level};
