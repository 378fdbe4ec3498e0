// Domain layer - Pure layout and composition logic, no I/O
pub mod axis_layout;
pub mod dpi;
pub mod draw;
pub mod error;
pub mod geometry;
pub mod legend;
pub mod params;
pub mod render_instructions;
pub mod scale_value;
