pub mod frontend;
pub mod interaction;
pub mod line_style;
