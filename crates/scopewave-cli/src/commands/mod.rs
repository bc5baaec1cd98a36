//! CLI command implementations

pub mod draw;
pub mod draw_all;
pub mod keymap;
pub mod tone;

mod reporting;
