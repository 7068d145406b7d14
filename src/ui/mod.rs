//! UI module for Ratatui-based terminal interface.

mod app;
mod render;

pub use app::App;
pub use render::render;
