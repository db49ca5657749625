pub mod app;
pub mod calendar;
pub mod cli;
pub mod config;
pub mod grid;
pub mod locale;
pub mod options;
pub mod tui;
pub mod view;

pub use app::*;
pub use calendar::*;
pub use cli::*;
pub use config::*;
pub use grid::*;
pub use options::*;
pub use tui::*;
pub use view::*;
