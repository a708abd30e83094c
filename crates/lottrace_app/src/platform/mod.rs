mod app;
mod effects;
pub mod logging;
mod mapping;
mod ui;

pub use app::run_app;
