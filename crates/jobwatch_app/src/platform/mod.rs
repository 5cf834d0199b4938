mod app;
pub mod cli;
mod config;
mod effects;
mod files;
mod ui;

pub use app::run_app;
