//! HTTP API handlers for cmap-server

pub mod buildinfo;
pub mod generate;
pub mod health;
pub mod ui;

pub use buildinfo::{buildinfo_routes, get_build_info};
pub use generate::{generate_map, generate_routes};
pub use health::{health_check, health_routes};
pub use ui::{serve_index, serve_sample_csv, ui_routes};
