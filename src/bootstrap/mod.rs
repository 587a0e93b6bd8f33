pub mod config;
pub mod tracing;
pub mod wiring;

pub use config::{load_config, load_or_default, resolve_config_path};
pub use wiring::{fee_schedule, wire_dependencies};
