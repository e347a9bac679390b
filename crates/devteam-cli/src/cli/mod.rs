pub mod config;
pub mod render;
pub mod runner;
pub mod tracing_setup;

pub use config::{CliConfig, ConfigOverrides, ResolvedConfig};
pub use runner::{run_command, CliCommand};
pub use tracing_setup::init_tracing;
