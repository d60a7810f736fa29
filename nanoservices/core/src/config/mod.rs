pub mod loader;
pub mod types;

pub use loader::{load_config, load_config_dir, parse_config, ConfigError};
pub use types::{AssemblyPolicy, GlobalConfig, JobConfig, LogSettings, PluginConfig, Settings};
