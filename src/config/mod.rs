//! Configuration module for orgpress
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (ORGPRESS_*)
//! 3. Explicit `--config` file, else the nearest `orgpress.toml` at or above
//!    the org directory (or the published document's directory)
//! 4. User config (`<config_dir>/orgpress/config.toml`)
//! 5. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use loader::{
    find_project_config, load_layered, load_with_warnings, user_config_path, with_env_overrides,
    with_env_overrides_from, ConfigWarning, LoadedConfig, PROJECT_CONFIG_FILE,
};
pub use types::{BuildConfig, Config, EngineConfig};
