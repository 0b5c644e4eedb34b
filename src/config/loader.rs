//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::{OrgpressError, OrgpressResult};

use super::types::Config;

/// Project config file name, looked up in the org directory
pub const PROJECT_CONFIG_FILE: &str = "orgpress.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> OrgpressResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| OrgpressError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                line: find_line_number(&content, &key),
                key,
                file: path.to_path_buf(),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// `<config_dir>/orgpress/config.toml`, if the platform has a config dir
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("orgpress").join("config.toml"))
}

/// Nearest `orgpress.toml` in `start` or one of its parents
pub fn find_project_config(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(PROJECT_CONFIG_FILE))
        .find(|p| p.is_file())
}

/// Effective configuration and where its file layer came from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub warnings: Vec<ConfigWarning>,
    /// File that was read, if any
    pub source: Option<PathBuf>,
}

/// Resolve the file layer, then apply environment overrides.
///
/// An explicit file must exist. Otherwise the nearest project file at or
/// above `project_dir` wins over the user file; with neither, defaults
/// apply.
pub fn load_layered(
    explicit: Option<&Path>,
    project_dir: Option<&Path>,
) -> OrgpressResult<LoadedConfig> {
    let candidate = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => project_dir
            .and_then(find_project_config)
            .or_else(|| user_config_path().filter(|p| p.is_file())),
    };

    let (config, warnings) = match &candidate {
        Some(path) => {
            debug!("loading config from {}", path.display());
            load_with_warnings(path)?
        }
        None => (Config::default(), Vec::new()),
    };

    Ok(LoadedConfig {
        config: with_env_overrides(config),
        warnings,
        source: candidate,
    })
}

/// Apply environment variable overrides (ORGPRESS_* prefix)
pub fn with_env_overrides(config: Config) -> Config {
    with_env_overrides_from(config, |key| std::env::var(key).ok())
}

/// Apply overrides read through `lookup`
pub fn with_env_overrides_from(
    mut config: Config,
    lookup: impl Fn(&str) -> Option<String>,
) -> Config {
    // ORGPRESS_EMACS
    if let Some(program) = lookup("ORGPRESS_EMACS").filter(|s| !s.is_empty()) {
        config.engine.program = program;
    }

    // ORGPRESS_JOBS
    if let Some(jobs) = lookup("ORGPRESS_JOBS") {
        match jobs.trim().parse::<usize>() {
            Ok(n) => config.build.jobs = n,
            Err(_) => warn!("ignoring ORGPRESS_JOBS='{}': not a number", jobs),
        }
    }

    // ORGPRESS_LOAD (platform path-list separator)
    if let Some(load) = lookup("ORGPRESS_LOAD").filter(|s| !s.is_empty()) {
        config.engine.load = std::env::split_paths(&load).collect();
    }

    config
}

fn find_line_number(content: &str, key: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| {
            let line = line.trim_start();
            line.starts_with(key)
                && line[key.len()..].trim_start().starts_with('=')
        })
        .map(|i| i + 1)
}
