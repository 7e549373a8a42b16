//! Location of the TOML configuration files.
use std::{env, path::PathBuf};

/// Directory searched for configuration files unless overridden.
pub const DEFAULT_CONFIG_DIR: &str = "config";

/// Environment variable that overrides `DEFAULT_CONFIG_DIR`.
pub const CONFIG_DIR_ENV: &str = "HYPERFONE_CONFIG_DIR";

/// Resolves `file` inside the configuration directory.
pub fn config_path(file: &str) -> PathBuf {
    let dir = env::var(CONFIG_DIR_ENV)
        .ok()
        .filter(|dir| !dir.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CONFIG_DIR.to_string());
    PathBuf::from(dir).join(file)
}
