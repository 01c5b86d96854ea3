use super::Config;
use anyhow::{Context, Result};
use directories::UserDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// `~/.shellguard/config.toml`.
pub fn default_config_path() -> Result<PathBuf> {
    let home = UserDirs::new()
        .map(|u| u.home_dir().to_path_buf())
        .context("Could not find home directory")?;
    Ok(home.join(".shellguard").join("config.toml"))
}

impl Config {
    /// Load from `path`, or the default location when `None`.
    ///
    /// A missing file yields defaults and nothing is written. Environment
    /// overrides are applied before validation.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => default_config_path()?,
        };

        let mut config = if config_path.exists() {
            let contents = fs::read_to_string(&config_path).with_context(|| {
                format!("Failed to read config file {}", config_path.display())
            })?;
            let mut config: Config = toml::from_str(&contents).with_context(|| {
                format!("Failed to parse config file {}", config_path.display())
            })?;
            config.config_path = Some(config_path);
            config
        } else {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        config.expand_paths();
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}
