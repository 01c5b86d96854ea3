use crate::error::ConfigError;
use crate::process::{DEFAULT_TIMEOUT, MAX_OUTPUT_CHARS};
use crate::security::UnresolvedPathPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

// ── Top-level config ──────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Path this config was read from. Not serialized.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    #[serde(default)]
    pub exec: ExecConfig,
}

// ── Exec tool ─────────────────────────────────────────────────────

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

fn default_max_output_chars() -> usize {
    MAX_OUTPUT_CHARS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecConfig {
    /// Default working directory. Falls back to the process cwd when unset.
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub restrict_to_workspace: bool,
    /// When non-empty, every command must match at least one pattern.
    #[serde(default)]
    pub allow_patterns: Vec<String>,
    /// Appended to the built-in deny rules.
    #[serde(default)]
    pub extra_deny_patterns: Vec<String>,
    #[serde(default = "default_max_output_chars")]
    pub max_output_chars: usize,
    #[serde(default)]
    pub unresolved_paths: UnresolvedPathPolicy,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            working_dir: None,
            timeout_secs: default_timeout_secs(),
            restrict_to_workspace: false,
            allow_patterns: Vec::new(),
            extra_deny_patterns: Vec::new(),
            max_output_chars: default_max_output_chars(),
            unresolved_paths: UnresolvedPathPolicy::default(),
        }
    }
}

impl ExecConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make every execution fail.
    ///
    /// Pattern syntax is checked later, when the tool is built from this
    /// config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.exec.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "exec.timeout_secs must be greater than 0".into(),
            ));
        }
        if self.exec.max_output_chars == 0 {
            return Err(ConfigError::Validation(
                "exec.max_output_chars must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Expand a leading `~` in path-valued settings.
    pub(crate) fn expand_paths(&mut self) {
        if let Some(dir) = &self.exec.working_dir
            && let Some(raw) = dir.to_str()
        {
            self.exec.working_dir = Some(PathBuf::from(shellexpand::tilde(raw).as_ref()));
        }
    }
}
