use super::Config;
use std::path::PathBuf;

impl Config {
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    pub(crate) fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup("SHELLGUARD_WORKING_DIR")
            && !dir.is_empty()
        {
            self.exec.working_dir = Some(PathBuf::from(dir));
        }

        if let Some(raw) = lookup("SHELLGUARD_TIMEOUT_SECS") {
            match raw.parse::<u64>() {
                Ok(secs) => self.exec.timeout_secs = secs,
                Err(_) => tracing::warn!("ignoring invalid SHELLGUARD_TIMEOUT_SECS={raw:?}"),
            }
        }

        if let Some(raw) = lookup("SHELLGUARD_RESTRICT_TO_WORKSPACE") {
            match parse_bool(&raw) {
                Some(restrict) => self.exec.restrict_to_workspace = restrict,
                None => {
                    tracing::warn!("ignoring invalid SHELLGUARD_RESTRICT_TO_WORKSPACE={raw:?}");
                }
            }
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
