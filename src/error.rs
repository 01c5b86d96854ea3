use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `shellguard`.
///
/// Execution-time failures (blocked commands, timeouts, non-zero exits) are
/// never errors: they travel back to the caller inside a tool result. The
/// variants here cover what can go wrong while *building* the capability.
#[derive(Debug, Error)]
pub enum ShellGuardError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Guard rules ─────────────────────────────────────────────────────
    #[error("guard: {0}")]
    Guard(#[from] GuardError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Guard rule errors ───────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum GuardError {
    #[error("invalid allow pattern {pattern:?}: {source}")]
    InvalidAllowPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid deny pattern {pattern:?}: {source}")]
    InvalidDenyPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, ShellGuardError>;
