use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Threat class a deny rule protects against.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ThreatCategory {
    RecursiveDelete,
    WindowsForceDelete,
    DiskFormat,
    RawDeviceWrite,
    PowerState,
    ForkBomb,
    RemoteScriptPipe,
    DynamicEval,
    XargsDelete,
    /// Operator-supplied deny pattern.
    Custom,
}

/// Built-in deny table. Order is evaluation order; categories are disjoint.
const DEFAULT_DENY_RULES: &[(ThreatCategory, &str)] = &[
    // rm -rf / rm -fr / rm -r -f / rm --recursive / rm --force
    (
        ThreatCategory::RecursiveDelete,
        r"\brm\s+(-[rf]{1,2}|--recursive|--force)",
    ),
    (
        ThreatCategory::WindowsForceDelete,
        r"\b(del\s+/[fq]|rmdir\s+/s)",
    ),
    // Anchored to a command position (including `/sbin/mkfs` and backtick
    // substitution) so `clang-format` or `--format` stay usable.
    (
        ThreatCategory::DiskFormat,
        r"(^|[\s;&|(/`])(format|mkfs(\.\w+)?|diskpart)\s",
    ),
    (ThreatCategory::DiskFormat, r"\bdd\s+if="),
    (
        ThreatCategory::RawDeviceWrite,
        r">\s*/dev/(sd[a-z]\d*|nvme\d+n\d+(p\d+)?|vd[a-z]\d*)\b",
    ),
    (ThreatCategory::PowerState, r"\b(shutdown|reboot|poweroff)\b"),
    (ThreatCategory::ForkBomb, r":\(\)\s*\{.*\};\s*:"),
    (
        ThreatCategory::RemoteScriptPipe,
        r"\b(curl|wget)\b.*\|\s*(sudo\s+)?(\S*/)?(sh|bash|zsh|dash|ksh|csh|tcsh|fish)\b",
    ),
    (ThreatCategory::DynamicEval, r"\beval\s+"),
    (ThreatCategory::XargsDelete, r"\bxargs\s+.*\brm\b"),
];

/// A compiled deny rule: one threat category, one pattern.
#[derive(Debug, Clone)]
pub struct DenyRule {
    pub category: ThreatCategory,
    pattern: Regex,
}

impl DenyRule {
    pub fn new(category: ThreatCategory, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            category,
            pattern: compile_case_insensitive(pattern)?,
        })
    }

    pub fn matches(&self, lowered: &str) -> bool {
        self.pattern.is_match(lowered)
    }
}

/// Compile every entry of the built-in deny table.
pub fn default_deny_rules() -> Vec<DenyRule> {
    DEFAULT_DENY_RULES
        .iter()
        .filter_map(|(category, pattern)| match DenyRule::new(*category, pattern) {
            Ok(rule) => Some(rule),
            Err(error) => {
                // Unreachable for the literal table above; covered by tests.
                tracing::error!(%category, "built-in deny rule failed to compile: {error}");
                None
            }
        })
        .collect()
}

pub(super) fn compile_case_insensitive(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}
