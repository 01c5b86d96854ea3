mod rules;

pub use rules::{DenyRule, ThreatCategory, default_deny_rules};

use super::verdict::{BlockReason, Verdict};
use crate::error::GuardError;
use regex::Regex;

/// Deny/allow rule engine evaluated over the raw command text.
///
/// Deny rules always run first and win over allow rules. An empty allow list
/// means deny-list-only mode.
#[derive(Debug, Clone)]
pub struct CommandGuard {
    deny_rules: Vec<DenyRule>,
    allow_patterns: Vec<Regex>,
}

impl Default for CommandGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandGuard {
    /// Guard with the built-in deny table and no allowlist.
    pub fn new() -> Self {
        Self {
            deny_rules: default_deny_rules(),
            allow_patterns: Vec::new(),
        }
    }

    /// Append operator-supplied deny patterns after the built-in table.
    pub fn with_extra_deny_patterns<S: AsRef<str>>(
        mut self,
        patterns: &[S],
    ) -> Result<Self, GuardError> {
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let rule = DenyRule::new(ThreatCategory::Custom, pattern).map_err(|source| {
                GuardError::InvalidDenyPattern {
                    pattern: pattern.to_string(),
                    source,
                }
            })?;
            self.deny_rules.push(rule);
        }
        Ok(self)
    }

    /// Replace the allowlist.
    ///
    /// Every pattern is compiled before anything is swapped in, so a bad
    /// pattern leaves the previous allowlist untouched.
    pub fn set_allow_patterns<S: AsRef<str>>(&mut self, patterns: &[S]) -> Result<(), GuardError> {
        let compiled = patterns
            .iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                rules::compile_case_insensitive(pattern).map_err(|source| {
                    GuardError::InvalidAllowPattern {
                        pattern: pattern.to_string(),
                        source,
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.allow_patterns = compiled;
        Ok(())
    }

    pub fn allow_pattern_count(&self) -> usize {
        self.allow_patterns.len()
    }

    pub fn deny_rules(&self) -> &[DenyRule] {
        &self.deny_rules
    }

    /// Evaluate a command against the deny rules, then the allowlist.
    pub fn evaluate(&self, command: &str) -> Verdict {
        let lowered = command.trim().to_lowercase();

        if let Some(rule) = self.deny_rules.iter().find(|rule| rule.matches(&lowered)) {
            tracing::warn!(category = %rule.category, "command blocked by deny rule");
            return Verdict::Blocked(BlockReason::DangerousPattern);
        }

        if !self.allow_patterns.is_empty()
            && !self
                .allow_patterns
                .iter()
                .any(|pattern| pattern.is_match(&lowered))
        {
            tracing::warn!("command blocked: no allow pattern matched");
            return Verdict::Blocked(BlockReason::NotInAllowlist);
        }

        Verdict::Allowed
    }
}
