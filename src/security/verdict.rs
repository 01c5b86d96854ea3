use serde::{Deserialize, Serialize};

/// Why a command was refused.
///
/// The label names the class of problem, never the rule that matched.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    #[strum(serialize = "dangerous pattern detected")]
    DangerousPattern,
    #[strum(serialize = "not in allowlist")]
    NotInAllowlist,
    #[strum(serialize = "path traversal detected")]
    PathTraversal,
    #[strum(serialize = "URL-encoded path traversal detected")]
    EncodedTraversal,
    #[strum(serialize = "null byte injection detected")]
    NullByte,
    #[strum(serialize = "path outside working dir")]
    OutsideWorkingDir,
    #[strum(serialize = "unresolvable path")]
    UnresolvedPath,
}

/// Outcome of evaluating a command against the guard rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", content = "reason", rename_all = "snake_case")]
pub enum Verdict {
    Allowed,
    Blocked(BlockReason),
}

impl Verdict {
    pub fn is_allowed(self) -> bool {
        self == Self::Allowed
    }

    pub fn is_blocked(self) -> bool {
        !self.is_allowed()
    }

    pub fn reason(self) -> Option<BlockReason> {
        match self {
            Self::Allowed => None,
            Self::Blocked(reason) => Some(reason),
        }
    }

    /// Message shown to both the model and the operator for a refused command.
    pub fn block_message(self) -> Option<String> {
        self.reason()
            .map(|reason| format!("Command blocked by safety guard ({reason})"))
    }
}
