use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::verdict::{BlockReason, Verdict};

/// Percent-encoded spellings of `../` and `..\`.
const ENCODED_TRAVERSAL: &[&str] = &["%2e%2e%2f", "%2e%2e/", "..%2f", "%2e%2e%5c"];

/// Shell punctuation that ends a word for path extraction. Brace, comma and
/// backtick are included so `{/etc/passwd,x}` and `` `cat /etc/x` `` still
/// yield rooted paths.
static WORD_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[\s"'=<>|;&(){},`]+"#).expect("word break pattern is a valid literal")
});

/// What to do with a path token that cannot be resolved on this host, such
/// as a Windows drive path on a POSIX system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedPathPolicy {
    /// Ignore the token (fail-open).
    #[default]
    Skip,
    /// Refuse the command (fail-closed).
    Block,
}

/// Keeps every filesystem path a command mentions inside the working directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkspaceConfinement {
    pub unresolved: UnresolvedPathPolicy,
}

impl WorkspaceConfinement {
    pub const fn new(unresolved: UnresolvedPathPolicy) -> Self {
        Self { unresolved }
    }

    /// Check the raw command text against `working_dir`.
    pub fn check(&self, command: &str, working_dir: &Path) -> Verdict {
        if command.contains("../") || command.contains("..\\") {
            return Verdict::Blocked(BlockReason::PathTraversal);
        }

        let lowered = command.to_lowercase();
        if ENCODED_TRAVERSAL
            .iter()
            .any(|pattern| lowered.contains(pattern))
        {
            return Verdict::Blocked(BlockReason::EncodedTraversal);
        }

        if command.contains('\0') || lowered.contains("%00") {
            return Verdict::Blocked(BlockReason::NullByte);
        }

        let Some(workspace) = std::path::absolute(working_dir)
            .ok()
            .map(|path| normalize_lexically(&path))
        else {
            tracing::warn!(
                working_dir = %working_dir.display(),
                "working directory could not be resolved"
            );
            return self.on_unresolved();
        };

        for token in path_tokens(command) {
            let Some(resolved) = resolve_token(token) else {
                tracing::debug!(token, "path token could not be resolved");
                if self.unresolved == UnresolvedPathPolicy::Block {
                    return Verdict::Blocked(BlockReason::UnresolvedPath);
                }
                continue;
            };

            if !is_within(&resolved, &workspace) {
                tracing::warn!(
                    path = %resolved.display(),
                    workspace = %workspace.display(),
                    "command references a path outside the working directory"
                );
                return Verdict::Blocked(BlockReason::OutsideWorkingDir);
            }
        }

        Verdict::Allowed
    }

    fn on_unresolved(self) -> Verdict {
        match self.unresolved {
            UnresolvedPathPolicy::Skip => Verdict::Allowed,
            UnresolvedPathPolicy::Block => Verdict::Blocked(BlockReason::UnresolvedPath),
        }
    }
}

/// Every path token in `command` that must be checked, in order of
/// appearance.
///
/// Rooted words (`/…`, `~/…`, `X:\…`) are taken whole. A word whose rooted
/// part hangs off a variable expansion (`$HOME/.ssh`) or an option letter
/// (`-C/etc`) contributes everything from its first `/`. Plain relative words
/// such as `src/main.rs` contribute nothing.
pub fn path_tokens(command: &str) -> impl Iterator<Item = &str> {
    WORD_BREAK.split(command).filter_map(path_token)
}

fn path_token(word: &str) -> Option<&str> {
    if word.starts_with('/') || word.starts_with("~/") || is_drive_path(word) {
        return Some(word);
    }
    if let Some(rest) = word.strip_prefix("file://")
        && rest.starts_with('/')
    {
        return Some(rest);
    }

    let slash = word.find('/')?;
    if word.starts_with('-') || word.contains('$') {
        return Some(&word[slash..]);
    }
    None
}

fn is_drive_path(word: &str) -> bool {
    let bytes = word.as_bytes();
    bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'\\'
}

/// Resolve a token to an absolute, lexically normalized path.
///
/// Returns `None` when the token has no meaning as a rooted path on this
/// host (a drive-letter path on Unix, or `~` with no known home directory).
fn resolve_token(token: &str) -> Option<PathBuf> {
    let expanded = shellexpand::tilde(token);
    let path = Path::new(expanded.as_ref());
    if !path.has_root() {
        return None;
    }
    std::path::absolute(path)
        .ok()
        .map(|absolute| normalize_lexically(&absolute))
}

/// Fold `.` and `..` without touching the filesystem. `..` at the root stays
/// at the root.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Lexical containment, plus a canonical check when both paths exist so a
/// symlink inside the workspace cannot point outside it.
fn is_within(resolved: &Path, workspace: &Path) -> bool {
    if !resolved.starts_with(workspace) {
        return false;
    }
    match (resolved.canonicalize(), workspace.canonicalize()) {
        (Ok(real_path), Ok(real_workspace)) => real_path.starts_with(real_workspace),
        _ => true,
    }
}
