use std::time::Duration;

/// Maximum characters of combined output handed back to the caller.
pub const MAX_OUTPUT_CHARS: usize = 10_000;
/// Placeholder for a command that printed nothing at all.
pub const NO_OUTPUT: &str = "(no output)";

/// How the child process ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    Success,
    /// Ran to completion with a failure status; carries the rendered status.
    NonZeroExit(String),
    TimedOut(Duration),
    Cancelled,
    SpawnFailed,
}

/// Record of output that did not fit the budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truncation {
    pub original_chars: usize,
    pub omitted_chars: usize,
}

/// Shaped result of running one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub text: String,
    pub truncation: Option<Truncation>,
    pub termination: Termination,
}

impl ExecutionOutcome {
    /// Outcome for a process that exited on its own. `exit` is `None` on
    /// success and the rendered status otherwise.
    pub fn completed(stdout: &str, stderr: &str, exit: Option<String>, max_chars: usize) -> Self {
        let mut text = combine_streams(stdout, stderr);
        if let Some(code) = &exit {
            text.push_str("\nExit code: ");
            text.push_str(code);
        }
        if text.is_empty() {
            text.push_str(NO_OUTPUT);
        }

        let (text, truncation) = truncate_chars(text, max_chars);
        Self {
            text,
            truncation,
            termination: exit.map_or(Termination::Success, Termination::NonZeroExit),
        }
    }

    /// Carries no process output, only the deadline that was hit.
    pub fn timed_out(timeout: Duration) -> Self {
        Self {
            text: format!("Command timed out after {timeout:?}"),
            truncation: None,
            termination: Termination::TimedOut(timeout),
        }
    }

    pub fn cancelled() -> Self {
        Self {
            text: "Command cancelled".to_string(),
            truncation: None,
            termination: Termination::Cancelled,
        }
    }

    pub fn spawn_failed(error: &std::io::Error) -> Self {
        Self {
            text: format!("Failed to execute command: {error}"),
            truncation: None,
            termination: Termination::SpawnFailed,
        }
    }

    pub fn is_error(&self) -> bool {
        self.termination != Termination::Success
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self.termination, Termination::TimedOut(_))
    }
}

/// Stdout followed by a labelled stderr section when stderr is non-empty.
pub fn combine_streams(stdout: &str, stderr: &str) -> String {
    let mut combined = String::with_capacity(stdout.len() + stderr.len() + 9);
    combined.push_str(stdout);
    if !stderr.is_empty() {
        combined.push_str("\nSTDERR:\n");
        combined.push_str(stderr);
    }
    combined
}

/// Cut `text` to `max_chars` characters and append an omission marker.
pub fn truncate_chars(mut text: String, max_chars: usize) -> (String, Option<Truncation>) {
    let Some((cut, _)) = text.char_indices().nth(max_chars) else {
        return (text, None);
    };
    let original_chars = max_chars + text[cut..].chars().count();
    let omitted_chars = original_chars - max_chars;

    text.truncate(cut);
    text.push_str(&format!("\n... (truncated, {omitted_chars} more chars)"));
    (
        text,
        Some(Truncation {
            original_chars,
            omitted_chars,
        }),
    )
}
