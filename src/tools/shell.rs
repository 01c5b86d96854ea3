use super::traits::{ExecutionContext, Tool};
use super::types::ToolResult;
use crate::config::ExecConfig;
use crate::error::GuardError;
use crate::process::{DEFAULT_TIMEOUT, ExecutionOutcome, ProcessRunner};
use crate::security::{CommandGuard, UnresolvedPathPolicy, Verdict, WorkspaceConfinement};
use serde_json::{Value, json};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Shell command execution tool guarded by deny/allow rules and optional
/// workspace confinement.
///
/// Configure with the setters first, then share (e.g. behind an `Arc`) for
/// concurrent use. Setters take `&mut self`, so reconfiguring while a call is
/// in flight does not compile.
#[derive(Debug, Clone)]
pub struct ExecTool {
    working_dir: Option<PathBuf>,
    timeout: Duration,
    restrict_to_workspace: bool,
    guard: CommandGuard,
    confinement: WorkspaceConfinement,
    runner: ProcessRunner,
}

impl ExecTool {
    pub fn new(working_dir: Option<PathBuf>, restrict_to_workspace: bool) -> Self {
        Self {
            working_dir,
            timeout: DEFAULT_TIMEOUT,
            restrict_to_workspace,
            guard: CommandGuard::new(),
            confinement: WorkspaceConfinement::default(),
            runner: ProcessRunner::default(),
        }
    }

    /// Build from the `[exec]` config section. Fails on any pattern that does
    /// not compile.
    pub fn from_config(config: &ExecConfig) -> Result<Self, GuardError> {
        let mut guard = CommandGuard::new().with_extra_deny_patterns(&config.extra_deny_patterns)?;
        guard.set_allow_patterns(&config.allow_patterns)?;

        Ok(Self {
            working_dir: config.working_dir.clone(),
            timeout: config.timeout(),
            restrict_to_workspace: config.restrict_to_workspace,
            guard,
            confinement: WorkspaceConfinement::new(config.unresolved_paths),
            runner: ProcessRunner::default().with_max_output_chars(config.max_output_chars),
        })
    }

    pub fn with_runner(mut self, runner: ProcessRunner) -> Self {
        self.runner = runner;
        self
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub fn set_restrict_to_workspace(&mut self, restrict: bool) {
        self.restrict_to_workspace = restrict;
    }

    /// Replace the allowlist. On error the previous allowlist stays active.
    pub fn set_allow_patterns<S: AsRef<str>>(&mut self, patterns: &[S]) -> Result<(), GuardError> {
        self.guard.set_allow_patterns(patterns)
    }

    pub fn set_unresolved_path_policy(&mut self, policy: UnresolvedPathPolicy) {
        self.confinement = WorkspaceConfinement::new(policy);
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn restrict_to_workspace(&self) -> bool {
        self.restrict_to_workspace
    }

    /// Explicit override, then the configured default, then the process
    /// current directory.
    pub fn effective_working_dir(&self, explicit: Option<&str>) -> PathBuf {
        if let Some(dir) = explicit.filter(|dir| !dir.is_empty()) {
            return PathBuf::from(shellexpand::tilde(dir).as_ref());
        }
        if let Some(dir) = self
            .working_dir
            .as_ref()
            .filter(|dir| !dir.as_os_str().is_empty())
        {
            return dir.clone();
        }
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    }

    /// Guard rules, then confinement when enabled. Never spawns anything.
    pub fn evaluate(&self, command: &str, working_dir: &Path) -> Verdict {
        let verdict = self.guard.evaluate(command);
        if verdict.is_blocked() || !self.restrict_to_workspace {
            return verdict;
        }
        self.confinement.check(command, working_dir)
    }

    /// Evaluate and, if allowed, run `command`.
    pub async fn run(
        &self,
        command: &str,
        working_dir: Option<&str>,
        cancel: &CancellationToken,
    ) -> ToolResult {
        let cwd = self.effective_working_dir(working_dir);

        let verdict = self.evaluate(command, &cwd);
        if let Some(message) = verdict.block_message() {
            return ToolResult::error(message);
        }

        tracing::debug!(cwd = %cwd.display(), timeout = ?self.timeout, "running command");
        let outcome = self
            .runner
            .run(command, Some(&cwd), self.timeout, cancel)
            .await;
        render(outcome)
    }
}

fn render(outcome: ExecutionOutcome) -> ToolResult {
    let is_error = outcome.is_error();
    ToolResult::new(outcome.text, is_error)
}

impl Tool for ExecTool {
    fn name(&self) -> &str {
        "exec"
    }

    fn description(&self) -> &str {
        "Execute a shell command and return its output. Use with caution."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "description": "The shell command to execute"
                },
                "working_dir": {
                    "type": "string",
                    "description": "Optional working directory for the command"
                }
            },
            "required": ["command"]
        })
    }

    fn execute<'a>(
        &'a self,
        args: Value,
        ctx: &'a ExecutionContext,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<ToolResult>> + Send + 'a>> {
        Box::pin(async move {
            let Some(command) = args.get("command").and_then(Value::as_str) else {
                return Ok(ToolResult::error("command is required"));
            };
            let working_dir = args.get("working_dir").and_then(Value::as_str);

            Ok(self.run(command, working_dir, &ctx.cancellation).await)
        })
    }
}
