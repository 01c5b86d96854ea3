use std::ffi::OsString;
use std::sync::Arc;

/// Host command interpreter used to run a command string.
pub trait Interpreter: Send + Sync + std::fmt::Debug {
    /// Executable to launch.
    fn program(&self) -> &str;

    /// Arguments that make `program` run `command` and exit.
    fn args(&self, command: &str) -> Vec<OsString>;

    /// Ready-to-configure process builder for `command`.
    fn build(&self, command: &str) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(self.program());
        cmd.args(self.args(command));
        cmd
    }
}

/// `sh -c <command>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PosixShell;

impl Interpreter for PosixShell {
    fn program(&self) -> &str {
        "sh"
    }

    fn args(&self, command: &str) -> Vec<OsString> {
        vec!["-c".into(), command.into()]
    }
}

/// `powershell -NoProfile -NonInteractive -Command <command>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PowerShell;

impl Interpreter for PowerShell {
    fn program(&self) -> &str {
        "powershell"
    }

    fn args(&self, command: &str) -> Vec<OsString> {
        vec![
            "-NoProfile".into(),
            "-NonInteractive".into(),
            "-Command".into(),
            command.into(),
        ]
    }
}

/// The one interpreter for the platform this binary was built for.
pub fn native_interpreter() -> Arc<dyn Interpreter> {
    if cfg!(windows) {
        Arc::new(PowerShell)
    } else {
        Arc::new(PosixShell)
    }
}
