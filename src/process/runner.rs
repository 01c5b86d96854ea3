use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Child;
use tokio_util::sync::CancellationToken;

use super::interpreter::{Interpreter, native_interpreter};
use super::output::{ExecutionOutcome, MAX_OUTPUT_CHARS};

/// Default deadline for a single command.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Runs command strings through one interpreter under a deadline.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    interpreter: Arc<dyn Interpreter>,
    max_output_chars: usize,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new(native_interpreter())
    }
}

impl ProcessRunner {
    pub fn new(interpreter: Arc<dyn Interpreter>) -> Self {
        Self {
            interpreter,
            max_output_chars: MAX_OUTPUT_CHARS,
        }
    }

    pub fn with_max_output_chars(mut self, max_output_chars: usize) -> Self {
        self.max_output_chars = max_output_chars;
        self
    }

    pub fn interpreter(&self) -> &dyn Interpreter {
        self.interpreter.as_ref()
    }

    /// Run `command` in `working_dir`.
    ///
    /// The child is killed when `timeout` elapses or `cancel` fires; in both
    /// cases whatever it printed so far is discarded.
    pub async fn run(
        &self,
        command: &str,
        working_dir: Option<&Path>,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> ExecutionOutcome {
        let mut cmd = self.interpreter.build(command);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        // Own process group, so a kill reaches whatever the shell started.
        #[cfg(unix)]
        cmd.process_group(0);
        if let Some(dir) = working_dir {
            cmd.current_dir(dir);
        }

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(error) => {
                tracing::warn!(
                    interpreter = self.interpreter.program(),
                    "failed to spawn command: {error}"
                );
                return ExecutionOutcome::spawn_failed(&error);
            }
        };
        tracing::debug!(pid = child.id(), "command spawned");

        let collected = tokio::select! {
            collected = collect(&mut child) => collected,
            () = tokio::time::sleep(timeout) => {
                terminate(&mut child).await;
                tracing::info!(?timeout, "command timed out and was killed");
                return ExecutionOutcome::timed_out(timeout);
            }
            () = cancel.cancelled() => {
                terminate(&mut child).await;
                tracing::info!("command cancelled by caller and was killed");
                return ExecutionOutcome::cancelled();
            }
        };

        match collected {
            Ok((status, stdout, stderr)) => {
                tracing::debug!(%status, "command finished");
                let exit = (!status.success()).then(|| describe_exit(status));
                ExecutionOutcome::completed(
                    &String::from_utf8_lossy(&stdout),
                    &String::from_utf8_lossy(&stderr),
                    exit,
                    self.max_output_chars,
                )
            }
            Err(error) => {
                terminate(&mut child).await;
                ExecutionOutcome::spawn_failed(&error)
            }
        }
    }
}

/// Wait for exit while draining both pipes so a chatty child cannot block
/// on a full pipe buffer.
async fn collect(child: &mut Child) -> std::io::Result<(ExitStatus, Vec<u8>, Vec<u8>)> {
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let (status, stdout, stderr) =
        tokio::try_join!(child.wait(), read_all(stdout), read_all(stderr))?;
    Ok((status, stdout, stderr))
}

async fn read_all<R: AsyncRead + Unpin>(stream: Option<R>) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut stream) = stream {
        stream.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

async fn terminate(child: &mut Child) {
    #[cfg(unix)]
    {
        if let Some(pid) = child.id().and_then(|pid| libc::pid_t::try_from(pid).ok()) {
            // SAFETY: `pid` is our still-unreaped child and leads its own group.
            let result = unsafe { libc::killpg(pid, libc::SIGKILL) };
            if result != 0 {
                tracing::debug!(pid, "killpg failed: {}", std::io::Error::last_os_error());
            }
        }
    }
    if let Err(error) = child.kill().await {
        tracing::debug!("kill after deadline failed (process likely exited): {error}");
    }
}

fn describe_exit(status: ExitStatus) -> String {
    if let Some(code) = status.code() {
        return code.to_string();
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return format!("signal {signal}");
        }
    }
    "unknown".to_string()
}
