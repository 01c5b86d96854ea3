use crate::cli::commands::{Cli, Commands};
use anyhow::{Context, Result};
use serde_json::json;
use shellguard::config::Config;
use shellguard::tools::{ExecTool, ExecutionContext, default_registry};
use std::process::ExitCode;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub async fn dispatch(cli: Cli, config: Config) -> Result<ExitCode> {
    match cli.command {
        Commands::Run {
            command,
            working_dir,
            timeout,
            restrict,
            allow,
        } => run(config, command, working_dir, timeout, restrict, allow).await,
        Commands::Check {
            command,
            working_dir,
            restrict,
        } => check(&config, &command, working_dir.as_deref(), restrict),
        Commands::Schema => schema(&config),
    }
}

async fn run(
    mut config: Config,
    command: String,
    working_dir: Option<String>,
    timeout: Option<u64>,
    restrict: bool,
    allow: Vec<String>,
) -> Result<ExitCode> {
    config.exec.allow_patterns.extend(allow);
    let mut tool = build_tool(&config)?;
    if let Some(secs) = timeout {
        anyhow::ensure!(secs > 0, "--timeout must be greater than 0");
        tool.set_timeout(Duration::from_secs(secs));
    }
    if restrict {
        tool.set_restrict_to_workspace(true);
    }

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, cancelling command");
            trigger.cancel();
        }
    });

    let registry = default_registry(tool);
    let mut args = json!({ "command": command });
    if let Some(dir) = working_dir {
        args["working_dir"] = json!(dir);
    }
    let result = registry
        .execute("exec", args, &ExecutionContext::with_cancellation(cancel))
        .await;

    println!("{}", result.for_user);
    Ok(exit_code(result.is_error))
}

fn check(
    config: &Config,
    command: &str,
    working_dir: Option<&str>,
    restrict: bool,
) -> Result<ExitCode> {
    let mut tool = build_tool(config)?;
    if restrict {
        tool.set_restrict_to_workspace(true);
    }

    let cwd = tool.effective_working_dir(working_dir);
    let verdict = tool.evaluate(command, &cwd);
    match verdict.block_message() {
        Some(message) => println!("{message}"),
        None => println!("Command allowed"),
    }
    Ok(exit_code(verdict.is_blocked()))
}

fn schema(config: &Config) -> Result<ExitCode> {
    let registry = default_registry(build_tool(config)?);
    let specs = serde_json::to_string_pretty(&registry.specs())
        .context("Failed to serialize tool specs")?;
    println!("{specs}");
    Ok(ExitCode::SUCCESS)
}

fn build_tool(config: &Config) -> Result<ExecTool> {
    ExecTool::from_config(&config.exec).context("Invalid exec tool configuration")
}

fn exit_code(is_error: bool) -> ExitCode {
    if is_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
