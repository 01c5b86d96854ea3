use crate::exec_harness::{exec, workspace_tool};
use serde_json::json;
use shellguard::config::Config;
use shellguard::tools::{ExecTool, ExecutionContext, Tool};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn missing_command_is_an_error_result_not_a_failure() {
    let (_tmp, tool) = workspace_tool(false);
    let result = tool
        .execute(json!({"working_dir": "/tmp"}), &ExecutionContext::new())
        .await
        .expect("never Err");
    assert!(result.is_error);
    assert_eq!(result.for_llm, "command is required");
}

#[cfg(unix)]
#[tokio::test]
async fn silent_success_reports_placeholder() {
    let (_tmp, tool) = workspace_tool(false);
    let result = exec(&tool, "true").await;
    assert!(!result.is_error);
    assert_eq!(result.for_llm, "(no output)");
}

#[cfg(unix)]
#[tokio::test]
async fn stderr_and_exit_code_are_reported() {
    let (_tmp, tool) = workspace_tool(false);
    let result = exec(&tool, "echo out; echo err 1>&2; exit 3").await;
    assert!(result.is_error);
    assert!(result.for_llm.starts_with("out\n"));
    assert!(result.for_llm.contains("\nSTDERR:\nerr"));
    assert!(result.for_llm.ends_with("Exit code: 3"));
}

#[cfg(unix)]
#[tokio::test]
async fn timeout_kills_long_running_command() {
    let (_tmp, mut tool) = workspace_tool(false);
    tool.set_timeout(Duration::from_secs(1));

    let started = Instant::now();
    let result = exec(&tool, "echo partial; sleep 120").await;
    assert!(started.elapsed() < Duration::from_secs(30));
    assert!(result.is_error);
    assert_eq!(result.for_llm, "Command timed out after 1s");
}

#[cfg(unix)]
#[tokio::test]
async fn caller_cancellation_kills_the_command() {
    let (_tmp, tool) = workspace_tool(false);
    let cancel = CancellationToken::new();
    let ctx = ExecutionContext::with_cancellation(cancel.clone());
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        cancel.cancel();
    });

    let started = Instant::now();
    let result = tool
        .execute(json!({"command": "sleep 120"}), &ctx)
        .await
        .expect("never Err");
    assert!(started.elapsed() < Duration::from_secs(30));
    assert_eq!(result.for_llm, "Command cancelled");
}

#[cfg(unix)]
#[tokio::test]
async fn output_is_truncated_to_the_budget() {
    let (_tmp, tool) = workspace_tool(false);
    let result = exec(&tool, "head -c 15000 /dev/zero | tr '\\0' 'z'").await;
    assert!(!result.is_error);
    assert!(result.for_llm.ends_with("\n... (truncated, 5000 more chars)"));
    assert_eq!(
        result.for_llm.chars().filter(|c| *c == 'z').count(),
        10_000
    );
}

#[cfg(unix)]
#[tokio::test]
async fn concurrent_invocations_share_one_tool() {
    let (_tmp, tool) = workspace_tool(false);
    let tool = Arc::new(tool);

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let tool = Arc::clone(&tool);
            tokio::spawn(async move {
                let ctx = ExecutionContext::new();
                tool.execute(json!({"command": format!("echo run-{i}")}), &ctx)
                    .await
                    .expect("never Err")
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let result = handle.await.expect("task joined");
        assert_eq!(result.for_llm.trim(), format!("run-{i}"));
    }
}

#[cfg(unix)]
#[tokio::test]
async fn tool_built_from_config_honours_every_setting() {
    let tmp = tempfile::TempDir::new().expect("tempdir");
    let config = Config::from_toml_str(&format!(
        r#"
[exec]
working_dir = "{}"
timeout_secs = 1
restrict_to_workspace = true
extra_deny_patterns = ["\\bchmod\\s+777\\b"]
max_output_chars = 4
"#,
        tmp.path().display()
    ))
    .expect("valid config");
    let tool = ExecTool::from_config(&config.exec).expect("valid patterns");

    assert_eq!(tool.timeout(), Duration::from_secs(1));
    assert!(tool.restrict_to_workspace());

    let result = exec(&tool, "chmod 777 file").await;
    assert!(result.for_llm.contains("dangerous pattern detected"));

    let result = exec(&tool, "pwd").await;
    assert!(result.for_llm.contains("(truncated,"));
}

#[test]
fn invalid_configured_pattern_fails_construction() {
    let config = Config::from_toml_str("[exec]\nallow_patterns = [\"[\"]").expect("parses");
    assert!(ExecTool::from_config(&config.exec).is_err());
}
