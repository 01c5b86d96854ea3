use serde_json::{Value, json};
use shellguard::tools::{ExecTool, ExecutionContext, Tool, ToolResult};
use std::path::Path;
use tempfile::TempDir;

pub const DANGEROUS: &str = "Command blocked by safety guard (dangerous pattern detected)";
pub const NOT_ALLOWED: &str = "Command blocked by safety guard (not in allowlist)";
pub const OUTSIDE: &str = "Command blocked by safety guard (path outside working dir)";

/// Tool rooted in a fresh temp dir. Keep the `TempDir` alive for the test.
pub fn workspace_tool(restrict: bool) -> (TempDir, ExecTool) {
    let tmp = TempDir::new().expect("tempdir");
    let tool = ExecTool::new(Some(tmp.path().to_path_buf()), restrict);
    (tmp, tool)
}

pub async fn exec(tool: &ExecTool, command: &str) -> ToolResult {
    exec_args(tool, json!({ "command": command })).await
}

pub async fn exec_args(tool: &ExecTool, args: Value) -> ToolResult {
    tool.execute(args, &ExecutionContext::new())
        .await
        .expect("exec tool folds failures into results")
}

pub fn assert_not_spawned(dir: &Path, marker: &str) {
    assert!(
        !dir.join(marker).exists(),
        "blocked command must not run, but {marker} was created"
    );
}
