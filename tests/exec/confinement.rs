use crate::exec_harness::{OUTSIDE, assert_not_spawned, exec, exec_args, workspace_tool};
use serde_json::json;
use shellguard::security::{BlockReason, UnresolvedPathPolicy, Verdict, WorkspaceConfinement};
use std::path::Path;

fn project() -> &'static Path {
    Path::new("/home/user/project")
}

#[test]
fn documented_confinement_examples() {
    let confinement = WorkspaceConfinement::default();
    assert_eq!(
        confinement.check("cat ../../etc/passwd", project()),
        Verdict::Blocked(BlockReason::PathTraversal)
    );
    assert_eq!(
        confinement.check("cat /etc/passwd", project()),
        Verdict::Blocked(BlockReason::OutsideWorkingDir)
    );
    assert!(
        confinement
            .check("cat /home/user/project/src/main.go", project())
            .is_allowed()
    );
}

#[test]
fn encoded_and_null_byte_tricks_are_blocked() {
    let confinement = WorkspaceConfinement::default();
    assert_eq!(
        confinement.check("cat %2E%2E%2Fsecret", project()),
        Verdict::Blocked(BlockReason::EncodedTraversal)
    );
    assert_eq!(
        confinement.check("cat file.txt%00.png", project()),
        Verdict::Blocked(BlockReason::NullByte)
    );
}

#[test]
fn sibling_directory_with_shared_prefix_is_outside() {
    let confinement = WorkspaceConfinement::default();
    assert_eq!(
        confinement.check("ls /home/user/project-other", project()),
        Verdict::Blocked(BlockReason::OutsideWorkingDir)
    );
}

#[cfg(unix)]
#[test]
fn unresolvable_tokens_follow_the_policy() {
    let command = r"type C:\Windows\win.ini";
    assert!(
        WorkspaceConfinement::new(UnresolvedPathPolicy::Skip)
            .check(command, project())
            .is_allowed()
    );
    assert_eq!(
        WorkspaceConfinement::new(UnresolvedPathPolicy::Block).check(command, project()),
        Verdict::Blocked(BlockReason::UnresolvedPath)
    );
}

#[cfg(unix)]
#[tokio::test]
async fn restricted_tool_refuses_outside_paths_before_spawn() {
    let (tmp, tool) = workspace_tool(true);
    let result = exec(&tool, "touch marker.txt && cat /etc/passwd").await;
    assert_eq!(result.for_llm, OUTSIDE);
    assert_not_spawned(tmp.path(), "marker.txt");
}

#[cfg(unix)]
#[tokio::test]
async fn restricted_tool_runs_paths_inside_the_workspace() {
    let (tmp, tool) = workspace_tool(true);
    std::fs::write(tmp.path().join("notes.txt"), "inside\n").expect("write file");

    let command = format!("cat {}", tmp.path().join("notes.txt").display());
    let result = exec(&tool, &command).await;
    assert!(!result.is_error, "{}", result.for_llm);
    assert_eq!(result.for_llm.trim(), "inside");
}

#[cfg(unix)]
#[tokio::test]
async fn explicit_working_dir_becomes_the_confinement_root() {
    let (tmp, tool) = workspace_tool(true);
    let nested = tmp.path().join("nested");
    std::fs::create_dir(&nested).expect("create nested");

    let result = exec_args(
        &tool,
        json!({
            "command": format!("ls {}", tmp.path().display()),
            "working_dir": nested.to_str().expect("utf-8 path"),
        }),
    )
    .await;
    assert_eq!(result.for_llm, OUTSIDE);
}

#[cfg(unix)]
#[tokio::test]
async fn unrestricted_tool_skips_confinement() {
    let (_tmp, tool) = workspace_tool(false);
    let result = exec(&tool, "ls /").await;
    assert!(!result.is_error);
}

#[cfg(unix)]
#[tokio::test]
async fn restricted_tool_blocks_paths_glued_to_expansions() {
    let (tmp, tool) = workspace_tool(true);
    for command in [
        "touch marker.txt; cat $HOME/.ssh/id_rsa",
        "touch marker.txt; cat ${HOME}/.ssh/id_rsa",
        "touch marker.txt; cat {/etc/passwd,x}",
        "touch marker.txt; tar -C/etc -cf - .",
    ] {
        let result = exec(&tool, command).await;
        assert_eq!(result.for_llm, OUTSIDE, "{command}");
    }
    assert_not_spawned(tmp.path(), "marker.txt");
}
