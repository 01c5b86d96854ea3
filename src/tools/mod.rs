pub mod registry;
pub mod shell;
pub mod traits;
pub mod types;

pub use registry::ToolRegistry;
pub use shell::ExecTool;
pub use traits::{ExecutionContext, Tool};
pub use types::{ToolResult, ToolSpec};

use std::sync::Arc;

/// Registry holding the command execution tool.
pub fn default_registry(exec: ExecTool) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(exec));
    registry
}
