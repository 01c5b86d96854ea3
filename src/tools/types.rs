use serde::{Deserialize, Serialize};

/// Result of a tool execution.
///
/// `for_llm` is fed back into the model's context and `for_user` is shown to
/// the operator. They carry the same text today but stay separate fields so
/// the two audiences can diverge without an interface change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    pub for_llm: String,
    pub for_user: String,
    pub is_error: bool,
}

impl ToolResult {
    pub fn success(text: impl Into<String>) -> Self {
        Self::new(text, false)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, true)
    }

    pub fn new(text: impl Into<String>, is_error: bool) -> Self {
        let text = text.into();
        Self {
            for_user: text.clone(),
            for_llm: text,
            is_error,
        }
    }
}

/// Description of a tool for the LLM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}
