pub mod error;
pub mod gemini;
pub mod tokens;
pub mod traits;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use tokens::TokenUsage;

/// Result of a text generation from an LLM.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct GenerateResult {
    pub tokens: TokenUsage,
    pub generation: String,
    /// Tool calls the model requested during this generation. Empty when the
    /// model answered directly.
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
}

/// A single tool call requested by the model.
///
/// The `id` comes from the provider and must be echoed back on the message
/// carrying the tool's result.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub args: JsonValue,
}

/// Result type for LLM operations.
pub type LLMResult<T> = std::result::Result<T, error::LLMError>;
