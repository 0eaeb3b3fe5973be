use super::error::ToolError;
use super::schema::{ArgSchema, ToolSchema};

/// A callable tool the agent can expose to the model.
///
/// Tool output is always a plain string: the model reads tool results as
/// text, so recoverable failures should be rendered into the returned
/// string rather than surfaced as `Err`.
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn args(&self) -> Vec<ArgSchema>;
    async fn run(&self, input: serde_json::Value) -> Result<String, ToolError>;

    /// The schema sent to the model for this tool.
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: self.description().to_string(),
            args: self.args(),
        }
    }
}
