#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Tool execution error in '{name}': {reason}")]
    ExecutionError { name: String, reason: String },

    #[error("Tool parameters do not match: {0}")]
    ParamsNotMatched(String),
}
