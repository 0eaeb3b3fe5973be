use super::types::AgentExecuteResult;

/// Runtime operations an agent performs.
#[async_trait::async_trait]
pub trait AgentRunner: Send + Sync {
    /// Run one query through the model/tool loop and return the final
    /// generation.
    async fn run(&self, query: &str) -> AgentExecuteResult;
}
