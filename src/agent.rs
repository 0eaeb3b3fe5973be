use std::collections::HashMap;
use std::sync::Arc;

use crate::llm::traits::LLM;
use crate::message::Message;
use crate::tools::schema::ToolSchema;
use crate::tools::traits::Tool;

pub mod error;
pub mod traits;
pub mod types;

use error::AgentError;
use traits::AgentRunner;
use types::{Agent, AgentExecuteResult, AgentResult};

/// Default bound on model round trips. One tool call plus the final answer
/// is the expected shape, so this only guards against a runaway model.
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

impl Agent {
    /// Create a new Agent with the provided name and LLM. Tools start empty.
    pub fn new(name: impl Into<String>, llm: Arc<dyn LLM>, max_iterations: Option<usize>) -> Self {
        Self {
            name: name.into(),
            llm,
            tools: HashMap::new(),
            system_prompt: None,
            max_iterations: max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS),
        }
    }

    /// Register a tool under the given name, or under the tool's own name
    /// when `name` is `None`. Replaces any existing tool with the same name.
    pub fn register_tool(&mut self, name: Option<&str>, tool: Arc<dyn Tool>) -> &mut Self {
        let name = name.unwrap_or_else(|| tool.name());
        self.tools.insert(name.into(), tool);
        self
    }

    /// Look up a tool by name.
    pub fn get_tool(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Set or replace the agent's system prompt.
    pub fn set_system_prompt(&mut self, prompt: impl Into<String>) {
        self.system_prompt = Some(prompt.into());
    }

    /// Schemas of all registered tools, as declared to the model.
    pub fn tool_schemas(&self) -> Vec<ToolSchema> {
        self.tools.values().map(|tool| tool.schema()).collect()
    }
}

#[async_trait::async_trait]
impl AgentRunner for Agent {
    async fn run(&self, query: &str) -> AgentExecuteResult {
        let mut msgs: Vec<Message> = Vec::new();
        if let Some(prompt) = self.system_prompt.as_ref() {
            msgs.push(Message::system(prompt.clone()));
        }
        msgs.push(Message::user(query));

        let schemas = self.tool_schemas();
        let mut result = AgentResult::default();
        let mut counter: usize = 0;

        // Main loop: call LLM, execute any requested tools, feed results
        // back, repeat until the model answers without tool calls.
        while counter < self.max_iterations {
            let res = self.llm.generate(&msgs, &schemas).await?;
            result.tokens.prompt_tokens += res.tokens.prompt_tokens;
            result.tokens.completion_tokens += res.tokens.completion_tokens;
            result.tokens.total_tokens += res.tokens.total_tokens;
            counter += 1;

            if res.tool_calls.is_empty() {
                result.generation = res.generation;
                return Ok(result);
            }

            msgs.push(Message::assistant_with_calls(
                res.generation,
                res.tool_calls.clone(),
            ));
            for call in res.tool_calls {
                let Some(tool_impl) = self.tools.get(&call.name) else {
                    return Err(AgentError::ToolNotFound(call.name));
                };
                tracing::debug!(agent = %self.name, tool = %call.name, "executing tool call");
                let tool_result = tool_impl.run(call.args).await?;
                msgs.push(Message::tool_result(call.id, call.name, tool_result));
            }
        }
        Err(AgentError::MaxIterationsExceeded(self.max_iterations))
    }
}
