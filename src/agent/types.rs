use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::error::AgentError;
use crate::llm::tokens::TokenUsage;
use crate::llm::traits::LLM;
use crate::tools::traits::Tool;

/// High-level agent that holds an LLM and a set of tools.
pub struct Agent {
    /// A short, human-friendly name for the agent instance.
    pub name: String,

    /// The LLM implementation used to generate responses.
    pub llm: Arc<dyn LLM>,

    /// Registered tools the model may call by name.
    pub tools: HashMap<String, Arc<dyn Tool>>,

    /// Instructions describing the agent's role, sent as the system message.
    pub system_prompt: Option<String>,

    /// Maximum model round trips in one run.
    pub max_iterations: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct AgentResult {
    pub tokens: TokenUsage,
    pub generation: String,
}

pub type AgentExecuteResult = Result<AgentResult, AgentError>;
