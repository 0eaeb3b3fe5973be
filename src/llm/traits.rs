use std::sync::Arc;

use futures::future::BoxFuture;

use crate::llm::{GenerateResult, LLMResult};
use crate::message::Message;
use crate::tools::schema::ToolSchema;

/// Convert a concrete L into an `Arc<dyn LLM>`.
/// Convenience so callers can do `llm_to_arc_dyn(Gemini::new(...))`.
pub fn llm_to_arc_dyn<L>(llm: L) -> Arc<dyn LLM>
where
    L: 'static + LLM,
{
    Arc::new(llm)
}

/// Core LLM trait. Uses `BoxFuture` with an explicit lifetime so
/// implementations can borrow the transcript and tool schemas instead of
/// cloning them.
pub trait LLM: Send + Sync {
    /// Produce one generation for the given transcript, with the given tools
    /// declared to the model. The returned future may borrow from both
    /// arguments.
    fn generate<'a>(
        &'a self,
        messages: &'a [Message],
        tools: &'a [ToolSchema],
    ) -> BoxFuture<'a, LLMResult<GenerateResult>>;
}
