//! Gemini backend, reached through Google's OpenAI-compatible
//! chat-completions endpoint.
//!
//! Tool calling uses the native chat-completions protocol: tool schemas go
//! out in the `tools` array, the model answers with `tool_calls`, and tool
//! results are sent back as `tool` role messages carrying the call id.

use std::time::Duration;

use futures::{future::BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

use crate::llm::{
    error::LLMError, tokens::TokenUsage, traits::LLM, GenerateResult, LLMResult, ToolCall,
};
use crate::message::{Message, MessageRole};
use crate::tools::schema::{ArgSchema, ToolSchema};

/// Google's OpenAI-compatible endpoint for Gemini models.
pub const GEMINI_OPENAI_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Default model name used when no model is specified.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Per-request timeout for model calls. The upstream endpoint sets none.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct Gemini {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl Gemini {
    /// Create a Gemini client with the default model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: GEMINI_OPENAI_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Override the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the endpoint base URL. Used by tests to point at a mock
    /// server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn build_request<'a>(&'a self, messages: &[Message], tools: &[ToolSchema]) -> ChatRequest<'a> {
        // Force a tool call on the opening turn only: once a tool result is
        // in the transcript the model must be allowed to answer, or the loop
        // would never terminate.
        let tool_choice = if tools.is_empty() {
            None
        } else if messages.iter().any(|m| m.role == MessageRole::Tool) {
            Some("auto")
        } else {
            Some("required")
        };

        ChatRequest {
            model: &self.model,
            messages: messages.iter().map(WireMessage::from).collect(),
            tools: if tools.is_empty() {
                None
            } else {
                Some(tools.iter().map(WireTool::from).collect())
            },
            tool_choice,
        }
    }
}

impl LLM for Gemini {
    fn generate<'a>(
        &'a self,
        messages: &'a [Message],
        tools: &'a [ToolSchema],
    ) -> BoxFuture<'a, LLMResult<GenerateResult>> {
        async move {
            let request = self.build_request(messages, tools);
            let response = self
                .client
                .post(self.completions_url())
                .timeout(REQUEST_TIMEOUT)
                .bearer_auth(&self.api_key)
                .json(&request)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(LLMError::Endpoint { status, body });
            }

            let body: ChatResponse = response.json().await?;
            let choice = body
                .choices
                .into_iter()
                .next()
                .ok_or_else(|| LLMError::InvalidResponse("no choices in completion".into()))?;

            let tool_calls = choice
                .message
                .tool_calls
                .unwrap_or_default()
                .into_iter()
                .map(ToolCall::try_from)
                .collect::<LLMResult<Vec<_>>>()?;

            let tokens = body
                .usage
                .map(|u| TokenUsage {
                    prompt_tokens: u.prompt_tokens,
                    completion_tokens: u.completion_tokens,
                    total_tokens: u.total_tokens,
                })
                .unwrap_or_default();

            Ok(GenerateResult {
                tokens,
                generation: choice.message.content.unwrap_or_default(),
                tool_calls,
            })
        }
        .boxed()
    }
}

// Wire types for the chat-completions protocol. Only the fields this crate
// inspects are modeled.

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<WireTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<WireToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

impl From<&Message> for WireMessage {
    fn from(message: &Message) -> Self {
        let role = match message.role {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::Tool => "tool",
        };
        let tool_calls = if message.tool_calls.is_empty() {
            None
        } else {
            Some(message.tool_calls.iter().map(WireToolCall::from).collect())
        };
        // An assistant turn that only requested tool calls has no content.
        let content = if message.content.is_empty() && tool_calls.is_some() {
            None
        } else {
            Some(message.content.clone())
        };
        Self {
            role,
            content,
            tool_calls,
            tool_call_id: message.tool_call_id.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type")]
    call_type: String,
    function: WireFunctionCall,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireFunctionCall {
    name: String,
    /// JSON object, encoded as a string on the wire.
    arguments: String,
}

impl From<&ToolCall> for WireToolCall {
    fn from(call: &ToolCall) -> Self {
        Self {
            id: call.id.clone(),
            call_type: "function".to_string(),
            function: WireFunctionCall {
                name: call.name.clone(),
                arguments: serde_json::to_string(&call.args)
                    .unwrap_or_else(|_| String::from("{}")),
            },
        }
    }
}

impl TryFrom<WireToolCall> for ToolCall {
    type Error = LLMError;

    fn try_from(call: WireToolCall) -> LLMResult<Self> {
        let args = if call.function.arguments.trim().is_empty() {
            JsonValue::Null
        } else {
            serde_json::from_str(&call.function.arguments)?
        };
        Ok(Self {
            id: call.id,
            name: call.function.name,
            args,
        })
    }
}

#[derive(Debug, Serialize)]
struct WireTool {
    #[serde(rename = "type")]
    tool_type: &'static str,
    function: WireFunction,
}

#[derive(Debug, Serialize)]
struct WireFunction {
    name: String,
    description: String,
    parameters: JsonValue,
}

impl From<&ToolSchema> for WireTool {
    fn from(schema: &ToolSchema) -> Self {
        Self {
            tool_type: "function",
            function: WireFunction {
                name: schema.name.clone(),
                description: schema.description.clone(),
                parameters: parameters_schema(&schema.args),
            },
        }
    }
}

/// Build a JSON Schema object from the declared tool arguments.
fn parameters_schema(args: &[ArgSchema]) -> JsonValue {
    let mut properties = serde_json::Map::new();
    let mut required = Vec::new();
    for arg in args {
        properties.insert(
            arg.name.clone(),
            json!({ "type": arg.arg_type, "description": arg.description }),
        );
        if arg.required {
            required.push(JsonValue::String(arg.name.clone()));
        }
    }
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;
    use crate::tools::schema::{ArgSchema, ToolSchema};

    fn weather_schema() -> ToolSchema {
        ToolSchema {
            name: "get_weather".to_string(),
            description: "Get weather for a given city".to_string(),
            args: vec![ArgSchema {
                name: "city".to_string(),
                arg_type: "string".to_string(),
                description: "City name".to_string(),
                required: true,
            }],
        }
    }

    #[tokio::test]
    async fn parses_tool_calls_and_usage() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "choices": [{
                        "message": {
                            "content": null,
                            "tool_calls": [{
                                "id": "call_1",
                                "type": "function",
                                "function": {
                                    "name": "get_weather",
                                    "arguments": "{\"city\":\"Lahore\"}"
                                }
                            }]
                        }
                    }],
                    "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
                }"#,
            )
            .create_async()
            .await;

        let llm = Gemini::new("test-key").with_base_url(server.url());
        let messages = vec![Message::user("What's the weather in Lahore?")];
        let tools = vec![weather_schema()];

        let result = llm.generate(&messages, &tools).await.unwrap();
        mock.assert_async().await;

        assert_eq!(result.tool_calls.len(), 1);
        assert_eq!(result.tool_calls[0].id, "call_1");
        assert_eq!(result.tool_calls[0].name, "get_weather");
        assert_eq!(result.tool_calls[0].args["city"], "Lahore");
        assert_eq!(result.tokens.total_tokens, 15);
    }

    #[tokio::test]
    async fn parses_final_answer() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices": [{"message": {"content": "It is sunny in Lahore."}}]}"#,
            )
            .create_async()
            .await;

        let llm = Gemini::new("test-key").with_base_url(server.url());
        let messages = vec![Message::user("What's the weather in Lahore?")];

        let result = llm.generate(&messages, &[]).await.unwrap();
        assert_eq!(result.generation, "It is sunny in Lahore.");
        assert!(result.tool_calls.is_empty());
        assert_eq!(result.tokens.total_tokens, 0);
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body(r#"{"error": {"message": "rate limited"}}"#)
            .create_async()
            .await;

        let llm = Gemini::new("test-key").with_base_url(server.url());
        let messages = vec![Message::user("hi")];

        let err = llm.generate(&messages, &[]).await.unwrap_err();
        match err {
            LLMError::Endpoint { status, .. } => assert_eq!(status.as_u16(), 429),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn tool_choice_is_required_then_auto() {
        let mut server = mockito::Server::new_async().await;
        let required = server
            .mock("POST", "/chat/completions")
            .match_body(mockito::Matcher::Regex(
                r#""tool_choice":"required""#.to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices": [{"message": {"content": "first"}}]}"#)
            .create_async()
            .await;
        let auto = server
            .mock("POST", "/chat/completions")
            .match_body(mockito::Matcher::Regex(
                r#""tool_choice":"auto""#.to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices": [{"message": {"content": "second"}}]}"#)
            .create_async()
            .await;

        let llm = Gemini::new("test-key").with_base_url(server.url());
        let tools = vec![weather_schema()];

        // Opening turn: no tool result yet, tool use is forced.
        let opening = vec![Message::user("What's the weather in Lahore?")];
        let res = llm.generate(&opening, &tools).await.unwrap();
        assert_eq!(res.generation, "first");
        required.assert_async().await;

        // After a tool result the model may answer freely.
        let follow_up = vec![
            Message::user("What's the weather in Lahore?"),
            Message::tool_result("call_1", "get_weather", "sunny"),
        ];
        let res = llm.generate(&follow_up, &tools).await.unwrap();
        assert_eq!(res.generation, "second");
        auto.assert_async().await;
    }
}
