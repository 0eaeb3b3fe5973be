//! Agent invocation shell.
//!
//! Assembles the Gemini client, the weather tool, and the agent from
//! configuration, and exposes one operation to the UI layer: `ask`. No
//! branching, no recovery — runtime failures propagate to the caller.

use std::sync::Arc;

use crate::agent::traits::AgentRunner;
use crate::agent::types::Agent;
use crate::config::Config;
use crate::llm::gemini::Gemini;
use crate::llm::traits::llm_to_arc_dyn;
use crate::tools::weather::WeatherTool;
use crate::weather::WeatherClient;

/// Instructions constraining the agent to weather questions.
pub const INSTRUCTIONS: &str =
    "You are a weather assistant. Answer weather questions using the get_weather tool.";

/// The canonical prompt the UI sends for a city.
pub fn weather_question(city: &str) -> String {
    format!("What's the weather in {city}?")
}

pub struct Assistant {
    agent: Agent,
}

impl Assistant {
    pub fn new(config: &Config) -> Self {
        let gemini = Gemini::new(config.gemini_api_key.clone()).with_model(config.model.clone());
        let llm = llm_to_arc_dyn(gemini);

        let weather = WeatherTool::new(WeatherClient::new(config.weather_api_key.clone()));

        let mut agent = Agent::new("Weather Assistant", llm, Some(config.max_iterations));
        agent.set_system_prompt(INSTRUCTIONS);
        agent.register_tool(None, Arc::new(weather));

        Self { agent }
    }

    /// Delegate one query to the agent and return its final answer.
    pub async fn ask(&self, query: &str) -> crate::Result<String> {
        let result = self.agent.run(query).await?;
        tracing::debug!(
            prompt_tokens = result.tokens.prompt_tokens,
            completion_tokens = result.tokens.completion_tokens,
            "agent run finished"
        );
        Ok(result.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weather_question_embeds_the_city() {
        assert_eq!(
            weather_question("Lahore"),
            "What's the weather in Lahore?"
        );
    }

    #[test]
    fn assistant_registers_the_weather_tool() {
        let config = Config::build(|name| match name {
            "GEMINI_API_KEY" => Some("llm-key".to_string()),
            "WEATHER_API_KEY" => Some("weather-key".to_string()),
            _ => None,
        })
        .unwrap();
        let assistant = Assistant::new(&config);
        assert!(assistant.agent.get_tool("get_weather").is_some());
        assert_eq!(assistant.agent.system_prompt.as_deref(), Some(INSTRUCTIONS));
    }
}
