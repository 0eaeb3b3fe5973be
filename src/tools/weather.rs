//! The one tool exposed to the model: real-time weather for a city.

use super::error::ToolError;
use super::schema::ArgSchema;
use super::traits::Tool;
use crate::weather::WeatherClient;

pub const TOOL_NAME: &str = "get_weather";

pub struct WeatherTool {
    client: WeatherClient,
}

impl WeatherTool {
    pub fn new(client: WeatherClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn description(&self) -> &str {
        "Fetches real-time weather info for a city using WeatherAPI.com"
    }

    fn args(&self) -> Vec<ArgSchema> {
        vec![ArgSchema {
            name: "city".to_string(),
            arg_type: "string".to_string(),
            description: "City name, e.g. 'Lahore'".to_string(),
            required: true,
        }]
    }

    /// Both lookup outcomes come back as `Ok` text: the model consumes tool
    /// output as plain language, so a failed lookup is an answer, not an
    /// error. Only a malformed argument object is a `ToolError`.
    async fn run(&self, input: serde_json::Value) -> Result<String, ToolError> {
        let city = input
            .get("city")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| {
                ToolError::ParamsNotMatched("missing required string argument 'city'".to_string())
            })?;

        match self.client.lookup(city).await {
            Ok(report) => Ok(report.to_string()),
            Err(err) => {
                tracing::warn!(city, error = %err, "weather lookup failed");
                Ok(err.user_message())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const LAHORE_BODY: &str = r#"{
        "location": {"name": "Lahore"},
        "current": {"temp_c": 32.0, "feelslike_c": 35.0, "condition": {"text": "Sunny"}}
    }"#;

    fn tool(server: &mockito::Server) -> WeatherTool {
        WeatherTool::new(WeatherClient::new("test-key").with_base_url(server.url()))
    }

    #[tokio::test]
    async fn renders_a_report_on_success() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/current.json")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(LAHORE_BODY)
            .create_async()
            .await;

        let output = tool(&server).run(json!({"city": "Lahore"})).await.unwrap();
        assert!(output.contains("Lahore"));
        assert!(output.contains("32"));
        assert!(output.contains("Sunny"));
    }

    #[tokio::test]
    async fn failed_lookup_is_still_plain_text_output() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/current.json")
            .match_query(mockito::Matcher::Any)
            .with_status(400)
            .with_body(r#"{"error": {"code": 1006}}"#)
            .create_async()
            .await;

        let output = tool(&server).run(json!({"city": "Zzzzqx"})).await.unwrap();
        assert!(output.contains("Zzzzqx"));
        assert!(output.contains("Couldn't find weather data"));
    }

    #[tokio::test]
    async fn missing_city_argument_is_a_tool_error() {
        let server = mockito::Server::new_async().await;
        let err = tool(&server).run(json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::ParamsNotMatched(_)));
    }

    #[test]
    fn schema_declares_one_required_string_arg() {
        let tool = WeatherTool::new(WeatherClient::new("k"));
        let schema = tool.schema();
        assert_eq!(schema.name, TOOL_NAME);
        assert_eq!(schema.args.len(), 1);
        assert_eq!(schema.args[0].name, "city");
        assert_eq!(schema.args[0].arg_type, "string");
        assert!(schema.args[0].required);
    }
}
