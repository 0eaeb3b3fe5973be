//! HTTP surface: one page, one action.
//!
//! `GET /` serves the form, `POST /ask` runs the assistant for a city and
//! returns the model's answer. Runtime failures are not recovered here
//! beyond mapping them to a generic JSON error body.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::assistant::{weather_question, Assistant};
use crate::config::Config;

pub struct AppState {
    pub assistant: Assistant,
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub city: String,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    r#type: String,
}

fn error_response(status: StatusCode, message: String) -> Response {
    let body = ErrorResponse {
        error: ErrorBody {
            message,
            r#type: "error".to_string(),
        },
    };
    (status, Json(body)).into_response()
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/ask", post(ask))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until shutdown.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState {
        assistant: Assistant::new(&config),
    });
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on http://{addr}");
    axum::serve(listener, routes(state)).await?;
    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn ask(State(state): State<Arc<AppState>>, Json(request): Json<AskRequest>) -> Response {
    let city = request.city.trim();
    // Mirrors the form's own guard: the action only fires with a city.
    if city.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "city is required".to_string());
    }

    match state.assistant.ask(&weather_question(city)).await {
        Ok(answer) => Json(AskResponse { answer }).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "agent run failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "The assistant could not answer. Please try again.".to_string(),
            )
        }
    }
}

const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>🌤️ AI Powered Weather Assistant</title>
<style>
  body { background-color: #0ABAB5; color: white; font-family: sans-serif;
         display: flex; justify-content: center; margin-top: 4rem; }
  main { width: 28rem; }
  input { background-color: #222; color: white; border: 1px solid #444;
          padding: 0.5rem; width: 100%; box-sizing: border-box; }
  button { background-color: #444; color: white; border: none;
           padding: 0.5rem 1rem; margin-top: 0.75rem; cursor: pointer; }
  #answer { margin-top: 1.5rem; white-space: pre-line; }
</style>
</head>
<body>
<main>
  <h1>🌤️ Weather Assistant</h1>
  <p>Get <strong>real-time weather updates</strong> for your city instantly.</p>
  <input id="city" placeholder="e.g., Lahore">
  <button id="go">🔍 Ask AI for Weather</button>
  <div id="answer"></div>
  <script>
    const answer = document.getElementById('answer');
    document.getElementById('go').addEventListener('click', async () => {
      const city = document.getElementById('city').value.trim();
      if (!city) return;
      answer.textContent = '🤖 Thinking...';
      try {
        const res = await fetch('/ask', {
          method: 'POST',
          headers: { 'Content-Type': 'application/json' },
          body: JSON.stringify({ city }),
        });
        const body = await res.json();
        answer.textContent = res.ok ? body.answer : body.error.message;
      } catch (err) {
        answer.textContent = 'Request failed: ' + err;
      }
    });
  </script>
</main>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ask_request_deserializes() {
        let request: AskRequest = serde_json::from_str(r#"{"city": "Lahore"}"#).unwrap();
        assert_eq!(request.city, "Lahore");
    }

    #[test]
    fn page_carries_the_form_and_trigger() {
        assert!(INDEX_HTML.contains("id=\"city\""));
        assert!(INDEX_HTML.contains("Ask AI for Weather"));
        assert!(INDEX_HTML.contains("fetch('/ask'"));
    }
}
