//! AI-powered weather assistant.
//!
//! A browser form collects a city name, the server hands a natural-language
//! weather question to a Gemini agent configured with a single tool that
//! queries WeatherAPI.com, and the model's final answer is rendered back
//! in the page.

pub mod agent;
pub mod api;
pub mod assistant;
pub mod config;
pub mod error;
pub mod llm;
pub mod message;
pub mod tools;
pub mod weather;

pub use config::Config;
pub use error::{Error, Result};
