pub mod error;
pub mod schema;
pub mod traits;
pub mod weather;

pub use error::ToolError;
pub use schema::{ArgSchema, ToolSchema};
pub use traits::Tool;
pub use weather::WeatherTool;
