pub mod fallback;
pub mod http;
pub mod prompt;
pub mod service;

pub use fallback::CannedResponder;
pub use http::HttpAssistant;
pub use prompt::extract_prompt;
pub use service::{Assistant, AssistantError, AssistantService};
