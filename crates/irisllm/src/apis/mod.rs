pub mod gemini;
pub mod openai;
pub mod qwen;
pub mod sse;
pub mod veo;

// Explicit exports to avoid naming conflicts
pub use gemini::GeminiApi;
pub use openai::{ChatCompletionsRequest, ChatCompletionsResponse, OpenAIApi};
pub use openai::{Message as OpenAIMessage, MessageContent, Role};
pub use qwen::QwenApi;
pub use sse::{SseEvent, SseStreamIter};
pub use veo::VeoApi;

pub trait ApiDefinition {
    /// Returns the bridge endpoint path for this API
    fn endpoint(&self) -> &'static str;

    /// Creates an API instance from an endpoint path
    fn from_endpoint(endpoint: &str) -> Option<Self>
    where
        Self: Sized;

    /// Returns whether this API relays a streaming response to the caller
    fn supports_streaming(&self) -> bool;

    /// Returns all variants of this API enum
    fn all_variants() -> Vec<Self>
    where
        Self: Sized;
}
