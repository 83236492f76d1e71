//! irisllm: A library for translating between the OpenAI-style surface of the
//! bridge and the native request/response formats of the Qwen, Gemini and Veo
//! upstream services.
//!
//! The crate is pure data plumbing: serde shapes for every wire format involved,
//! the line scan over Qwen's SSE stream together with its two consumers, and the
//! transforms that build outbound payloads and normalize upstream replies into a
//! common envelope. No sockets and no HTTP client live here.

pub mod apis;
pub mod providers;
pub mod transforms;

// Re-export important types and traits
pub use apis::{ApiDefinition, GeminiApi, QwenApi, VeoApi};
pub use apis::{SseEvent, SseStreamIter};
pub use providers::id::ProviderId;
pub use transforms::TransformError;

pub const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";
pub const MODELS_PATH: &str = "/v1/models";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_id_from_path() {
        assert_eq!(
            ProviderId::from_path("/qwen/chat/completions"),
            Some(ProviderId::Qwen)
        );
        assert_eq!(
            ProviderId::from_path("/gemini/generate"),
            Some(ProviderId::Gemini)
        );
        assert_eq!(ProviderId::from_path("/veo/analyze"), Some(ProviderId::Veo));
        assert_eq!(ProviderId::from_path(CHAT_COMPLETIONS_PATH), None);
    }

    #[test]
    fn test_api_detection_across_providers() {
        assert_eq!(
            QwenApi::from_endpoint("/qwen/chat/completions"),
            Some(QwenApi::ChatCompletions)
        );
        assert_eq!(
            GeminiApi::from_endpoint("/gemini/chat"),
            Some(GeminiApi::Chat)
        );
        assert_eq!(VeoApi::from_endpoint("/veo/generate/v2"), Some(VeoApi::GenerateV2));
        assert_eq!(QwenApi::from_endpoint("/qwen/unknown"), None);
    }
}
