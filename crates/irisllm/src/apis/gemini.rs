use crate::apis::ApiDefinition;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::skip_serializing_none;

/// Model name reported in normalized chat replies.
pub const CHAT_MODEL: &str = "gemini-pro";

/// Session cookie shared by the Gemini and Veo upstreams.
pub fn auth_cookie(api_key: &str) -> String {
    format!("__Secure-1PSID={}", api_key)
}

/// Gemini operations exposed by the bridge. The two embed endpoints are
/// aliases for the same upstream call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeminiApi {
    Generate,
    Chat,
    EmbedContent,
    GenerateEmbed,
}

impl GeminiApi {
    /// Path on the upstream service, relative to the configured base URL.
    pub fn upstream_path(&self) -> &'static str {
        match self {
            GeminiApi::Generate => "/generate",
            GeminiApi::Chat => "/chat",
            GeminiApi::EmbedContent | GeminiApi::GenerateEmbed => "/embedding",
        }
    }
}

impl ApiDefinition for GeminiApi {
    fn endpoint(&self) -> &'static str {
        match self {
            GeminiApi::Generate => "/gemini/generate",
            GeminiApi::Chat => "/gemini/chat",
            GeminiApi::EmbedContent => "/gemini/embeddingContent",
            GeminiApi::GenerateEmbed => "/gemini/generateEmbed",
        }
    }

    fn from_endpoint(endpoint: &str) -> Option<Self> {
        Self::all_variants()
            .into_iter()
            .find(|api| api.endpoint() == endpoint)
    }

    fn supports_streaming(&self) -> bool {
        false
    }

    fn all_variants() -> Vec<Self> {
        vec![
            GeminiApi::Generate,
            GeminiApi::Chat,
            GeminiApi::EmbedContent,
            GeminiApi::GenerateEmbed,
        ]
    }
}

// ============================================================================
// BRIDGE-SURFACE REQUESTS
// ============================================================================

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub prompt: Option<String>,
    pub generation_config: Option<GenerationConfigOverrides>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub messages: Option<Vec<ChatMessage>>,
    pub generation_config: Option<GenerationConfigOverrides>,
}

/// Loosely typed inbound chat message. The surface accepts any role string
/// (everything except `user` speaks as the model) and any content shape
/// (non-string content is forwarded as its JSON text).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: Value,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedRequest {
    pub text: Option<String>,
    pub content: Option<String>,
}

impl EmbedRequest {
    /// First non-empty of `text` / `content`, mirroring the surface contract
    /// where either field may carry the payload.
    pub fn text_to_embed(&self) -> Option<&str> {
        [self.text.as_deref(), self.content.as_deref()]
            .into_iter()
            .flatten()
            .find(|value| !value.is_empty())
    }
}

/// Caller-supplied sampling overrides; anything unset falls back to the
/// bridge defaults.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfigOverrides {
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
    pub top_k: Option<u32>,
    pub top_p: Option<f32>,
}

impl GenerationConfigOverrides {
    pub fn resolve(&self) -> GenerationConfig {
        let defaults = GenerationConfig::default();
        GenerationConfig {
            temperature: self.temperature.unwrap_or(defaults.temperature),
            max_output_tokens: self.max_output_tokens.unwrap_or(defaults.max_output_tokens),
            top_k: self.top_k.unwrap_or(defaults.top_k),
            top_p: self.top_p.unwrap_or(defaults.top_p),
        }
    }
}

// ============================================================================
// UPSTREAM PAYLOADS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub top_k: u32,
    pub top_p: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        GenerationConfig {
            temperature: 0.7,
            max_output_tokens: 1024,
            top_k: 40,
            top_p: 0.95,
        }
    }
}

/// Body for the upstream `/generate` call; the sampling knobs sit at the top
/// level rather than under a config key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratePayload {
    pub prompt: PromptText,
    #[serde(flatten)]
    pub config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptText {
    pub text: String,
}

/// Body for the upstream `/chat` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatPayload {
    pub contents: Vec<GeminiContent>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeminiContent {
    pub role: String,
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeminiPart {
    pub text: String,
}

/// Body for the upstream `/embedding` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedPayload {
    pub text: String,
}

// ============================================================================
// UPSTREAM REPLIES
// ============================================================================

/// The slice of a Gemini reply the bridge actually reads. Unknown fields are
/// ignored; the whole reply is still relayed verbatim where the surface calls
/// for passthrough.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    pub prompt_token_count: Option<u32>,
    pub candidates_token_count: Option<u32>,
}
