use crate::apis::ApiDefinition;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// OpenAI-compatible endpoints served directly by the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpenAIApi {
    ChatCompletions,
    Models,
}

impl ApiDefinition for OpenAIApi {
    fn endpoint(&self) -> &'static str {
        match self {
            OpenAIApi::ChatCompletions => "/v1/chat/completions",
            OpenAIApi::Models => "/v1/models",
        }
    }

    fn from_endpoint(endpoint: &str) -> Option<Self> {
        match endpoint {
            "/v1/chat/completions" => Some(OpenAIApi::ChatCompletions),
            "/v1/models" => Some(OpenAIApi::Models),
            _ => None,
        }
    }

    fn supports_streaming(&self) -> bool {
        matches!(self, OpenAIApi::ChatCompletions)
    }

    fn all_variants() -> Vec<Self> {
        vec![OpenAIApi::ChatCompletions, OpenAIApi::Models]
    }
}

// ============================================================================
// MESSAGE SHAPES (inbound surface)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    /// Gemini-style histories spell this side `model`; both spellings land
    /// here. Serialization always emits `assistant`.
    #[serde(alias = "model")]
    Assistant,
    Tool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: MessageContent,
}

/// String-or-parts content, exactly as OpenAI clients send it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
    pub detail: Option<String>,
}

/// Inbound body for the chat-completions surface. `model` is accepted and
/// ignored; `conversation_id` is a bridge extension carrying Qwen session
/// continuity as `{sessionId}-{parentMsgId}`.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionsRequest {
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub stream: bool,
    pub model: Option<String>,
    pub conversation_id: Option<String>,
}

// ============================================================================
// NORMALIZED RESPONSE ENVELOPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionsResponse {
    pub id: String,
    pub object: String,
    pub created: u64,
    pub model: String,
    pub choices: Vec<Choice>,
    pub usage: Usage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
    pub index: u32,
    pub finish_reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

// ============================================================================
// MODELS LISTING
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub object: String,
    pub data: Vec<ModelEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelEntry {
    pub id: String,
    pub object: String,
    pub created: u64,
    pub owned_by: String,
}

impl ModelEntry {
    pub fn new(id: &str, created: u64, owned_by: &str) -> Self {
        ModelEntry {
            id: id.to_string(),
            object: "model".to_string(),
            created,
            owned_by: owned_by.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_content_untagged_parsing() {
        let plain: Message =
            serde_json::from_str(r#"{"role": "user", "content": "hola"}"#).unwrap();
        assert_eq!(plain.role, Role::User);
        assert!(matches!(plain.content, MessageContent::Text(ref t) if t == "hola"));

        let structured: Message = serde_json::from_str(
            r#"{"role": "user", "content": [
                {"type": "text", "text": "describe"},
                {"type": "image_url", "image_url": {"url": "https://example.com/a.png"}}
            ]}"#,
        )
        .unwrap();
        match structured.content {
            MessageContent::Parts(parts) => {
                assert_eq!(parts.len(), 2);
                assert!(matches!(parts[0], ContentPart::Text { ref text } if text == "describe"));
            }
            MessageContent::Text(_) => panic!("expected structured parts"),
        }
    }

    #[test]
    fn test_model_role_reads_as_assistant() {
        let message: Message =
            serde_json::from_str(r#"{"role": "model", "content": "hola"}"#).unwrap();
        assert_eq!(message.role, Role::Assistant);

        // The canonical spelling comes back out
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["role"], "assistant");
    }

    #[test]
    fn test_chat_request_defaults() {
        let req: ChatCompletionsRequest = serde_json::from_str(r#"{}"#).unwrap();
        assert!(req.messages.is_empty());
        assert!(!req.stream);
        assert!(req.conversation_id.is_none());

        let req: ChatCompletionsRequest = serde_json::from_str(
            r#"{"messages": [{"role": "user", "content": "hi"}], "stream": true, "conversation_id": "abc-def"}"#,
        )
        .unwrap();
        assert!(req.stream);
        assert_eq!(req.conversation_id.as_deref(), Some("abc-def"));
    }

    #[test]
    fn test_response_serialization_shape() {
        let response = ChatCompletionsResponse {
            id: "test-id".to_string(),
            object: "chat.completion".to_string(),
            created: 1_686_935_002,
            model: "qwen".to_string(),
            choices: vec![Choice {
                message: ResponseMessage {
                    role: Role::Assistant,
                    content: "hola".to_string(),
                },
                index: 0,
                finish_reason: "stop".to_string(),
            }],
            usage: Usage::default(),
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["object"], "chat.completion");
        assert_eq!(value["choices"][0]["message"]["role"], "assistant");
        assert_eq!(value["choices"][0]["finish_reason"], "stop");
        assert_eq!(value["usage"]["total_tokens"], 0);
    }

    #[test]
    fn test_openai_api_endpoints() {
        assert_eq!(
            OpenAIApi::from_endpoint("/v1/chat/completions"),
            Some(OpenAIApi::ChatCompletions)
        );
        assert_eq!(OpenAIApi::from_endpoint("/v1/models"), Some(OpenAIApi::Models));
        assert_eq!(OpenAIApi::from_endpoint("/v1/embeddings"), None);
        assert!(OpenAIApi::ChatCompletions.supports_streaming());
        assert!(!OpenAIApi::Models.supports_streaming());
    }
}
