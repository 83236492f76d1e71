use crate::apis::gemini::{self, GenerateContentResponse, UsageMetadata};
use crate::apis::openai::{ChatCompletionsResponse, Choice, ResponseMessage, Role, Usage};
use crate::apis::qwen::{AnalysisResponse, ImageEntry, ImagesResponse};
use crate::apis::veo::{
    VideoJobData, VideoJobResponse, VideoJobV2Data, VideoJobV2Response,
};
use crate::transforms::lib::current_timestamp;
use serde_json::Value;
use uuid::Uuid;

// ============================================================================
// MAIN RESPONSE TRANSFORMATIONS
// ============================================================================

/// Wrap plain assistant text in the chat-completion envelope with a fresh id
/// and timestamp.
pub fn chat_completion_from_text(
    model: &str,
    content: String,
    usage: Usage,
) -> ChatCompletionsResponse {
    ChatCompletionsResponse {
        id: Uuid::new_v4().to_string(),
        object: "chat.completion".to_string(),
        created: current_timestamp(),
        model: model.to_string(),
        choices: vec![Choice {
            message: ResponseMessage {
                role: Role::Assistant,
                content,
            },
            index: 0,
            finish_reason: "stop".to_string(),
        }],
        usage,
    }
}

// Usage conversions
impl From<UsageMetadata> for Usage {
    fn from(meta: UsageMetadata) -> Self {
        let prompt_tokens = meta.prompt_token_count.unwrap_or_default();
        let completion_tokens = meta.candidates_token_count.unwrap_or_default();
        Usage {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

impl From<GenerateContentResponse> for ChatCompletionsResponse {
    /// Normalize a Gemini chat reply. A missing or empty first candidate
    /// yields the placeholder text rather than an error.
    fn from(reply: GenerateContentResponse) -> Self {
        let content = reply
            .candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .and_then(|content| content.parts.first())
            .and_then(|part| part.text.as_deref())
            .filter(|text| !text.is_empty())
            .unwrap_or("No response")
            .to_string();
        let usage = reply.usage_metadata.map(Usage::from).unwrap_or_default();
        chat_completion_from_text(gemini::CHAT_MODEL, content, usage)
    }
}

/// Envelope for document and image analysis text.
pub fn analysis_response(analysis: String) -> AnalysisResponse {
    AnalysisResponse {
        id: Uuid::new_v4().to_string(),
        created: current_timestamp(),
        analysis,
    }
}

/// Envelope for generated image URLs.
pub fn images_response(urls: Vec<String>) -> ImagesResponse {
    ImagesResponse {
        created: current_timestamp(),
        data: urls.into_iter().map(|url| ImageEntry { url }).collect(),
    }
}

fn non_empty(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

impl From<Value> for VideoJobResponse {
    /// Normalize the legacy generation reply, keeping the raw body alongside
    /// under `original_response`.
    fn from(reply: Value) -> Self {
        let url = non_empty(reply.pointer("/video/url"));
        let status = non_empty(reply.get("status")).unwrap_or_else(|| "processing".to_string());
        VideoJobResponse {
            id: Uuid::new_v4().to_string(),
            created: current_timestamp(),
            data: VideoJobData { url, status },
            original_response: reply,
        }
    }
}

impl From<Value> for VideoJobV2Response {
    fn from(reply: Value) -> Self {
        let status = non_empty(reply.get("status")).unwrap_or_else(|| "processing".to_string());
        let data = VideoJobV2Data {
            video_id: non_empty(reply.get("video_id")),
            url: non_empty(reply.get("url")),
            preview_url: non_empty(reply.get("preview_url")),
            eta_seconds: reply.get("eta_seconds").and_then(Value::as_u64).unwrap_or(60),
        };
        VideoJobV2Response {
            id: Uuid::new_v4().to_string(),
            created: current_timestamp(),
            status,
            data,
            original_response: reply,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_completion_envelope_shape() {
        let response = chat_completion_from_text("qwen", "hola".to_string(), Usage::default());
        assert_eq!(response.object, "chat.completion");
        assert_eq!(response.model, "qwen");
        assert!(!response.id.is_empty());
        assert!(response.created > 0);
        assert_eq!(response.choices.len(), 1);
        assert_eq!(response.choices[0].index, 0);
        assert_eq!(response.choices[0].finish_reason, "stop");
        assert_eq!(response.choices[0].message.role, Role::Assistant);
        assert_eq!(response.choices[0].message.content, "hola");
        assert_eq!(response.usage.total_tokens, 0);
    }

    #[test]
    fn test_gemini_reply_normalization() {
        let reply: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "bonjour"}]}}],
            "usageMetadata": {"promptTokenCount": 7, "candidatesTokenCount": 5}
        }))
        .unwrap();
        let response = ChatCompletionsResponse::from(reply);
        assert_eq!(response.model, "gemini-pro");
        assert_eq!(response.choices[0].message.content, "bonjour");
        assert_eq!(response.usage.prompt_tokens, 7);
        assert_eq!(response.usage.completion_tokens, 5);
        assert_eq!(response.usage.total_tokens, 12);
    }

    #[test]
    fn test_gemini_reply_placeholder_on_empty_candidates() {
        let reply: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        let response = ChatCompletionsResponse::from(reply);
        assert_eq!(response.choices[0].message.content, "No response");
        assert_eq!(response.usage, Usage::default());

        // Present but empty text also falls back
        let reply: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": ""}]}}]
        }))
        .unwrap();
        let response = ChatCompletionsResponse::from(reply);
        assert_eq!(response.choices[0].message.content, "No response");
    }

    #[test]
    fn test_images_response_envelope() {
        let response = images_response(vec![
            "https://wanx.alicdn.com/a.png".to_string(),
            "https://wanx.alicdn.com/b.png".to_string(),
        ]);
        assert_eq!(response.data.len(), 2);
        assert_eq!(response.data[0].url, "https://wanx.alicdn.com/a.png");
        assert!(response.created > 0);
    }

    #[test]
    fn test_video_job_v1_normalization() {
        let reply = json!({
            "video": {"url": "https://veo.example/v.mp4"},
            "status": "done",
            "extra": 42
        });
        let job = VideoJobResponse::from(reply.clone());
        assert_eq!(job.data.url.as_deref(), Some("https://veo.example/v.mp4"));
        assert_eq!(job.data.status, "done");
        assert_eq!(job.original_response, reply);
        assert!(!job.id.is_empty());

        let job = VideoJobResponse::from(json!({}));
        assert!(job.data.url.is_none());
        assert_eq!(job.data.status, "processing");
    }

    #[test]
    fn test_video_job_v2_normalization() {
        let reply = json!({
            "status": "queued",
            "video_id": "vid-1",
            "url": "https://veo.example/v.mp4",
            "eta_seconds": 120
        });
        let job = VideoJobV2Response::from(reply.clone());
        assert_eq!(job.status, "queued");
        assert_eq!(job.data.video_id.as_deref(), Some("vid-1"));
        assert_eq!(job.data.preview_url, None);
        assert_eq!(job.data.eta_seconds, 120);
        assert_eq!(job.original_response, reply);

        let job = VideoJobV2Response::from(json!({}));
        assert_eq!(job.status, "processing");
        assert_eq!(job.data.eta_seconds, 60);
        assert!(job.data.video_id.is_none());
    }
}
