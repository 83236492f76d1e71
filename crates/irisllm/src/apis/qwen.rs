use crate::apis::sse::SseStreamIter;
use crate::apis::ApiDefinition;
use log::warn;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::sync::LazyLock;
use url::Url;

/// Every Qwen operation funnels into the same upstream dialog endpoint.
pub const DIALOG_PATH: &str = "/dialog/conversation";

/// Headers the dialog API expects from a browser session.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";
pub const ACCEPT_LANGUAGE: &str = "es-ES,es;q=0.9,en;q=0.8";
pub const X_PLATFORM: &str = "pc_tongyi";

/// CDN host that serves generated images.
pub const IMAGE_CDN_DOMAIN: &str = "wanx.alicdn.com";

/// Question used when a document analysis request carries none.
pub const DEFAULT_DOCUMENT_QUESTION: &str = "Por favor analiza este documento";

/// Question used when an image analysis request carries none.
pub const DEFAULT_IMAGE_QUESTION: &str = "¿Qué hay en esta imagen?";

/// Cookie header for the dialog API. Tickets longer than 100 characters are
/// treated as aliyunid login tickets, shorter ones as tongyi SSO tickets.
pub fn auth_cookie(ticket: &str) -> String {
    let cookie_name = if ticket.len() > 100 {
        "login_aliyunid_ticket"
    } else {
        "tongyi_sso_ticket"
    };
    [
        format!("{}={}", cookie_name, ticket),
        "aliyun_choice=intl".to_string(),
        "_samesite_flag_=true".to_string(),
    ]
    .join("; ")
}

/// Qwen operations exposed by the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QwenApi {
    ChatCompletions,
    ImageGenerations,
    DocumentAnalysis,
    ImageAnalysis,
}

impl ApiDefinition for QwenApi {
    fn endpoint(&self) -> &'static str {
        match self {
            QwenApi::ChatCompletions => "/qwen/chat/completions",
            QwenApi::ImageGenerations => "/qwen/images/generations",
            QwenApi::DocumentAnalysis => "/qwen/analyze/document",
            QwenApi::ImageAnalysis => "/qwen/analyze/image",
        }
    }

    fn from_endpoint(endpoint: &str) -> Option<Self> {
        Self::all_variants()
            .into_iter()
            .find(|api| api.endpoint() == endpoint)
    }

    fn supports_streaming(&self) -> bool {
        // Image generation always consumes the upstream stream server-side.
        matches!(self, QwenApi::ChatCompletions)
    }

    fn all_variants() -> Vec<Self> {
        vec![
            QwenApi::ChatCompletions,
            QwenApi::ImageGenerations,
            QwenApi::DocumentAnalysis,
            QwenApi::ImageAnalysis,
        ]
    }
}

// ============================================================================
// DIALOG REQUEST (outbound wire shape)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogRequest {
    pub mode: String,
    pub model: String,
    pub action: String,
    pub user_action: String,
    pub request_id: String,
    pub session_id: String,
    pub session_type: String,
    pub parent_msg_id: String,
    pub params: DialogParams,
    pub contents: Vec<DialogContent>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogParams {
    pub file_upload_batch_id: String,
    pub search_type: Option<String>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogContent {
    pub role: String,
    pub content_type: String,
    pub content: String,
    pub ext: Option<DialogContentExt>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogContentExt {
    pub file_size: u64,
}

impl DialogContent {
    pub fn text(content: impl Into<String>) -> Self {
        DialogContent {
            role: "user".to_string(),
            content_type: "text".to_string(),
            content: content.into(),
            ext: None,
        }
    }

    pub fn file(url: impl Into<String>) -> Self {
        DialogContent {
            role: "user".to_string(),
            content_type: "file".to_string(),
            content: url.into(),
            ext: Some(DialogContentExt { file_size: 0 }),
        }
    }

    pub fn image(url: impl Into<String>) -> Self {
        DialogContent {
            role: "user".to_string(),
            content_type: "image".to_string(),
            content: url.into(),
            ext: None,
        }
    }
}

// ============================================================================
// BRIDGE-SURFACE REQUESTS
// ============================================================================

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageGenerationRequest {
    pub prompt: Option<String>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentAnalysisRequest {
    pub file_url: Option<String>,
    pub question: Option<String>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageAnalysisRequest {
    pub image_url: Option<String>,
    pub question: Option<String>,
}

// ============================================================================
// RESPONSE ENVELOPES
// ============================================================================

/// DALL-E style listing for generated image URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagesResponse {
    pub created: u64,
    pub data: Vec<ImageEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageEntry {
    pub url: String,
}

/// Envelope for document and image analysis replies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub id: String,
    pub created: u64,
    pub analysis: String,
}

// ============================================================================
// STREAM CHUNKS AND THEIR CONSUMERS
// ============================================================================

/// One JSON payload from the dialog event stream.
#[derive(Debug, Clone, Deserialize)]
pub struct DialogChunk {
    #[serde(default)]
    pub contents: Vec<DialogChunkContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DialogChunkContent {
    pub role: Option<String>,
    pub content: Option<String>,
}

/// Concatenate every assistant content delta from a buffered dialog stream.
/// Lines that fail to parse are logged and skipped; plain non-SSE bodies
/// therefore collapse to the empty string.
pub fn collect_assistant_text(body: &str) -> String {
    let mut text = String::new();
    for event in SseStreamIter::new(body.lines()) {
        if event.is_done() {
            continue;
        }
        let Some(data) = event.data.as_deref() else {
            continue;
        };
        match serde_json::from_str::<DialogChunk>(data) {
            Ok(chunk) => {
                for entry in chunk.contents {
                    if entry.role.as_deref() == Some("assistant") {
                        if let Some(content) = entry.content {
                            text.push_str(&content);
                        }
                    }
                }
            }
            Err(err) => warn!("skipping unparseable stream line {:?}: {}", event.raw_line, err),
        }
    }
    text
}

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)https?://[-a-zA-Z0-9@:%._+~#=]{2,256}\.[a-z]{2,6}\b[-a-zA-Z0-9@:%_+.~#?&/=,]*")
        .expect("image URL pattern must compile")
});

/// Mine a buffered dialog stream for image URLs whose host contains `domain`.
/// The query component is stripped and the result deduplicated in first-seen
/// order.
pub fn extract_image_urls(body: &str, domain: &str) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();
    for event in SseStreamIter::new(body.lines()) {
        if event.is_done() {
            continue;
        }
        let Some(data) = event.data.as_deref() else {
            continue;
        };
        let chunk: DialogChunk = match serde_json::from_str(data) {
            Ok(chunk) => chunk,
            Err(err) => {
                warn!("skipping unparseable stream line {:?}: {}", event.raw_line, err);
                continue;
            }
        };
        let joined = chunk
            .contents
            .iter()
            .map(|entry| entry.content.as_deref().unwrap_or(""))
            .collect::<Vec<_>>()
            .join(" ");
        for found in URL_PATTERN.find_iter(&joined) {
            let Ok(mut parsed) = Url::parse(found.as_str()) else {
                continue;
            };
            if !parsed.host_str().is_some_and(|host| host.contains(domain)) {
                continue;
            }
            parsed.set_query(None);
            let stripped = parsed.to_string();
            if !urls.contains(&stripped) {
                urls.push(stripped);
            }
        }
    }
    urls
}
