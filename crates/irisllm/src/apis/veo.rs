use crate::apis::ApiDefinition;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::skip_serializing_none;

/// Prompt used when an analyze request names a video but no question.
pub const DEFAULT_ANALYZE_PROMPT: &str = "Describe what's happening in this video.";

/// Prompt used when a v1 generation request carries only an image.
pub const DEFAULT_GENERATE_PROMPT: &str = "Create a video from this image";

/// Veo operations exposed by the bridge. `/veo/generate` and
/// `/veo/generate/v1` are aliases for the same legacy generation call;
/// `/veo/generate/v2` targets the second-generation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VeoApi {
    Analyze,
    Annotate,
    Detect,
    Generate,
    GenerateV1,
    GenerateV2,
}

impl VeoApi {
    /// Path on the upstream service, relative to the configured base URL.
    pub fn upstream_path(&self) -> &'static str {
        match self {
            VeoApi::Analyze => "/analyze",
            VeoApi::Annotate => "/annotate",
            VeoApi::Detect => "/detect",
            VeoApi::Generate | VeoApi::GenerateV1 | VeoApi::GenerateV2 => "/generate",
        }
    }

    /// Whether the operation targets the v2 base URL.
    pub fn uses_v2_base(&self) -> bool {
        matches!(self, VeoApi::GenerateV2)
    }
}

impl ApiDefinition for VeoApi {
    fn endpoint(&self) -> &'static str {
        match self {
            VeoApi::Analyze => "/veo/analyze",
            VeoApi::Annotate => "/veo/annotate",
            VeoApi::Detect => "/veo/detect",
            VeoApi::Generate => "/veo/generate",
            VeoApi::GenerateV1 => "/veo/generate/v1",
            VeoApi::GenerateV2 => "/veo/generate/v2",
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
            VeoApi::Analyze,
            VeoApi::Annotate,
            VeoApi::Detect,
            VeoApi::Generate,
            VeoApi::GenerateV1,
            VeoApi::GenerateV2,
        ]
    }
}

// ============================================================================
// ANALYZE INPUT UNION
// ============================================================================

/// The analyze surface accepts three body shapes. They are told apart once,
/// here, so the handler never sniffs fields again. Field checks are
/// permissive about types: empty strings, zero, `false` and `null` read as
/// absent, any other value counts.
#[derive(Debug, Clone)]
pub enum AnalyzeRequest {
    /// Body already carries a `request` envelope; forwarded unchanged.
    Wrapped(Value),
    /// Simplified body with recognized top-level fields; gets wrapped. The
    /// raw field values ride along whatever their JSON type, and the prompt
    /// is resolved to [`DEFAULT_ANALYZE_PROMPT`] here when absent.
    Bare {
        video_uri: Option<Value>,
        content: Option<Value>,
        prompt: Value,
    },
    /// Nothing recognizable; forwarded unchanged.
    Passthrough(Value),
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl From<Value> for AnalyzeRequest {
    fn from(body: Value) -> Self {
        if body.get("request").is_some_and(truthy) {
            return AnalyzeRequest::Wrapped(body);
        }
        let recognized = ["videoUri", "content", "prompt"]
            .into_iter()
            .any(|key| body.get(key).is_some_and(truthy));
        if !recognized {
            return AnalyzeRequest::Passthrough(body);
        }
        let prompt = body
            .get("prompt")
            .filter(|value| truthy(value))
            .cloned()
            .unwrap_or_else(|| Value::String(DEFAULT_ANALYZE_PROMPT.to_string()));
        AnalyzeRequest::Bare {
            video_uri: body.get("videoUri").cloned(),
            content: body.get("content").cloned(),
            prompt,
        }
    }
}

/// Envelope built around a bare analyze request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeEnvelope {
    pub request: AnalyzeParams,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeParams {
    pub prompt: Value,
    #[serde(rename = "videoUri")]
    pub video_uri: Option<Value>,
    pub content: Option<Value>,
}

// ============================================================================
// GENERATION REQUESTS (bridge surface)
// ============================================================================

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub prompt: Option<String>,
    pub image_url: Option<String>,
    pub duration: Option<u64>,
    pub style: Option<String>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateV2Request {
    pub prompt: Option<String>,
    pub images: Option<Vec<String>>,
    pub generation_config: Option<GenerationConfigV2Overrides>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationConfigV2Overrides {
    pub duration: Option<String>,
    pub resolution: Option<String>,
    pub fps: Option<u32>,
    pub style: Option<String>,
}

impl GenerationConfigV2Overrides {
    pub fn resolve(&self) -> GenerationConfigV2 {
        let defaults = GenerationConfigV2::default();
        GenerationConfigV2 {
            duration: self.duration.clone().unwrap_or(defaults.duration),
            resolution: self.resolution.clone().unwrap_or(defaults.resolution),
            fps: self.fps.unwrap_or(defaults.fps),
            style: self.style.clone().unwrap_or(defaults.style),
        }
    }
}

// ============================================================================
// UPSTREAM PAYLOADS
// ============================================================================

/// Body for the legacy `/generate` call.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratePayload {
    pub prompt: String,
    pub input_type: String,
    pub image_data: Option<String>,
    pub output_type: String,
    pub duration: u64,
    pub style: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfigV2 {
    pub duration: String,
    pub resolution: String,
    pub fps: u32,
    pub style: String,
}

impl Default for GenerationConfigV2 {
    fn default() -> Self {
        GenerationConfigV2 {
            duration: "15s".to_string(),
            resolution: "1080p".to_string(),
            fps: 30,
            style: "cinematic".to_string(),
        }
    }
}

/// Body for the v2 `/generate` call.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateV2Payload {
    pub generation_config: GenerationConfigV2,
    pub text_prompt: Option<String>,
    pub images: Option<Vec<ImagePayload>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagePayload {
    pub data: String,
    #[serde(rename = "type")]
    pub kind: String,
}

// ============================================================================
// NORMALIZED RESPONSE ENVELOPES
// ============================================================================

/// Normalized video-job envelope for the legacy generation call. The raw
/// upstream reply rides along under `original_response`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoJobResponse {
    pub id: String,
    pub created: u64,
    pub data: VideoJobData,
    pub original_response: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoJobData {
    pub url: Option<String>,
    pub status: String,
}

/// Normalized video-job envelope for the v2 generation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoJobV2Response {
    pub id: String,
    pub created: u64,
    pub status: String,
    pub data: VideoJobV2Data,
    pub original_response: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoJobV2Data {
    pub video_id: Option<String>,
    pub url: Option<String>,
    pub preview_url: Option<String>,
    pub eta_seconds: u64,
}
