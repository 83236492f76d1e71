use crate::apis::gemini::{
    ChatMessage, ChatPayload, ChatRequest, EmbedPayload, EmbedRequest, GeminiContent, GeminiPart,
    GeneratePayload as GeminiGeneratePayload, GenerateRequest as GeminiGenerateRequest, PromptText,
};
use crate::apis::openai::ChatCompletionsRequest;
use crate::apis::qwen::{
    DEFAULT_DOCUMENT_QUESTION, DEFAULT_IMAGE_QUESTION, DialogContent, DialogParams, DialogRequest,
    DocumentAnalysisRequest, ImageAnalysisRequest, ImageGenerationRequest,
};
use crate::apis::veo::{
    AnalyzeEnvelope, AnalyzeParams, AnalyzeRequest, DEFAULT_GENERATE_PROMPT,
    GeneratePayload as VeoGeneratePayload, GenerateRequest as VeoGenerateRequest,
    GenerateV2Payload, GenerateV2Request, ImagePayload,
};
use crate::transforms::TransformError;
use crate::transforms::lib::ExtractText;
use serde_json::Value;
use uuid::Uuid;

// ============================================================================
// QWEN REQUEST TRANSFORMATIONS
// ============================================================================

/// Common scaffolding of every dialog payload; the operations differ only in
/// session continuity, search behavior and content items.
fn dialog_request(
    session_id: String,
    parent_msg_id: String,
    search_type: Option<String>,
    contents: Vec<DialogContent>,
) -> DialogRequest {
    DialogRequest {
        mode: "chat".to_string(),
        model: String::new(),
        action: "next".to_string(),
        user_action: "chat".to_string(),
        request_id: Uuid::new_v4().to_string(),
        session_id,
        session_type: "text_chat".to_string(),
        parent_msg_id,
        params: DialogParams {
            file_upload_batch_id: Uuid::new_v4().to_string(),
            search_type,
        },
        contents,
    }
}

/// Split a `{sessionId}-{parentMsgId}` continuity token; both halves default
/// to empty, which starts a fresh session upstream.
fn split_conversation_id(conversation_id: Option<&str>) -> (String, String) {
    let Some(id) = conversation_id.filter(|id| !id.is_empty()) else {
        return (String::new(), String::new());
    };
    let mut parts = id.split('-');
    let session_id = parts.next().unwrap_or_default().to_string();
    let parent_msg_id = parts.next().unwrap_or_default().to_string();
    (session_id, parent_msg_id)
}

impl TryFrom<ChatCompletionsRequest> for DialogRequest {
    type Error = TransformError;

    /// Only the last message travels upstream; Qwen replays the rest of the
    /// conversation server-side from the session fields.
    fn try_from(request: ChatCompletionsRequest) -> Result<Self, Self::Error> {
        let last = request
            .messages
            .last()
            .ok_or_else(|| TransformError::MissingField("Messages array is required".to_string()))?;
        let (session_id, parent_msg_id) =
            split_conversation_id(request.conversation_id.as_deref());
        Ok(dialog_request(
            session_id,
            parent_msg_id,
            Some(String::new()),
            vec![DialogContent::text(last.extract_text())],
        ))
    }
}

impl TryFrom<ImageGenerationRequest> for DialogRequest {
    type Error = TransformError;

    /// Prompts without a draw directive get one prefixed so the dialog API
    /// routes the turn into image mode.
    fn try_from(request: ImageGenerationRequest) -> Result<Self, Self::Error> {
        let prompt = request
            .prompt
            .filter(|prompt| !prompt.is_empty())
            .ok_or_else(|| TransformError::MissingField("Prompt is required".to_string()))?;
        let content = if prompt.contains('画') {
            prompt
        } else {
            format!("请画：{}", prompt)
        };
        Ok(dialog_request(
            String::new(),
            String::new(),
            None,
            vec![DialogContent::text(content)],
        ))
    }
}

impl TryFrom<DocumentAnalysisRequest> for DialogRequest {
    type Error = TransformError;

    fn try_from(request: DocumentAnalysisRequest) -> Result<Self, Self::Error> {
        let file_url = request
            .file_url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| TransformError::MissingField("file_url is required".to_string()))?;
        let question = request
            .question
            .filter(|question| !question.is_empty())
            .unwrap_or_else(|| DEFAULT_DOCUMENT_QUESTION.to_string());
        Ok(dialog_request(
            String::new(),
            String::new(),
            None,
            vec![DialogContent::file(file_url), DialogContent::text(question)],
        ))
    }
}

impl TryFrom<ImageAnalysisRequest> for DialogRequest {
    type Error = TransformError;

    fn try_from(request: ImageAnalysisRequest) -> Result<Self, Self::Error> {
        let image_url = request
            .image_url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| TransformError::MissingField("image_url is required".to_string()))?;
        let question = request
            .question
            .filter(|question| !question.is_empty())
            .unwrap_or_else(|| DEFAULT_IMAGE_QUESTION.to_string());
        Ok(dialog_request(
            String::new(),
            String::new(),
            None,
            vec![DialogContent::image(image_url), DialogContent::text(question)],
        ))
    }
}

// ============================================================================
// GEMINI REQUEST TRANSFORMATIONS
// ============================================================================

impl TryFrom<GeminiGenerateRequest> for GeminiGeneratePayload {
    type Error = TransformError;

    fn try_from(request: GeminiGenerateRequest) -> Result<Self, Self::Error> {
        let prompt = request
            .prompt
            .filter(|prompt| !prompt.is_empty())
            .ok_or_else(|| TransformError::MissingField("Prompt is required".to_string()))?;
        Ok(GeminiGeneratePayload {
            prompt: PromptText { text: prompt },
            config: request.generation_config.unwrap_or_default().resolve(),
        })
    }
}

impl From<ChatMessage> for GeminiContent {
    /// Gemini knows two roles; anything that is not the user speaks as the
    /// model. Non-string content is carried as its JSON text.
    fn from(message: ChatMessage) -> Self {
        let role = if message.role == "user" { "user" } else { "model" };
        let text = match message.content {
            Value::String(text) => text,
            structured => structured.to_string(),
        };
        GeminiContent {
            role: role.to_string(),
            parts: vec![GeminiPart { text }],
        }
    }
}

impl TryFrom<ChatRequest> for ChatPayload {
    type Error = TransformError;

    fn try_from(request: ChatRequest) -> Result<Self, Self::Error> {
        let messages = request
            .messages
            .filter(|messages| !messages.is_empty())
            .ok_or_else(|| TransformError::MissingField("Messages array is required".to_string()))?;
        Ok(ChatPayload {
            contents: messages.into_iter().map(GeminiContent::from).collect(),
            generation_config: request.generation_config.unwrap_or_default().resolve(),
        })
    }
}

impl TryFrom<EmbedRequest> for EmbedPayload {
    type Error = TransformError;

    fn try_from(request: EmbedRequest) -> Result<Self, Self::Error> {
        let text = request
            .text_to_embed()
            .ok_or_else(|| TransformError::MissingField("Text content is required".to_string()))?;
        Ok(EmbedPayload {
            text: text.to_string(),
        })
    }
}

// ============================================================================
// VEO REQUEST TRANSFORMATIONS
// ============================================================================

/// Wrapped and unrecognized analyze bodies pass through untouched; bare
/// bodies get the request envelope, prompt already resolved at
/// classification.
pub fn veo_analyze_body(request: AnalyzeRequest) -> Result<Value, TransformError> {
    match request {
        AnalyzeRequest::Wrapped(body) | AnalyzeRequest::Passthrough(body) => Ok(body),
        AnalyzeRequest::Bare {
            video_uri,
            content,
            prompt,
        } => {
            let envelope = AnalyzeEnvelope {
                request: AnalyzeParams {
                    prompt,
                    video_uri,
                    content,
                },
            };
            Ok(serde_json::to_value(envelope)?)
        }
    }
}

/// Annotate and detect forward the body unchanged but insist on a video
/// reference being present.
pub fn veo_require_video_uri(body: &Value) -> Result<(), TransformError> {
    let present = match body.get("videoUri") {
        Some(Value::String(uri)) => !uri.is_empty(),
        Some(Value::Null) | None => false,
        Some(_) => true,
    };
    if present {
        Ok(())
    } else {
        Err(TransformError::MissingField("videoUri is required".to_string()))
    }
}

/// The image reference of a legacy generation request, when present.
pub fn veo_image_url(request: &VeoGenerateRequest) -> Option<&str> {
    request.image_url.as_deref().filter(|url| !url.is_empty())
}

/// Assemble the legacy generation payload. The caller resolves `image_url`
/// to base64 beforehand; `image_data` stays `None` for text-only requests
/// and for inline data URIs carrying no payload.
pub fn veo_generate_payload(
    request: &VeoGenerateRequest,
    image_data: Option<String>,
) -> Result<VeoGeneratePayload, TransformError> {
    let prompt = request.prompt.as_deref().filter(|prompt| !prompt.is_empty());
    let has_image = veo_image_url(request).is_some();
    if prompt.is_none() && !has_image {
        return Err(TransformError::MissingField(
            "prompt or image_url is required".to_string(),
        ));
    }
    Ok(VeoGeneratePayload {
        prompt: prompt.unwrap_or(DEFAULT_GENERATE_PROMPT).to_string(),
        input_type: if has_image { "image" } else { "text" }.to_string(),
        image_data,
        output_type: "video".to_string(),
        duration: request.duration.unwrap_or(5),
        style: request
            .style
            .as_deref()
            .filter(|style| !style.is_empty())
            .unwrap_or("cinematic")
            .to_string(),
    })
}

/// A v2 request must carry a prompt or at least one image reference.
pub fn veo_require_v2_input(request: &GenerateV2Request) -> Result<(), TransformError> {
    let has_prompt = request.prompt.as_deref().is_some_and(|prompt| !prompt.is_empty());
    let has_images = request
        .images
        .as_deref()
        .is_some_and(|images| !images.is_empty());
    if has_prompt || has_images {
        Ok(())
    } else {
        Err(TransformError::MissingField(
            "prompt or images array is required".to_string(),
        ))
    }
}

/// Assemble the v2 payload from already-resolved images. `images` is `None`
/// when the request carried none at all.
pub fn veo_generate_v2_payload(
    request: &GenerateV2Request,
    images: Option<Vec<ImagePayload>>,
) -> GenerateV2Payload {
    GenerateV2Payload {
        generation_config: request.generation_config.clone().unwrap_or_default().resolve(),
        text_prompt: request.prompt.clone().filter(|prompt| !prompt.is_empty()),
        images,
    }
}

// ============================================================================
// Tests
// ============================================================================
