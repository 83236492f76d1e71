use crate::config::BridgeState;
use crate::errors::BridgeError;
use crate::handlers::utils::{
    bearer_token, event_stream_response, json_response, parse_body, send_upstream, upstream_text,
};
use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use hyper::header::HeaderMap;
use hyper::{Response, StatusCode};
use irisllm::apis::openai::{ChatCompletionsRequest, Usage};
use irisllm::apis::qwen::{
    self, DialogRequest, DocumentAnalysisRequest, ImageAnalysisRequest, ImageGenerationRequest,
};
use irisllm::apis::ApiDefinition;
use irisllm::transforms::{analysis_response, chat_completion_from_text, images_response};
use irisllm::{ProviderId, QwenApi};
use tracing::debug;

const PROVIDER: ProviderId = ProviderId::Qwen;

/// Entry point for the `/qwen/` routes. The credential gate comes before the
/// endpoint match, so an unknown sub-path without a ticket still reads as
/// unauthorized. Every operation issues exactly one dialog call carrying the
/// caller's ticket as a session cookie.
pub async fn handle_qwen(
    path: &str,
    headers: &HeaderMap,
    body: &[u8],
    state: &BridgeState,
) -> Result<Response<BoxBody<Bytes, hyper::Error>>, BridgeError> {
    let ticket = bearer_token(headers).ok_or(BridgeError::MissingCredential(
        "Authorization header is required",
    ))?;
    let api =
        QwenApi::from_endpoint(path).ok_or(BridgeError::UnknownEndpoint(PROVIDER))?;

    match api {
        QwenApi::ChatCompletions => chat_completions(&ticket, body, state).await,
        QwenApi::ImageGenerations => image_generations(&ticket, body, state).await,
        QwenApi::DocumentAnalysis => {
            let request: DocumentAnalysisRequest = parse_body(PROVIDER, body)?;
            let dialog = DialogRequest::try_from(request)
                .map_err(|err| BridgeError::from_transform(PROVIDER, err))?;
            analysis(&ticket, dialog, state).await
        }
        QwenApi::ImageAnalysis => {
            let request: ImageAnalysisRequest = parse_body(PROVIDER, body)?;
            let dialog = DialogRequest::try_from(request)
                .map_err(|err| BridgeError::from_transform(PROVIDER, err))?;
            analysis(&ticket, dialog, state).await
        }
    }
}

async fn chat_completions(
    ticket: &str,
    body: &[u8],
    state: &BridgeState,
) -> Result<Response<BoxBody<Bytes, hyper::Error>>, BridgeError> {
    let request: ChatCompletionsRequest = parse_body(PROVIDER, body)?;
    let stream = request.stream;
    let dialog = DialogRequest::try_from(request)
        .map_err(|err| BridgeError::from_transform(PROVIDER, err))?;

    let upstream = send_dialog(state, ticket, &dialog, stream).await?;
    if stream {
        debug!("relaying dialog stream to caller");
        return Ok(event_stream_response(upstream));
    }

    let reply = upstream_text(PROVIDER, upstream).await?;
    let content = qwen::collect_assistant_text(&reply);
    Ok(json_response(
        &chat_completion_from_text("qwen", content, Usage::default()),
        StatusCode::OK,
    ))
}

async fn image_generations(
    ticket: &str,
    body: &[u8],
    state: &BridgeState,
) -> Result<Response<BoxBody<Bytes, hyper::Error>>, BridgeError> {
    let request: ImageGenerationRequest = parse_body(PROVIDER, body)?;
    let dialog = DialogRequest::try_from(request)
        .map_err(|err| BridgeError::from_transform(PROVIDER, err))?;

    // Image URLs only appear on the event stream; consume it buffered.
    let upstream = send_dialog(state, ticket, &dialog, true).await?;
    let reply = upstream_text(PROVIDER, upstream).await?;
    let urls = qwen::extract_image_urls(&reply, qwen::IMAGE_CDN_DOMAIN);
    debug!(count = urls.len(), "extracted generated image urls");
    Ok(json_response(&images_response(urls), StatusCode::OK))
}

async fn analysis(
    ticket: &str,
    dialog: DialogRequest,
    state: &BridgeState,
) -> Result<Response<BoxBody<Bytes, hyper::Error>>, BridgeError> {
    let upstream = send_dialog(state, ticket, &dialog, true).await?;
    let reply = upstream_text(PROVIDER, upstream).await?;
    Ok(json_response(
        &analysis_response(qwen::collect_assistant_text(&reply)),
        StatusCode::OK,
    ))
}

/// POST a dialog payload with the browser-session headers the API expects.
/// The upstream status is never inspected; the reply body speaks for itself.
async fn send_dialog(
    state: &BridgeState,
    ticket: &str,
    dialog: &DialogRequest,
    stream: bool,
) -> Result<reqwest::Response, BridgeError> {
    let accept = if stream {
        "text/event-stream"
    } else {
        "application/json"
    };
    let request = state
        .http
        .post(format!("{}{}", state.config.qwen_base_url, qwen::DIALOG_PATH))
        .header(reqwest::header::ACCEPT, accept)
        .header(reqwest::header::ACCEPT_LANGUAGE, qwen::ACCEPT_LANGUAGE)
        .header(reqwest::header::CACHE_CONTROL, "no-cache")
        .header(reqwest::header::PRAGMA, "no-cache")
        .header(reqwest::header::USER_AGENT, qwen::USER_AGENT)
        .header("x-platform", qwen::X_PLATFORM)
        .header(reqwest::header::COOKIE, qwen::auth_cookie(ticket))
        .json(dialog);
    send_upstream(PROVIDER, request).await
}
