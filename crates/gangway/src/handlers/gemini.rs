use crate::config::BridgeState;
use crate::errors::BridgeError;
use crate::handlers::utils::{
    gemini_api_key, json_response, parse_body, send_upstream, upstream_json,
};
use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use hyper::header::HeaderMap;
use hyper::{Response, StatusCode};
use irisllm::apis::gemini::{
    self, ChatPayload, ChatRequest, EmbedPayload, EmbedRequest, GenerateContentResponse,
    GeneratePayload, GenerateRequest,
};
use irisllm::apis::openai::ChatCompletionsResponse;
use irisllm::apis::ApiDefinition;
use irisllm::{GeminiApi, ProviderId};
use serde::Serialize;
use tracing::warn;

const PROVIDER: ProviderId = ProviderId::Gemini;

/// Entry point for the `/gemini/` routes; the caller's key rides as the
/// `__Secure-1PSID` session cookie. The credential gate comes before the
/// endpoint match.
pub async fn handle_gemini(
    path: &str,
    headers: &HeaderMap,
    body: &[u8],
    state: &BridgeState,
) -> Result<Response<BoxBody<Bytes, hyper::Error>>, BridgeError> {
    let api_key = gemini_api_key(headers).ok_or(BridgeError::MissingCredential(
        "X-Gemini-API-Key header is required",
    ))?;
    let api =
        GeminiApi::from_endpoint(path).ok_or(BridgeError::UnknownEndpoint(PROVIDER))?;

    match api {
        GeminiApi::Generate => {
            let request: GenerateRequest = parse_body(PROVIDER, body)?;
            let payload = GeneratePayload::try_from(request)
                .map_err(|err| BridgeError::from_transform(PROVIDER, err))?;
            relay_raw(&api_key, api, &payload, state).await
        }
        GeminiApi::Chat => chat(&api_key, body, state).await,
        GeminiApi::EmbedContent | GeminiApi::GenerateEmbed => {
            let request: EmbedRequest = parse_body(PROVIDER, body)?;
            let payload = EmbedPayload::try_from(request)
                .map_err(|err| BridgeError::from_transform(PROVIDER, err))?;
            relay_raw(&api_key, api, &payload, state).await
        }
    }
}

/// Forward the payload and relay the upstream's JSON verbatim, always as a
/// 200. The upstream's own status is not copied.
async fn relay_raw<T: Serialize>(
    api_key: &str,
    api: GeminiApi,
    payload: &T,
    state: &BridgeState,
) -> Result<Response<BoxBody<Bytes, hyper::Error>>, BridgeError> {
    let upstream = send_gemini(state, api_key, api, payload).await?;
    let reply = upstream_json(PROVIDER, upstream).await?;
    Ok(json_response(&reply, StatusCode::OK))
}

async fn chat(
    api_key: &str,
    body: &[u8],
    state: &BridgeState,
) -> Result<Response<BoxBody<Bytes, hyper::Error>>, BridgeError> {
    let request: ChatRequest = parse_body(PROVIDER, body)?;
    let payload = ChatPayload::try_from(request)
        .map_err(|err| BridgeError::from_transform(PROVIDER, err))?;

    let upstream = send_gemini(state, api_key, GeminiApi::Chat, &payload).await?;
    let reply = upstream_json(PROVIDER, upstream).await?;

    // An unexpected reply shape degrades to the placeholder answer instead
    // of failing the request.
    let parsed = match serde_json::from_value::<GenerateContentResponse>(reply) {
        Ok(parsed) => parsed,
        Err(err) => {
            warn!(error = %err, "unexpected chat reply shape");
            GenerateContentResponse::default()
        }
    };
    Ok(json_response(
        &ChatCompletionsResponse::from(parsed),
        StatusCode::OK,
    ))
}

/// POST to the Gemini service with the session cookie attached.
async fn send_gemini<T: Serialize>(
    state: &BridgeState,
    api_key: &str,
    api: GeminiApi,
    payload: &T,
) -> Result<reqwest::Response, BridgeError> {
    let request = state
        .http
        .post(format!(
            "{}{}",
            state.config.gemini_base_url,
            api.upstream_path()
        ))
        .header(reqwest::header::COOKIE, gemini::auth_cookie(api_key))
        .json(payload);
    send_upstream(PROVIDER, request).await
}
