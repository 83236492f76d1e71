use crate::config::BridgeState;
use crate::errors::BridgeError;
use crate::fetch::fetch_image;
use crate::handlers::utils::{
    gemini_api_key, json_response, parse_body, send_upstream, upstream_json,
};
use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use hyper::header::HeaderMap;
use hyper::{Response, StatusCode};
use irisllm::apis::gemini;
use irisllm::apis::veo::{
    AnalyzeRequest, GenerateRequest, GenerateV2Request, ImagePayload, VideoJobResponse,
    VideoJobV2Response,
};
use irisllm::apis::ApiDefinition;
use irisllm::transforms::{
    parse_data_url, veo_analyze_body, veo_generate_payload, veo_generate_v2_payload, veo_image_url,
    veo_require_v2_input, veo_require_video_uri,
};
use irisllm::{ProviderId, VeoApi};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

const PROVIDER: ProviderId = ProviderId::Veo;

/// Entry point for the `/veo/` routes. Veo shares the Gemini session cookie
/// scheme, so the same credential header unlocks both; the credential gate
/// comes before the endpoint match.
pub async fn handle_veo(
    path: &str,
    headers: &HeaderMap,
    body: &[u8],
    state: &BridgeState,
) -> Result<Response<BoxBody<Bytes, hyper::Error>>, BridgeError> {
    let api_key = gemini_api_key(headers).ok_or(BridgeError::MissingCredential(
        "X-Gemini-API-Key header is required",
    ))?;
    let api = VeoApi::from_endpoint(path).ok_or(BridgeError::UnknownEndpoint(PROVIDER))?;

    match api {
        VeoApi::Analyze => {
            let request = AnalyzeRequest::from(parse_body::<Value>(PROVIDER, body)?);
            let outbound = veo_analyze_body(request)
                .map_err(|err| BridgeError::from_transform(PROVIDER, err))?;
            relay_raw(&api_key, api, &outbound, state).await
        }
        VeoApi::Annotate | VeoApi::Detect => {
            let outbound: Value = parse_body(PROVIDER, body)?;
            veo_require_video_uri(&outbound)
                .map_err(|err| BridgeError::from_transform(PROVIDER, err))?;
            relay_raw(&api_key, api, &outbound, state).await
        }
        VeoApi::Generate | VeoApi::GenerateV1 => generate_v1(&api_key, api, body, state).await,
        VeoApi::GenerateV2 => generate_v2(&api_key, body, state).await,
    }
}

async fn generate_v1(
    api_key: &str,
    api: VeoApi,
    body: &[u8],
    state: &BridgeState,
) -> Result<Response<BoxBody<Bytes, hyper::Error>>, BridgeError> {
    let request: GenerateRequest = parse_body(PROVIDER, body)?;

    let image_data = match veo_image_url(&request) {
        // Inline payload; a data URI with no payload degrades to sending
        // no image data while the image input type stays set.
        Some(url) if url.starts_with("data:") => parse_data_url(url).map(|(_, payload)| payload),
        Some(url) => {
            let image =
                fetch_image(&state.http, url)
                    .await
                    .map_err(|err| BridgeError::ImageFetch {
                        details: err.to_string(),
                    })?;
            Some(image.data)
        }
        None => None,
    };

    let payload = veo_generate_payload(&request, image_data)
        .map_err(|err| BridgeError::from_transform(PROVIDER, err))?;
    let upstream = send_veo(state, api_key, api, &payload).await?;
    let reply = upstream_json(PROVIDER, upstream).await?;
    Ok(json_response(&VideoJobResponse::from(reply), StatusCode::OK))
}

async fn generate_v2(
    api_key: &str,
    body: &[u8],
    state: &BridgeState,
) -> Result<Response<BoxBody<Bytes, hyper::Error>>, BridgeError> {
    let request: GenerateV2Request = parse_body(PROVIDER, body)?;
    veo_require_v2_input(&request).map_err(|err| BridgeError::from_transform(PROVIDER, err))?;

    let images = match request.images.as_deref() {
        Some(references) if !references.is_empty() => {
            Some(resolve_images(references, state).await?)
        }
        _ => None,
    };

    let payload = veo_generate_v2_payload(&request, images);
    let upstream = send_veo(state, api_key, VeoApi::GenerateV2, &payload).await?;
    let reply = upstream_json(PROVIDER, upstream).await?;
    Ok(json_response(
        &VideoJobV2Response::from(reply),
        StatusCode::OK,
    ))
}

/// Resolve each image reference to an inline payload, dropping the ones that
/// fail. A batch where nothing survives is a caller error.
async fn resolve_images(
    references: &[String],
    state: &BridgeState,
) -> Result<Vec<ImagePayload>, BridgeError> {
    let mut images = Vec::with_capacity(references.len());
    for reference in references {
        if reference.starts_with("data:") {
            match parse_data_url(reference) {
                Some((media_type, payload)) => images.push(ImagePayload {
                    data: payload,
                    kind: media_type,
                }),
                None => warn!(url = %reference, "skipping malformed data URI"),
            }
            continue;
        }
        match fetch_image(&state.http, reference).await {
            Ok(image) => images.push(ImagePayload {
                data: image.data,
                kind: image.content_type,
            }),
            Err(err) => {
                warn!(url = %reference, error = %err, "skipping image that failed to fetch")
            }
        }
    }
    if images.is_empty() {
        return Err(BridgeError::InvalidInput(
            "No valid images could be processed".to_string(),
        ));
    }
    Ok(images)
}

/// Forward the body and relay the upstream's JSON verbatim, always as a 200.
async fn relay_raw(
    api_key: &str,
    api: VeoApi,
    outbound: &Value,
    state: &BridgeState,
) -> Result<Response<BoxBody<Bytes, hyper::Error>>, BridgeError> {
    let upstream = send_veo(state, api_key, api, outbound).await?;
    let reply = upstream_json(PROVIDER, upstream).await?;
    Ok(json_response(&reply, StatusCode::OK))
}

/// POST to the Veo service owning `api`, with the session cookie attached.
async fn send_veo<T: Serialize>(
    state: &BridgeState,
    api_key: &str,
    api: VeoApi,
    payload: &T,
) -> Result<reqwest::Response, BridgeError> {
    let request = state
        .http
        .post(format!(
            "{}{}",
            state.config.veo_base(&api),
            api.upstream_path()
        ))
        .header(reqwest::header::COOKIE, gemini::auth_cookie(api_key))
        .json(payload);
    send_upstream(PROVIDER, request).await
}
