use crate::config::BridgeState;
use crate::errors::BridgeError;
use crate::handlers::utils::{apply_cors, bearer_token, empty, json_response};
use crate::handlers::{gemini, models, qwen, veo};
use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use http_body_util::BodyExt;
use hyper::body::Body;
use hyper::header::HeaderMap;
use hyper::{Method, Request, Response, StatusCode};
use irisllm::apis::ApiDefinition;
use irisllm::{ProviderId, QwenApi, CHAT_COMPLETIONS_PATH, MODELS_PATH};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

/// Top-level request entry: answers the CORS preflight, buffers the body
/// once, routes by path and converts handler failures into their error
/// envelopes. Beyond the preflight the method is not consulted; every
/// operation is named by its path alone.
pub async fn handle_request<B>(
    request: Request<B>,
    state: Arc<BridgeState>,
) -> Result<Response<BoxBody<Bytes, hyper::Error>>, B::Error>
where
    B: Body<Data = Bytes>,
{
    if request.method() == Method::OPTIONS {
        let mut response = Response::new(empty());
        apply_cors(response.headers_mut());
        return Ok(response);
    }

    let path = request.uri().path().to_string();
    let headers = request.headers().clone();
    debug!(path = %path, "request received");

    let body = request.collect().await?.to_bytes();
    let outcome = route(&path, &headers, &body, &state).await;
    Ok(outcome.unwrap_or_else(BridgeError::into_response))
}

async fn route(
    path: &str,
    headers: &HeaderMap,
    body: &[u8],
    state: &BridgeState,
) -> Result<Response<BoxBody<Bytes, hyper::Error>>, BridgeError> {
    match path {
        "/" | "" => return Ok(json_response(&models::catalog(), StatusCode::OK)),
        MODELS_PATH => {
            return Ok(json_response(&models::models_listing(), StatusCode::OK));
        }
        CHAT_COMPLETIONS_PATH => {
            // The compatibility alias authenticates up front, then rewrites
            // the path onto the Qwen chat operation and re-dispatches.
            if bearer_token(headers).is_none() {
                return Err(BridgeError::MissingCredential("Authorization required"));
            }
            let rewritten = QwenApi::ChatCompletions.endpoint();
            return qwen::handle_qwen(rewritten, headers, body, state).await;
        }
        _ => {}
    }

    match ProviderId::from_path(path) {
        Some(ProviderId::Qwen) => qwen::handle_qwen(path, headers, body, state).await,
        Some(ProviderId::Gemini) => gemini::handle_gemini(path, headers, body, state).await,
        Some(ProviderId::Veo) => veo::handle_veo(path, headers, body, state).await,
        None => {
            debug!(path = %path, "no route found");
            Ok(json_response(
                &json!({
                    "error": "Endpoint not found",
                    "available_endpoints": models::catalog().endpoints,
                }),
                StatusCode::NOT_FOUND,
            ))
        }
    }
}
