use crate::errors::BridgeError;
use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Empty, Full, StreamBody};
use hyper::body::Frame;
use hyper::header::{HeaderMap, HeaderName, HeaderValue};
use hyper::{Response, StatusCode};
use irisllm::ProviderId;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;
use tracing::warn;

/// Permissive CORS grants attached to every response, error paths included;
/// browser callers must always be able to read the body.
const CORS_HEADERS: &[(&str, &str)] = &[
    ("access-control-allow-origin", "*"),
    ("access-control-allow-methods", "GET, POST, OPTIONS"),
    (
        "access-control-allow-headers",
        "Content-Type, Authorization, X-Gemini-API-Key",
    ),
    ("access-control-max-age", "86400"),
];

pub fn full<T: Into<Bytes>>(chunk: T) -> BoxBody<Bytes, hyper::Error> {
    Full::new(chunk.into())
        .map_err(|never| match never {})
        .boxed()
}

pub fn empty() -> BoxBody<Bytes, hyper::Error> {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed()
}

pub fn apply_cors(headers: &mut HeaderMap) {
    for (name, value) in CORS_HEADERS {
        headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }
}

/// Serialize `payload` into a JSON response with the CORS grants attached.
pub fn json_response<T: Serialize>(
    payload: &T,
    status: StatusCode,
) -> Response<BoxBody<Bytes, hyper::Error>> {
    let body = match serde_json::to_vec(payload) {
        Ok(body) => body,
        Err(err) => {
            warn!(error = %err, "failed to serialize response body");
            let mut response = Response::new(full("Internal Error"));
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            return response;
        }
    };
    let mut response = Response::new(full(body));
    *response.status_mut() = status;
    response.headers_mut().insert(
        hyper::header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    apply_cors(response.headers_mut());
    response
}

/// Relay an upstream byte stream to the caller unchanged, under event-stream
/// headers. Chunks cross a bounded channel; the relay task stops when the
/// upstream errors or the caller hangs up.
pub fn event_stream_response(upstream: reqwest::Response) -> Response<BoxBody<Bytes, hyper::Error>> {
    let (tx, rx) = mpsc::channel::<Bytes>(16);

    tokio::spawn(async move {
        let mut byte_stream = upstream.bytes_stream();
        while let Some(item) = byte_stream.next().await {
            let chunk = match item {
                Ok(chunk) => chunk,
                Err(err) => {
                    warn!(error = %err, "error receiving upstream chunk");
                    break;
                }
            };
            if tx.send(chunk).await.is_err() {
                warn!("receiver dropped");
                break;
            }
        }
    });

    let stream = ReceiverStream::new(rx).map(|chunk| Ok::<_, hyper::Error>(Frame::data(chunk)));
    let mut response = Response::new(BoxBody::new(StreamBody::new(stream)));
    let headers = response.headers_mut();
    headers.insert(
        hyper::header::CONTENT_TYPE,
        HeaderValue::from_static("text/event-stream"),
    );
    headers.insert(
        hyper::header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache"),
    );
    headers.insert(
        hyper::header::CONNECTION,
        HeaderValue::from_static("keep-alive"),
    );
    apply_cors(headers);
    response
}

/// Bearer credential from the Authorization header. The prefix is optional;
/// a bare token passes through as-is. Empty values count as absent.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(hyper::header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value);
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Session credential shared by the Gemini and Veo handlers.
pub fn gemini_api_key(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("x-gemini-api-key")?.to_str().ok()?;
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Parse an inbound JSON body. Failures report as processing errors for the
/// targeted provider, matching how the surface treats unreadable bodies.
pub fn parse_body<T: DeserializeOwned>(provider: ProviderId, body: &[u8]) -> Result<T, BridgeError> {
    serde_json::from_slice(body).map_err(|err| BridgeError::Processing {
        provider,
        details: err.to_string(),
    })
}

/// Issue an outbound call, mapping transport failures to the provider's
/// processing error.
pub async fn send_upstream(
    provider: ProviderId,
    request: reqwest::RequestBuilder,
) -> Result<reqwest::Response, BridgeError> {
    request.send().await.map_err(|err| BridgeError::Processing {
        provider,
        details: err.to_string(),
    })
}

/// Buffer an upstream reply body as text.
pub async fn upstream_text(
    provider: ProviderId,
    response: reqwest::Response,
) -> Result<String, BridgeError> {
    response.text().await.map_err(|err| BridgeError::Processing {
        provider,
        details: err.to_string(),
    })
}

/// Buffer and parse an upstream reply body as JSON.
pub async fn upstream_json(
    provider: ProviderId,
    response: reqwest::Response,
) -> Result<serde_json::Value, BridgeError> {
    response.json().await.map_err(|err| BridgeError::Processing {
        provider,
        details: err.to_string(),
    })
}
