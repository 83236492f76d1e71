use crate::handlers::utils::apply_cors;
use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Full};
use hyper::{Error as HyperError, Response, StatusCode};
use irisllm::{ProviderId, TransformError};
use serde_json::json;
use thiserror::Error;

/// Request-level failures surfaced to the caller as `{error, details?}`
/// envelopes. Everything a handler can fail with funnels through here so the
/// status code and body shape stay uniform across providers.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The credential header for the targeted provider is absent or empty.
    #[error("{0}")]
    MissingCredential(&'static str),

    /// A required input field is missing or empty.
    #[error("{0}")]
    InvalidInput(String),

    /// The path sits under a known provider prefix but matches no operation.
    #[error("Invalid {0} endpoint")]
    UnknownEndpoint(ProviderId),

    /// A caller-supplied image reference could not be fetched. This is the
    /// caller's input, so it reports as a 400 rather than an upstream fault.
    #[error("Error processing image")]
    ImageFetch { details: String },

    /// The outbound call failed, or a body on either side failed to parse.
    #[error("Error processing {provider} request")]
    Processing {
        provider: ProviderId,
        details: String,
    },
}

impl BridgeError {
    /// Wrap a translation failure: missing inputs surface with the
    /// transform's own message, anything else as a processing failure.
    pub fn from_transform(provider: ProviderId, err: TransformError) -> Self {
        match err {
            TransformError::MissingField(message) => BridgeError::InvalidInput(message),
            other => BridgeError::Processing {
                provider,
                details: other.to_string(),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            BridgeError::MissingCredential(_) => StatusCode::UNAUTHORIZED,
            BridgeError::InvalidInput(_)
            | BridgeError::UnknownEndpoint(_)
            | BridgeError::ImageFetch { .. } => StatusCode::BAD_REQUEST,
            BridgeError::Processing { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn into_response(self) -> Response<BoxBody<Bytes, HyperError>> {
        let details = match &self {
            BridgeError::ImageFetch { details } => Some(details.clone()),
            BridgeError::Processing { details, .. } => Some(details.clone()),
            _ => None,
        };

        let mut body = json!({ "error": self.to_string() });
        if let Some(details) = details {
            body["details"] = json!(details);
        }

        let boxed_body = Full::new(Bytes::from(body.to_string()))
            .map_err(|never| match never {})
            .boxed();

        let mut response = Response::builder()
            .status(self.status())
            .header("content-type", "application/json")
            .body(boxed_body)
            .unwrap_or_else(|_| {
                Response::new(
                    Full::new(Bytes::from("Internal Error"))
                        .map_err(|never| match never {})
                        .boxed(),
                )
            });
        apply_cors(response.headers_mut());
        response
    }
}
