//! Error types for the payment API client.
//!
//! # Design
//! `NotFound`, `Unauthorized` and `RateLimited` get dedicated variants
//! because callers branch on them. Any other non-2xx response that carries
//! the API's `{"error": {...}}` envelope becomes `Api`; responses without a
//! recognizable envelope land in `HttpError` with the raw status and body.

use serde::Deserialize;

use crate::http::TransportError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server returned 404: the requested object does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server rejected the credentials the host attached (401).
    #[error("unauthorized")]
    Unauthorized,

    /// The server asked the caller to slow down (429).
    #[error("rate limited")]
    RateLimited,

    /// A non-2xx response carrying a structured error envelope.
    #[error("HTTP {status}: {kind}: {message}")]
    Api {
        status: u16,
        kind: String,
        message: String,
        param: Option<String>,
    },

    /// A non-2xx response without a structured error envelope.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be decoded into the declared type.
    #[error("deserialization failed: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// The wire pairs could not be rendered as form data.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The host failed to execute the request.
    #[error("transport failed: {0}")]
    Transport(#[from] TransportError),

    #[error("config error: {0}")]
    Config(#[from] ::config::ConfigError),
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    message: String,
    param: Option<String>,
}

impl ApiError {
    /// Map a non-success status and body to the matching variant.
    pub(crate) fn from_status(status: u16, body: &str) -> Self {
        match status {
            401 => return ApiError::Unauthorized,
            404 => return ApiError::NotFound,
            429 => return ApiError::RateLimited,
            _ => {}
        }
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(ErrorEnvelope { error }) => ApiError::Api {
                status,
                kind: error.kind,
                message: error.message,
                param: error.param,
            },
            Err(_) => ApiError::HttpError {
                status,
                body: body.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedicated_statuses_map_to_dedicated_variants() {
        assert!(matches!(ApiError::from_status(401, ""), ApiError::Unauthorized));
        assert!(matches!(ApiError::from_status(404, "{}"), ApiError::NotFound));
        assert!(matches!(ApiError::from_status(429, ""), ApiError::RateLimited));
    }

    #[test]
    fn error_envelope_is_decoded() {
        let body = r#"{"error":{"type":"invalid_request_error","message":"Missing amount","param":"amount"}}"#;
        match ApiError::from_status(400, body) {
            ApiError::Api {
                status,
                kind,
                message,
                param,
            } => {
                assert_eq!(status, 400);
                assert_eq!(kind, "invalid_request_error");
                assert_eq!(message, "Missing amount");
                assert_eq!(param.as_deref(), Some("amount"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unstructured_body_falls_back_to_http_error() {
        let err = ApiError::from_status(502, "bad gateway");
        assert!(matches!(err, ApiError::HttpError { status: 502, ref body } if body == "bad gateway"));
    }
}
