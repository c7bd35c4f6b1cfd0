//! Errors raised by [`HttpGatewayClient`](crate::HttpGatewayClient).
//!
//! Every variant carries a `context` naming the call that failed
//! (e.g. `"POST /transactions"`). Unsuccessful gateway results (HTTP 422) are
//! not errors and never show up here.

use reqwest::StatusCode;

/// Errors that can occur while talking to the gateway over HTTP.
#[derive(Debug, thiserror::Error)]
pub enum HttpGatewayError {
    /// URL parse error.
    #[error("URL parse error: {context}: {source}")]
    UrlParse {
        /// Human-readable context.
        context: &'static str,
        /// The underlying parse error.
        #[source]
        source: url::ParseError,
    },

    /// The base URL cannot carry path segments (e.g. `mailto:`).
    #[error("base URL cannot be used for API calls: {0}")]
    InvalidBaseUrl(String),

    /// HTTP transport error.
    #[error("HTTP error: {context}: {source}")]
    Http {
        /// Human-readable context.
        context: &'static str,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// Failed to read the response body.
    #[error("Failed to read response body as text: {context}: {source}")]
    ResponseBodyRead {
        /// Human-readable context.
        context: &'static str,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// Failed to serialize the request payload.
    #[error("Failed to serialize JSON: {context}: {source}")]
    JsonSerialization {
        /// Human-readable context.
        context: &'static str,
        /// The underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// Failed to deserialize the response body.
    #[error("Failed to deserialize JSON: {context}: {source}")]
    JsonDeserialization {
        /// Human-readable context.
        context: &'static str,
        /// The underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// The response body lacked the expected root key.
    #[error("Response is missing {root:?}: {context}")]
    MissingRoot {
        /// Human-readable context.
        context: &'static str,
        /// The expected root key.
        root: &'static str,
    },

    /// The payload lacks a field the route needs.
    #[error("Missing {field}: {context}")]
    MissingField {
        /// Human-readable context.
        context: &'static str,
        /// Name of the missing field.
        field: &'static str,
    },

    /// HTTP 401: the API keys were rejected.
    #[error("Authentication failed: {context}")]
    Authentication {
        /// Human-readable context.
        context: &'static str,
    },

    /// HTTP 403: the API keys lack permission for the call.
    #[error("Not authorized: {context}")]
    Authorization {
        /// Human-readable context.
        context: &'static str,
    },

    /// HTTP 404: the requested resource does not exist.
    #[error("Not found: {context}")]
    NotFound {
        /// Human-readable context.
        context: &'static str,
    },

    /// HTTP 429: rate limited.
    #[error("Too many requests: {context}")]
    TooManyRequests {
        /// Human-readable context.
        context: &'static str,
    },

    /// HTTP 503: the gateway is down for maintenance.
    #[error("Service unavailable: {context}")]
    ServiceUnavailable {
        /// Human-readable context.
        context: &'static str,
    },

    /// Any other unexpected HTTP status.
    #[error("Unexpected HTTP status {status}: {context}: {body}")]
    HttpStatus {
        /// Human-readable context.
        context: &'static str,
        /// The HTTP status code.
        status: StatusCode,
        /// The response body.
        body: String,
    },
}

impl HttpGatewayError {
    /// Maps a non-success status to its error variant.
    #[must_use]
    pub fn from_status(context: &'static str, status: StatusCode, body: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => Self::Authentication { context },
            StatusCode::FORBIDDEN => Self::Authorization { context },
            StatusCode::NOT_FOUND => Self::NotFound { context },
            StatusCode::TOO_MANY_REQUESTS => Self::TooManyRequests { context },
            StatusCode::SERVICE_UNAVAILABLE => Self::ServiceUnavailable { context },
            _ => Self::HttpStatus {
                context,
                status,
                body,
            },
        }
    }

    /// Returns `true` for [`NotFound`](Self::NotFound).
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let ctx = "GET /plans";
        assert!(matches!(
            HttpGatewayError::from_status(ctx, StatusCode::UNAUTHORIZED, String::new()),
            HttpGatewayError::Authentication { .. }
        ));
        assert!(matches!(
            HttpGatewayError::from_status(ctx, StatusCode::FORBIDDEN, String::new()),
            HttpGatewayError::Authorization { .. }
        ));
        assert!(
            HttpGatewayError::from_status(ctx, StatusCode::NOT_FOUND, String::new()).is_not_found()
        );
        assert!(matches!(
            HttpGatewayError::from_status(ctx, StatusCode::TOO_MANY_REQUESTS, String::new()),
            HttpGatewayError::TooManyRequests { .. }
        ));
        assert!(matches!(
            HttpGatewayError::from_status(ctx, StatusCode::SERVICE_UNAVAILABLE, String::new()),
            HttpGatewayError::ServiceUnavailable { .. }
        ));
        let other =
            HttpGatewayError::from_status(ctx, StatusCode::BAD_GATEWAY, "upstream".to_owned());
        assert_eq!(
            other.to_string(),
            "Unexpected HTTP status 502 Bad Gateway: GET /plans: upstream"
        );
    }
}
