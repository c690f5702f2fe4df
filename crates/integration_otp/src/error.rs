//! OTP client error types

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use crate::plan_response::PlannerError;

/// Body of a failed call, decoded as far as it allows
///
/// Error bodies are never required to match the success shape; whatever
/// cannot be decoded falls through to a less specific variant.
#[derive(Debug, Clone, PartialEq)]
pub enum FailurePayload {
    /// OTP planner error envelope (`{"error": {...}}`)
    Planner(PlannerError),
    /// Any other JSON document
    Json(serde_json::Value),
    /// Non-JSON text
    Text(String),
    /// No body at all
    Empty,
}

impl FailurePayload {
    /// Decode a raw error body without ever failing
    #[must_use]
    pub fn from_body(body: &str) -> Self {
        #[derive(Deserialize)]
        struct Envelope {
            error: PlannerError,
        }

        if body.trim().is_empty() {
            return Self::Empty;
        }

        match serde_json::from_str::<serde_json::Value>(body) {
            Ok(value) => match Envelope::deserialize(&value) {
                Ok(envelope) => Self::Planner(envelope.error),
                Err(_) => Self::Json(value),
            },
            Err(_) => Self::Text(body.to_string()),
        }
    }
}

impl fmt::Display for FailurePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Planner(err) => write!(f, "{err}"),
            Self::Json(value) => write!(f, "{value}"),
            Self::Text(text) => write!(f, "{text}"),
            Self::Empty => write!(f, "no body"),
        }
    }
}

/// Errors that can occur while talking to OpenTripPlanner
#[derive(Debug, Error)]
pub enum OtpError {
    /// A required request parameter is missing; no call was made
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    /// The search rectangle is missing a coordinate; no call was made
    #[error("Incomplete bounds: all four rectangle coordinates are required")]
    IncompleteBounds,

    /// Connection to the OTP server failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The server answered with a non-success status
    #[error("Request failed with HTTP {status}: {payload}")]
    RequestFailed {
        /// HTTP status code
        status: u16,
        /// Decoded error body
        payload: FailurePayload,
    },

    /// A success response was not JSON
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },
}

impl OtpError {
    /// Returns true if re-submitting the same request may succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::ConnectionFailed(_) | Self::Timeout { .. } => true,
            Self::RequestFailed { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Returns true if the request was rejected before any call was made
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::MissingParameter(_) | Self::IncompleteBounds)
    }
}
