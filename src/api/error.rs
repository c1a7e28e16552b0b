//! Error handling for the API module

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure: connection refused, timeout, TLS, etc.
    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP error with status {status}: {message}")]
    Http { status: u16, message: String },

    /// The body was not the JSON we expected.
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failure body the API sends alongside non-success statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub async fn from_response(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read response text".to_string());

        ApiError::Http {
            status,
            message: Self::message_from_body(&body),
        }
    }

    /// Prefer the `error` field of a JSON body, fall back to the raw text.
    pub fn message_from_body(body: &str) -> String {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => parsed.error,
            Err(_) => body.trim().to_string(),
        }
    }

    /// Short text for an inline placeholder.
    pub fn summary(&self) -> String {
        match self {
            ApiError::Reqwest(e) if e.is_timeout() => "Request timed out".to_string(),
            ApiError::Reqwest(e) if e.is_connect() => "API unreachable".to_string(),
            ApiError::Reqwest(_) => "Network error".to_string(),
            ApiError::Http { status, message } if message.is_empty() => {
                format!("HTTP {status}")
            }
            ApiError::Http { status, message } => format!("HTTP {status}: {message}"),
            ApiError::Decode(_) => "Malformed response".to_string(),
        }
    }
}
