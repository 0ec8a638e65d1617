use serde::Deserialize;
use std::fmt;

/// Maximum number of error body characters surfaced to the user.
const MAX_ERROR_CHARS: usize = 200;

/// Error kind reported by the backend when the verification code is past its TTL.
pub const CODE_EXPIRED: &str = "CODE_EXPIRED";

/// Error payload returned by the backend on non-2xx responses. Every field is
/// optional; bodies that are not JSON end up as a sanitized `message`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub remaining_attempts: Option<u32>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// Decodes a raw response body, falling back to the trimmed text as message.
    #[must_use]
    pub fn from_text(body: &str) -> Self {
        if let Ok(parsed) = serde_json::from_str::<Self>(body) {
            return parsed;
        }
        Self {
            message: sanitize_body(body),
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug)]
pub enum ApiError {
    Config(String),
    Network(String),
    Timeout(String),
    Http { status: u16, body: ErrorBody },
    Parse(String),
    Serialization(String),
}

impl ApiError {
    /// Server-reported attempts left, when the backend included them.
    #[must_use]
    pub fn remaining_attempts(&self) -> Option<u32> {
        match self {
            Self::Http { body, .. } => body.remaining_attempts,
            _ => None,
        }
    }

    /// Machine-readable error kind such as `CODE_EXPIRED`.
    #[must_use]
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::Http { body, .. } => body.error.as_deref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_code_expired(&self) -> bool {
        self.error_code() == Some(CODE_EXPIRED)
    }

    /// Message to show inline: the backend message when present, otherwise the
    /// transport description, otherwise `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        let message = match self {
            Self::Http { body, .. } => body.message.clone(),
            Self::Network(message) | Self::Timeout(message) => Some(message.clone()),
            Self::Config(_) | Self::Parse(_) | Self::Serialization(_) => None,
        };
        message
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Config(message) => write!(formatter, "Config error: {message}"),
            ApiError::Network(message) => write!(formatter, "Network error: {message}"),
            ApiError::Timeout(message) => write!(formatter, "Timeout: {message}"),
            ApiError::Http { status, body } => {
                let message = body.message.as_deref().unwrap_or("Request failed.");
                write!(formatter, "Request failed ({status}): {message}")
            }
            ApiError::Parse(message) => write!(formatter, "Response error: {message}"),
            ApiError::Serialization(message) => {
                write!(formatter, "Request error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Trims and truncates error bodies; empty bodies yield `None`.
fn sanitize_body(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().take(MAX_ERROR_CHARS).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_decodes_verification_payload() {
        let body = ErrorBody::from_text(
            r#"{"message":"Invalid code","remainingAttempts":2,"error":"INVALID_CODE"}"#,
        );
        assert_eq!(body.message.as_deref(), Some("Invalid code"));
        assert_eq!(body.remaining_attempts, Some(2));
        assert_eq!(body.error.as_deref(), Some("INVALID_CODE"));
    }

    #[test]
    fn error_body_falls_back_to_plain_text() {
        let body = ErrorBody::from_text("  Bad Gateway \n");
        assert_eq!(body.message.as_deref(), Some("Bad Gateway"));
        assert_eq!(body.remaining_attempts, None);

        let long = "x".repeat(500);
        let body = ErrorBody::from_text(&long);
        assert_eq!(body.message.map(|m| m.len()), Some(MAX_ERROR_CHARS));

        assert_eq!(ErrorBody::from_text("   "), ErrorBody::default());
    }

    #[test]
    fn code_expired_is_detected() {
        let err = ApiError::Http {
            status: 400,
            body: ErrorBody {
                message: Some("Code expired".to_string()),
                remaining_attempts: None,
                error: Some(CODE_EXPIRED.to_string()),
            },
        };
        assert!(err.is_code_expired());
        assert!(!ApiError::Network("down".to_string()).is_code_expired());
    }

    #[test]
    fn user_message_prefers_backend_message() {
        let err = ApiError::Http {
            status: 400,
            body: ErrorBody {
                message: Some("Invalid code".to_string()),
                ..ErrorBody::default()
            },
        };
        assert_eq!(err.user_message("Verification failed"), "Invalid code");

        let err = ApiError::Http {
            status: 500,
            body: ErrorBody::default(),
        };
        assert_eq!(err.user_message("Verification failed"), "Verification failed");

        let err = ApiError::Parse("bad json".to_string());
        assert_eq!(err.user_message("Failed to resend code"), "Failed to resend code");
    }

    #[test]
    fn display_includes_status() {
        let err = ApiError::Http {
            status: 429,
            body: ErrorBody {
                message: Some("Too many requests".to_string()),
                ..ErrorBody::default()
            },
        };
        assert_eq!(err.to_string(), "Request failed (429): Too many requests");
    }
}
