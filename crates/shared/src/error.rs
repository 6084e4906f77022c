use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidCredentials,
    EmailNotConfirmed,
    RateLimited,
    Network,
    Unauthorized,
    Internal,
}

impl ErrorCode {
    /// Classifies a raw auth server message the way the hosted service words it.
    pub fn classify(status: u16, message: &str) -> Self {
        if message.contains("Invalid login credentials") {
            ErrorCode::InvalidCredentials
        } else if message.contains("Email not confirmed") {
            ErrorCode::EmailNotConfirmed
        } else if status == 429 || message.contains("Too many requests") {
            ErrorCode::RateLimited
        } else if message.contains("Network") {
            ErrorCode::Network
        } else if status == 401 || status == 403 {
            ErrorCode::Unauthorized
        } else {
            ErrorCode::Internal
        }
    }

    pub fn user_message(self) -> &'static str {
        match self {
            ErrorCode::InvalidCredentials => {
                "Email is not registered or the password does not match"
            }
            ErrorCode::EmailNotConfirmed => {
                "Email verification is not complete. Please check your inbox"
            }
            ErrorCode::RateLimited => "Too many sign-in attempts. Please try again shortly",
            ErrorCode::Network => "Please check your network connection",
            ErrorCode::Unauthorized | ErrorCode::Internal => {
                "A server error occurred. Please try again shortly"
            }
        }
    }
}

/// Error body returned by the auth server. Different endpoints populate
/// different fields, so every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiError {
    pub fn best_message(&self) -> String {
        self.error_description
            .as_deref()
            .or(self.msg.as_deref())
            .or(self.message.as_deref())
            .or(self.error.as_deref())
            .unwrap_or("unknown error")
            .to_string()
    }
}

#[derive(Debug, Error)]
#[error("{code:?} (status {status}): {message}")]
pub struct ApiException {
    pub code: ErrorCode,
    pub status: u16,
    pub message: String,
}

impl ApiException {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            code: ErrorCode::classify(status, &message),
            status,
            message,
        }
    }

    pub fn from_body(status: u16, body: &ApiError) -> Self {
        Self::new(status, body.best_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_auth_server_messages() {
        assert_eq!(
            ErrorCode::classify(400, "Invalid login credentials"),
            ErrorCode::InvalidCredentials
        );
        assert_eq!(
            ErrorCode::classify(400, "Email not confirmed"),
            ErrorCode::EmailNotConfirmed
        );
        assert_eq!(ErrorCode::classify(429, "slow down"), ErrorCode::RateLimited);
        assert_eq!(ErrorCode::classify(500, "boom"), ErrorCode::Internal);
    }

    #[test]
    fn best_message_prefers_description() {
        let body = ApiError {
            error: Some("invalid_grant".into()),
            error_description: Some("Invalid login credentials".into()),
            ..Default::default()
        };
        assert_eq!(body.best_message(), "Invalid login credentials");
        let exc = ApiException::from_body(400, &body);
        assert_eq!(exc.code, ErrorCode::InvalidCredentials);
    }
}
