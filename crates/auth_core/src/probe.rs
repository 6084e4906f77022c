//! The sign-in probe: one attempt against an [`AuthStore`], reduced to a
//! message a person can read.

use std::fmt;

use tracing::warn;

use crate::{error::AuthStoreError, AuthStore, SignInResult};

pub const IN_PROGRESS_TEXT: &str = "Testing...";
pub const SUCCESS_TEXT: &str = "✅ Login succeeded!";
pub const FAILURE_MARKER: &str = "❌";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResultMessage {
    #[default]
    Empty,
    InProgress,
    Succeeded,
    /// The store answered with a reported error.
    Failed(String),
    /// The store call itself raised.
    Exception(String),
}

impl ResultMessage {
    pub fn settle(outcome: Result<SignInResult, AuthStoreError>) -> Self {
        match outcome {
            Ok(SignInResult {
                error: Some(description),
            }) => ResultMessage::Failed(description),
            Ok(SignInResult { error: None }) => ResultMessage::Succeeded,
            Err(err) => ResultMessage::Exception(err.to_string()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ResultMessage::Succeeded | ResultMessage::Failed(_) | ResultMessage::Exception(_)
        )
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ResultMessage::Failed(_) | ResultMessage::Exception(_))
    }
}

impl fmt::Display for ResultMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultMessage::Empty => Ok(()),
            ResultMessage::InProgress => f.write_str(IN_PROGRESS_TEXT),
            ResultMessage::Succeeded => f.write_str(SUCCESS_TEXT),
            ResultMessage::Failed(description) => {
                write!(f, "{FAILURE_MARKER} Login failed: {description}")
            }
            ResultMessage::Exception(description) => {
                write!(f, "{FAILURE_MARKER} Exception: {description}")
            }
        }
    }
}

/// Calls `sign_in` with the raw field values and maps the outcome. Callers
/// show [`ResultMessage::InProgress`] before awaiting this.
pub async fn run_login_probe(store: &dyn AuthStore, email: &str, password: &str) -> ResultMessage {
    warn!(email, "login probe started");
    let outcome = store.sign_in(email, password).await;
    match &outcome {
        Ok(result) => warn!(error = ?result.error, "login probe result"),
        Err(err) => tracing::error!("login probe raised: {err}"),
    }
    ResultMessage::settle(outcome)
}

#[cfg(test)]
#[path = "tests/probe_tests.rs"]
mod tests;
