//! View state of the login probe page and its transitions.

use auth_core::{AuthSnapshot, ResultMessage};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiEvent};

pub const DEFAULT_EMAIL: &str = "demo@example.com";
pub const DEFAULT_PASSWORD: &str = "demo123456";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttemptId(pub u64);

/// What to do with the outcome of an attempt that a newer attempt has
/// already replaced on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapPolicy {
    /// Only the most recently started attempt may write the result.
    #[default]
    LatestAttemptWins,
    /// Whichever attempt settles last writes the result.
    LastSettledWins,
}

#[derive(Debug, Clone)]
pub struct LoginTestState {
    email: String,
    password: String,
    result: ResultMessage,
    snapshot: AuthSnapshot,
    policy: OverlapPolicy,
    mounted: bool,
    next_attempt: u64,
    latest_attempt: Option<AttemptId>,
    in_flight: usize,
    status: String,
    banner: Option<UiError>,
}

impl LoginTestState {
    pub fn new(policy: OverlapPolicy, snapshot: AuthSnapshot) -> Self {
        Self {
            email: DEFAULT_EMAIL.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            result: ResultMessage::Empty,
            snapshot,
            policy,
            mounted: false,
            next_attempt: 1,
            latest_attempt: None,
            in_flight: 0,
            status: "Backend worker not started".to_string(),
            banner: None,
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn result(&self) -> &ResultMessage {
        &self.result
    }

    pub fn snapshot(&self) -> &AuthSnapshot {
        &self.snapshot
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn banner(&self) -> Option<&UiError> {
        self.banner.as_ref()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
    }

    pub fn show_error(&mut self, error: UiError) {
        self.status = error.message().to_string();
        self.banner = Some(error);
    }

    /// First display of the page. Yields the initialize command once per
    /// state instance; later calls are no-ops.
    pub fn mount(&mut self) -> Option<BackendCommand> {
        if self.mounted {
            return None;
        }
        self.mounted = true;
        Some(BackendCommand::Initialize)
    }

    /// Starts a test run with the current field values. The result reads
    /// "in progress" from this call until the attempt settles.
    pub fn begin_test(&mut self) -> (AttemptId, BackendCommand) {
        let attempt = AttemptId(self.next_attempt);
        self.next_attempt += 1;
        self.latest_attempt = Some(attempt);
        self.in_flight += 1;
        self.result = ResultMessage::InProgress;
        let cmd = BackendCommand::SignIn {
            attempt,
            email: self.email.clone(),
            password: self.password.clone(),
        };
        (attempt, cmd)
    }

    /// Settles an attempt whose command never reached the backend.
    pub fn abandon_attempt(&mut self, attempt: AttemptId, reason: impl Into<String>) {
        self.settle(attempt, ResultMessage::Exception(reason.into()));
    }

    pub fn apply(&mut self, event: UiEvent) {
        match event {
            UiEvent::Info(message) => self.status = message,
            UiEvent::SnapshotChanged(snapshot) => self.snapshot = snapshot,
            UiEvent::SignInSettled { attempt, message } => self.settle(attempt, message),
            UiEvent::Error(error) => self.show_error(error),
        }
    }

    fn settle(&mut self, attempt: AttemptId, message: ResultMessage) {
        self.in_flight = self.in_flight.saturating_sub(1);
        let displayed = match self.policy {
            OverlapPolicy::LatestAttemptWins => self.latest_attempt == Some(attempt),
            OverlapPolicy::LastSettledWins => true,
        };
        if displayed {
            self.result = message;
        } else {
            tracing::debug!(
                attempt = attempt.0,
                latest = self.latest_attempt.map(|a| a.0),
                "dropping outcome of superseded attempt"
            );
        }
    }
}

#[cfg(test)]
#[path = "tests/reducer_tests.rs"]
mod tests;
