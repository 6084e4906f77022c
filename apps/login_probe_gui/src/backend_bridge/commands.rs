//! Backend commands queued from UI to backend worker.

use crate::controller::reducer::AttemptId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    Initialize,
    SignIn {
        attempt: AttemptId,
        email: String,
        password: String,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Initialize => "initialize",
            BackendCommand::SignIn { .. } => "sign_in",
        }
    }
}
