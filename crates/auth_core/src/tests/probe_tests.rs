use super::*;
use crate::AuthState;
use async_trait::async_trait;
use std::sync::Mutex;
use tokio::sync::watch;

struct ScriptedStore {
    outcome: fn() -> Result<SignInResult, AuthStoreError>,
    calls: Mutex<Vec<(String, String)>>,
    state: watch::Sender<AuthState>,
}

impl ScriptedStore {
    fn new(outcome: fn() -> Result<SignInResult, AuthStoreError>) -> Self {
        Self {
            outcome,
            calls: Mutex::new(Vec::new()),
            state: watch::channel(AuthState::default()).0,
        }
    }
}

#[async_trait]
impl AuthStore for ScriptedStore {
    async fn initialize(&self) {}

    async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SignInResult, AuthStoreError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push((email.to_string(), password.to_string()));
        (self.outcome)()
    }

    async fn sign_out(&self) -> Result<(), AuthStoreError> {
        Ok(())
    }

    fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }
}

#[tokio::test]
async fn reported_error_becomes_failure_message() {
    let store = ScriptedStore::new(|| Ok(SignInResult::failed("invalid credentials")));

    let message = run_login_probe(&store, "demo@example.com", "demo123456").await;

    assert_eq!(message, ResultMessage::Failed("invalid credentials".into()));
    let text = message.to_string();
    assert!(text.contains("invalid credentials"));
    assert!(text.contains(FAILURE_MARKER));
}

#[tokio::test]
async fn clean_result_is_exactly_the_success_marker() {
    let store = ScriptedStore::new(|| Ok(SignInResult::ok()));

    let message = run_login_probe(&store, "demo@example.com", "demo123456").await;

    assert_eq!(message.to_string(), SUCCESS_TEXT);
    assert!(!message.is_failure());
}

#[tokio::test]
async fn raised_error_becomes_exception_message() {
    let store =
        ScriptedStore::new(|| Err(AuthStoreError::Unavailable("network down".to_string())));

    let message = run_login_probe(&store, "demo@example.com", "demo123456").await;

    let text = message.to_string();
    assert!(matches!(message, ResultMessage::Exception(_)));
    assert!(text.contains("network down"));
    assert!(text.contains(FAILURE_MARKER));
}

#[tokio::test]
async fn raw_field_values_are_forwarded_unvalidated() {
    let store = ScriptedStore::new(|| Ok(SignInResult::ok()));

    run_login_probe(&store, "", " pass word ").await;

    let calls = store.calls.lock().expect("calls lock");
    assert_eq!(calls.as_slice(), &[(String::new(), " pass word ".to_string())]);
}

#[test]
fn message_shapes() {
    assert_eq!(ResultMessage::default().to_string(), "");
    assert!(!ResultMessage::Empty.is_terminal());
    assert_eq!(ResultMessage::InProgress.to_string(), IN_PROGRESS_TEXT);
    assert!(!ResultMessage::InProgress.is_terminal());
    assert!(ResultMessage::Succeeded.is_terminal());
    assert_eq!(
        ResultMessage::Failed("x".into()).to_string(),
        "❌ Login failed: x"
    );
    assert_eq!(
        ResultMessage::Exception("y".into()).to_string(),
        "❌ Exception: y"
    );
}
