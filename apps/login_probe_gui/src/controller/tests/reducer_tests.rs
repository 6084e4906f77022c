use super::*;
use crate::controller::events::UiErrorContext;

fn fresh(policy: OverlapPolicy) -> LoginTestState {
    LoginTestState::new(policy, AuthSnapshot::default())
}

#[test]
fn starts_with_demo_credentials_and_empty_result() {
    let state = fresh(OverlapPolicy::default());
    assert_eq!(state.email(), "demo@example.com");
    assert_eq!(state.password(), "demo123456");
    assert_eq!(state.result(), &ResultMessage::Empty);
}

#[test]
fn mount_initializes_once() {
    let mut state = fresh(OverlapPolicy::default());
    assert_eq!(state.mount(), Some(BackendCommand::Initialize));
    for _ in 0..10 {
        assert_eq!(state.mount(), None);
    }
}

#[test]
fn field_edits_are_echoed_and_forwarded_verbatim() {
    let mut state = fresh(OverlapPolicy::default());
    state.set_email("  not-an-email ");
    state.set_password("");
    assert_eq!(state.email(), "  not-an-email ");

    let (attempt, cmd) = state.begin_test();
    assert_eq!(attempt, AttemptId(1));
    assert_eq!(
        cmd,
        BackendCommand::SignIn {
            attempt: AttemptId(1),
            email: "  not-an-email ".into(),
            password: String::new(),
        }
    );
}

#[test]
fn test_run_shows_in_progress_before_settling() {
    let mut state = fresh(OverlapPolicy::default());
    state.apply(UiEvent::SignInSettled {
        attempt: AttemptId(0),
        message: ResultMessage::Succeeded,
    });

    let attempt = state.begin_test().0;
    assert_eq!(state.result(), &ResultMessage::InProgress);
    assert_eq!(state.in_flight(), 1);

    state.apply(UiEvent::SignInSettled {
        attempt,
        message: ResultMessage::Failed("invalid credentials".into()),
    });
    assert_eq!(
        state.result(),
        &ResultMessage::Failed("invalid credentials".into())
    );
    assert_eq!(state.in_flight(), 0);
}

#[test]
fn latest_attempt_wins_ignores_late_superseded_outcome() {
    let mut state = fresh(OverlapPolicy::LatestAttemptWins);
    let first = state.begin_test().0;
    let second = state.begin_test().0;

    state.apply(UiEvent::SignInSettled {
        attempt: second,
        message: ResultMessage::Succeeded,
    });
    state.apply(UiEvent::SignInSettled {
        attempt: first,
        message: ResultMessage::Exception("network down".into()),
    });

    assert_eq!(state.result(), &ResultMessage::Succeeded);
    assert_eq!(state.in_flight(), 0);
}

#[test]
fn superseded_outcome_does_not_end_in_progress_display() {
    let mut state = fresh(OverlapPolicy::LatestAttemptWins);
    let first = state.begin_test().0;
    let _second = state.begin_test();

    state.apply(UiEvent::SignInSettled {
        attempt: first,
        message: ResultMessage::Succeeded,
    });

    assert_eq!(state.result(), &ResultMessage::InProgress);
}

#[test]
fn last_settled_wins_reproduces_race() {
    let mut state = fresh(OverlapPolicy::LastSettledWins);
    let first = state.begin_test().0;
    let second = state.begin_test().0;

    state.apply(UiEvent::SignInSettled {
        attempt: second,
        message: ResultMessage::Succeeded,
    });
    state.apply(UiEvent::SignInSettled {
        attempt: first,
        message: ResultMessage::Failed("invalid credentials".into()),
    });

    assert_eq!(
        state.result(),
        &ResultMessage::Failed("invalid credentials".into())
    );
}

#[test]
fn abandoned_attempt_settles_as_exception() {
    let mut state = fresh(OverlapPolicy::default());
    let attempt = state.begin_test().0;

    state.abandon_attempt(attempt, "queue closed");

    assert_eq!(
        state.result(),
        &ResultMessage::Exception("queue closed".into())
    );
}

#[test]
fn snapshot_and_status_events_update_view() {
    let mut state = fresh(OverlapPolicy::default());
    let snapshot = AuthSnapshot {
        has_user: true,
        user_id: Some("u-1".into()),
        email: Some("demo@example.com".into()),
        loading: false,
        initialized: true,
        is_admin: false,
    };
    state.apply(UiEvent::SnapshotChanged(snapshot.clone()));
    state.apply(UiEvent::Info("Backend worker ready".into()));

    assert_eq!(state.snapshot(), &snapshot);
    assert_eq!(state.status(), "Backend worker ready");

    state.apply(UiEvent::Error(UiError::from_message(
        UiErrorContext::BackendStartup,
        "backend worker startup failure: failed to build runtime: boom",
    )));
    let banner = state.banner().expect("banner");
    assert_eq!(banner.context(), UiErrorContext::BackendStartup);
    assert_eq!(banner.context().label(), "backend startup");
    assert!(state.status().contains("startup failure"));
}
