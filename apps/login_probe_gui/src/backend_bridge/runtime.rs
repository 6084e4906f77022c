//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use auth_core::{run_login_probe, AuthSnapshot, AuthStore, SharedAuthStore};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

/// Called after every event pushed to the UI so the frame loop wakes up.
pub type RepaintHook = Arc<dyn Fn() + Send + Sync>;

#[derive(Clone)]
struct UiSink {
    tx: Sender<UiEvent>,
    repaint: RepaintHook,
}

impl UiSink {
    fn send(&self, event: UiEvent) {
        if self.tx.try_send(event).is_err() {
            tracing::warn!("ui event queue unavailable; dropping backend event");
        }
        (self.repaint)();
    }

    /// Waits for queue room instead of dropping. Only for events the view
    /// cannot recover without.
    fn deliver(&self, event: UiEvent) {
        if self.tx.send(event).is_err() {
            tracing::warn!("ui event queue closed; dropping backend event");
        }
        (self.repaint)();
    }
}

pub fn launch(
    store: SharedAuthStore,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    repaint: RepaintHook,
) -> thread::JoinHandle<()> {
    let sink = UiSink {
        tx: ui_tx,
        repaint,
    };
    thread::spawn(move || {
        sink.send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                sink.send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                return;
            }
        };

        runtime.block_on(async move {
            let mut state_rx = store.subscribe();
            let snapshot_sink = sink.clone();
            tokio::spawn(async move {
                let snapshot = AuthSnapshot::from(&*state_rx.borrow_and_update());
                snapshot_sink.send(UiEvent::SnapshotChanged(snapshot));
                while state_rx.changed().await.is_ok() {
                    let snapshot = AuthSnapshot::from(&*state_rx.borrow_and_update());
                    snapshot_sink.send(UiEvent::SnapshotChanged(snapshot));
                }
            });

            sink.send(UiEvent::Info("Backend worker ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::Initialize => {
                        tracing::info!("backend: initialize");
                        let store = store.clone();
                        tokio::spawn(async move {
                            store.initialize().await;
                        });
                    }
                    BackendCommand::SignIn {
                        attempt,
                        email,
                        password,
                    } => {
                        tracing::info!(attempt = attempt.0, "backend: sign_in");
                        let store = store.clone();
                        let sink = sink.clone();
                        tokio::spawn(async move {
                            let message = run_login_probe(store.as_ref(), &email, &password).await;
                            tracing::info!(attempt = attempt.0, %message, "backend: sign_in settled");
                            tokio::task::block_in_place(|| {
                                sink.deliver(UiEvent::SignInSettled { attempt, message })
                            });
                        });
                    }
                }
            }
            tracing::info!("ui command queue closed; backend worker stopping");
        });
    })
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
