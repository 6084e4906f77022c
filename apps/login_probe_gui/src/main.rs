use std::{path::PathBuf, sync::Arc};

mod backend_bridge;
mod controller;
mod ui;

use anyhow::Context as _;
use auth_core::{
    config::load_config, AuthSnapshot, AuthStore, ConfigOverrides, SharedAuthStore,
    SupabaseAuthStore,
};
use clap::{Parser, ValueEnum};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::controller::reducer::{LoginTestState, OverlapPolicy};
use crate::ui::LoginProbeApp;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OverlapArg {
    Latest,
    LastSettled,
}

impl From<OverlapArg> for OverlapPolicy {
    fn from(value: OverlapArg) -> Self {
        match value {
            OverlapArg::Latest => OverlapPolicy::LatestAttemptWins,
            OverlapArg::LastSettled => OverlapPolicy::LastSettledWins,
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Interactive sign-in probe against a hosted auth store")]
struct Args {
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    supabase_url: Option<String>,
    #[arg(long)]
    anon_key: Option<String>,
    #[arg(long)]
    admin_email: Option<String>,
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// How outcomes of overlapping test runs are displayed.
    #[arg(long, value_enum, default_value = "latest")]
    overlap: OverlapArg,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let args = Args::parse();

    let config = load_config(ConfigOverrides {
        config_path: args.config,
        supabase_url: args.supabase_url,
        anon_key: args.anon_key,
        admin_email: args.admin_email,
        data_dir: args.data_dir,
    })
    .context("failed to load auth configuration")?;
    tracing::info!(url = %config.supabase_url, data_dir = %config.data_dir.display(), "auth store configured");

    let store: SharedAuthStore = Arc::new(SupabaseAuthStore::new(config));
    let initial = AuthSnapshot::from(&store.state());
    let policy = OverlapPolicy::from(args.overlap);

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Login Probe")
            .with_inner_size([640.0, 720.0])
            .with_min_inner_size([480.0, 520.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Login Probe",
        options,
        Box::new(move |cc| {
            let repaint_ctx = cc.egui_ctx.clone();
            backend_bridge::runtime::launch(
                store,
                cmd_rx,
                ui_tx,
                Arc::new(move || repaint_ctx.request_repaint()),
            );
            Ok(Box::new(LoginProbeApp::new(
                cmd_tx,
                ui_rx,
                LoginTestState::new(policy, initial),
            )))
        }),
    )
    .map_err(|err| anyhow::anyhow!("gui terminated with error: {err}"))
}
