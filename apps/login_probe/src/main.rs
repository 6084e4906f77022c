use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use auth_core::{
    config::load_config, run_login_probe, AuthSnapshot, AuthStore, ConfigOverrides,
    ResultMessage, SupabaseAuthStore,
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Headless sign-in probe against a hosted auth store")]
struct Args {
    #[arg(long, default_value = "demo@example.com")]
    email: String,
    #[arg(long, default_value = "demo123456")]
    password: String,
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
    /// Sign out again once the probe has settled.
    #[arg(long)]
    sign_out_after: bool,
}

fn print_snapshot(label: &str, store: &dyn AuthStore) {
    println!("{label}:");
    println!("{}", AuthSnapshot::from(&store.state()).to_pretty_json());
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
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
    let store = SupabaseAuthStore::new(config);

    store.initialize().await;
    print_snapshot("AuthStore state", &store);

    println!("Result: {}", ResultMessage::InProgress);
    let message = run_login_probe(&store, &args.email, &args.password).await;
    println!("Result: {message}");
    print_snapshot("AuthStore state after sign-in", &store);

    if args.sign_out_after {
        store.sign_out().await.context("sign out failed")?;
        print_snapshot("AuthStore state after sign-out", &store);
    }

    Ok(if message.is_failure() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
