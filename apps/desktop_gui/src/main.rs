use std::sync::Arc;

mod backend_bridge;
mod controller;
mod ui;

use anyhow::Context;
use clap::Parser;
use client_core::{
    config::{load_settings, normalize_server_url},
    MeditationClient,
};
use crossbeam_channel::bounded;
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::{MeditationApp, StartupConfig};

#[derive(Parser, Debug)]
#[command(about = "Generate a personalised guided meditation")]
struct Args {
    /// Base URL of the meditation backend. Overrides meditate.toml and env.
    #[arg(long)]
    server_url: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(server_url) = args.server_url {
        settings.server_url = normalize_server_url(&server_url);
    }
    tracing::info!(server_url = %settings.server_url, "starting meditation desktop gui");

    let client = MeditationClient::new(&settings.server_url)
        .with_context(|| format!("invalid server url '{}'", settings.server_url))?;
    let startup = StartupConfig {
        server_url: client.server_url().clone(),
    };

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(16);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(64);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, Arc::new(client));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Meditate for Me")
            .with_inner_size([860.0, 900.0])
            .with_min_inner_size([560.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Meditate for Me",
        options,
        Box::new(|_cc| Ok(Box::new(MeditationApp::bootstrap(cmd_tx, ui_rx, startup)))),
    )
    .map_err(|err| anyhow::anyhow!("desktop gui exited with error: {err}"))
}
