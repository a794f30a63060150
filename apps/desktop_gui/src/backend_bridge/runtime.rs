//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::MeditationService;
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

/// Spawns the backend worker. Commands are handled one at a time, so each
/// generation request runs to completion before the next is picked up.
pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    service: Arc<dyn MeditationService>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Info(format!(
                    "backend worker startup failure: failed to build runtime: {err}"
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::GenerateMeditation { request } => {
                        tracing::info!("backend: generate_meditation");
                        let event = match service.generate(&request).await {
                            Ok(result) => UiEvent::GenerationSucceeded(result),
                            Err(err) => {
                                tracing::error!("backend: generate_meditation failed: {err}");
                                UiEvent::GenerationFailed(err)
                            }
                        };
                        if ui_tx.send(event).is_err() {
                            tracing::warn!("ui event channel closed; stopping backend worker");
                            break;
                        }
                    }
                }
            }
        });
    })
}
