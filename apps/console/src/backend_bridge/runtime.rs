//! Backend worker: a thread owning a tokio runtime that executes queued commands
//! and reports each completion back to the controller.

use std::{
    sync::Arc,
    thread::{self, JoinHandle},
};

use client_core::{AssistantApi, CancelSignal, ClientError};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use shared::domain::Feature;
use tokio::task::JoinSet;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorCategory, UiEvent, WORKER_GONE_MESSAGE};

pub fn launch(
    api: Arc<dyn AssistantApi>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    cancel: CancelSignal,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                // Fail every queued command so the controller never waits on it.
                while let Ok(cmd) = cmd_rx.recv() {
                    let feature = cmd.feature();
                    emit(
                        &ui_tx,
                        UiEvent::RequestFailed {
                            feature,
                            error: UiError::new(
                                UiErrorCategory::Queue,
                                feature,
                                WORKER_GONE_MESSAGE,
                            ),
                        },
                    );
                }
                return;
            }
        };

        runtime.block_on(async move {
            tracing::info!("backend worker ready");
            let mut tasks = JoinSet::new();
            while let Ok(cmd) = cmd_rx.recv() {
                tracing::debug!(command = cmd.name(), "backend command received");
                let api = Arc::clone(&api);
                let ui_tx = ui_tx.clone();
                let cancel = cancel.clone();
                tasks.spawn(async move {
                    let event = execute(api.as_ref(), cmd, &cancel).await;
                    emit(&ui_tx, event);
                });
                reap_finished(&mut tasks);
            }
            while tasks.join_next().await.is_some() {}
            tracing::info!("backend worker stopped");
        });
    })
}

/// Drops completed tasks so the set only holds requests still in flight.
fn reap_finished(tasks: &mut JoinSet<()>) -> usize {
    let mut reaped = 0;
    while let Some(outcome) = tasks.try_join_next() {
        if let Err(err) = outcome {
            tracing::error!("backend task failed: {err}");
        }
        reaped += 1;
    }
    reaped
}

fn emit(ui_tx: &Sender<UiEvent>, event: UiEvent) {
    let feature = event.feature();
    match ui_tx.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(_)) => {
            tracing::error!(feature = feature.as_str(), "ui event queue full; dropping completion")
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::debug!(feature = feature.as_str(), "ui event queue closed")
        }
    }
}

fn failed(feature: Feature, err: ClientError) -> UiEvent {
    tracing::error!(feature = feature.as_str(), "request failed: {err}");
    UiEvent::RequestFailed {
        feature,
        error: UiError::from_client_error(feature, &err),
    }
}

pub async fn execute(
    api: &dyn AssistantApi,
    cmd: BackendCommand,
    cancel: &CancelSignal,
) -> UiEvent {
    let feature = cmd.feature();
    match cmd {
        BackendCommand::SearchExperts { request } => {
            match api.search_experts(&request, cancel).await {
                Ok(result) => UiEvent::ExpertResult(result),
                Err(err) => failed(feature, err),
            }
        }
        BackendCommand::GenerateMarketingPlan { request } => {
            match api.generate_marketing_plan(&request, cancel).await {
                Ok(result) => UiEvent::MarketingPlan(result),
                Err(err) => failed(feature, err),
            }
        }
        BackendCommand::RefineMarketingPlan { request } => {
            match api.refine_marketing_plan(&request, cancel).await {
                Ok(reply) => UiEvent::RefinedPlan(reply),
                Err(err) => failed(feature, err),
            }
        }
        BackendCommand::AnalyzeInventory { request } => {
            match api.analyze_inventory(&request, cancel).await {
                Ok(result) => UiEvent::InventoryAnalysis(result),
                Err(err) => failed(feature, err),
            }
        }
        BackendCommand::SendChat { request, .. } => match api.chat(&request, cancel).await {
            Ok(reply) => UiEvent::ChatReply { feature, reply },
            Err(err) => failed(feature, err),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn completed_tasks_leave_the_set() {
        let mut tasks = JoinSet::new();
        for _ in 0..3 {
            tasks.spawn(async {});
        }

        let mut reaped = 0;
        for _ in 0..200 {
            reaped += reap_finished(&mut tasks);
            if reaped == 3 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        assert_eq!(reaped, 3);
        assert!(tasks.is_empty());
    }
}
