//! Runs controller commands against a gateway.

use std::sync::Arc;

use shared::domain::RowNumber;
use tokio::{
    sync::mpsc,
    task::{JoinError, JoinHandle, JoinSet},
};
use tracing::{debug, info, warn};

use crate::{
    controller::{GatewayCommand, GatewayEvent, RegistrantController},
    error::ActionRejected,
    gateway::RegistrantGateway,
};

/// Performs exactly one gateway call for `command`.
pub async fn execute<G>(gateway: &G, command: GatewayCommand) -> GatewayEvent
where
    G: RegistrantGateway + ?Sized,
{
    match command {
        GatewayCommand::ListRegistrants => match gateway.list_registrants().await {
            Ok(records) => GatewayEvent::RegistrantsLoaded(records),
            Err(err) => GatewayEvent::LoadFailed {
                reason: err.to_string(),
            },
        },
        GatewayCommand::MarkAccredited { row_number } => {
            match gateway.mark_accredited(row_number).await {
                Ok(()) => GatewayEvent::AccreditSucceeded { row_number },
                Err(err) => GatewayEvent::AccreditFailed {
                    row_number,
                    reason: err.to_string(),
                },
            }
        }
    }
}

/// Background executor: every received command runs on its own task and its
/// outcome is sent back on `event_tx`. Once `cmd_rx` closes the worker waits
/// for every task it started, so an issued mark call always reports back.
pub fn spawn_worker<G>(
    gateway: Arc<G>,
    mut cmd_rx: mpsc::UnboundedReceiver<GatewayCommand>,
    event_tx: mpsc::UnboundedSender<GatewayEvent>,
) -> JoinHandle<()>
where
    G: RegistrantGateway + 'static,
{
    tokio::spawn(async move {
        let mut tasks = JoinSet::new();
        loop {
            tokio::select! {
                command = cmd_rx.recv() => {
                    let Some(command) = command else { break };
                    debug!(?command, "worker: dispatching gateway command");
                    let gateway = Arc::clone(&gateway);
                    let event_tx = event_tx.clone();
                    tasks.spawn(async move {
                        let event = execute(gateway.as_ref(), command).await;
                        // The receiver is gone only when the front end is shutting down.
                        let _ = event_tx.send(event);
                    });
                }
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    log_task_exit(joined);
                }
            }
        }

        info!(pending = tasks.len(), "worker: command channel closed");
        while let Some(joined) = tasks.join_next().await {
            log_task_exit(joined);
        }
    })
}

fn log_task_exit(joined: Result<(), JoinError>) {
    if let Err(err) = joined {
        warn!(%err, "worker: gateway task did not finish");
    }
}

/// Sequential driver for callers that simply await each step.
pub struct Portal<G> {
    controller: RegistrantController,
    gateway: G,
}

impl<G: RegistrantGateway> Portal<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            controller: RegistrantController::new(),
            gateway,
        }
    }

    pub async fn load(&mut self) {
        let command = self.controller.start();
        let event = execute(&self.gateway, command).await;
        self.controller.apply(event);
    }

    pub async fn confirm_accredit(&mut self) -> Result<(), ActionRejected> {
        let command = self.controller.confirm_accredit()?;
        let event = execute(&self.gateway, command).await;
        self.controller.apply(event);
        Ok(())
    }

    /// Opens the confirmation for `row_number` and confirms it immediately.
    pub async fn accredit(&mut self, row_number: RowNumber) -> Result<(), ActionRejected> {
        self.controller.request_accredit(row_number)?;
        self.confirm_accredit().await
    }

    pub fn controller(&self) -> &RegistrantController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut RegistrantController {
        &mut self.controller
    }
}

#[cfg(test)]
#[path = "tests/orchestration_tests.rs"]
mod tests;
