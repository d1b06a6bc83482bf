//! Top-level real-time engine that ties the hub and chat together.

use std::sync::Arc;

use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;
use tracing::info;

use sharehub_core::config::{ChatConfig, RealtimeConfig};
use sharehub_core::error::AppError;
use sharehub_service::chat::MessageLog;

use crate::chat::service::ChatService;
use crate::hub::BroadcastHub;
use crate::metrics::HubMetrics;

/// Central real-time engine owning the dispatch loop.
pub struct RealtimeEngine {
    /// Hub command submitter.
    pub hub: BroadcastHub,
    /// Chat operations.
    pub chat: Arc<ChatService>,
    /// Chat history.
    pub log: Arc<MessageLog>,
    /// Metrics collector.
    pub metrics: Arc<HubMetrics>,
    /// Shutdown signal sender.
    shutdown_tx: broadcast::Sender<()>,
    /// Dispatch loop task, taken on shutdown.
    dispatcher: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine").finish()
    }
}

impl RealtimeEngine {
    /// Creates the engine and starts the dispatch loop. Must be called
    /// from within a Tokio runtime.
    pub fn new(realtime: &RealtimeConfig, chat: &ChatConfig) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        let log = Arc::new(MessageLog::from_config(chat));
        let metrics = Arc::new(HubMetrics::new());
        let (hub, dispatcher) = BroadcastHub::spawn(
            Arc::clone(&log),
            realtime,
            Arc::clone(&metrics),
            shutdown_tx.subscribe(),
        );
        let chat = Arc::new(ChatService::new(hub.clone(), Arc::clone(&log), chat.clone()));

        info!("Real-time engine initialized");

        Self {
            hub,
            chat,
            log,
            metrics,
            shutdown_tx,
            dispatcher: Mutex::new(Some(dispatcher)),
        }
    }

    /// Stops the dispatch loop and closes every subscriber. Safe to call
    /// more than once.
    pub async fn shutdown(&self) -> Result<(), AppError> {
        info!("Shutting down real-time engine");

        let _ = self.shutdown_tx.send(());

        if let Some(task) = self.dispatcher.lock().await.take() {
            task.await
                .map_err(|e| AppError::internal(format!("Dispatch loop failed: {e}")))?;
        }

        info!("Real-time engine shut down");
        Ok(())
    }
}
