//! Public face of the hub: a cheap, cloneable command submitter.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;

use sharehub_core::config::RealtimeConfig;
use sharehub_core::types::id::{SubscriberId, UserId};
use sharehub_entity::chat::{ChatMessage, MessageKind};
use sharehub_service::chat::{ClearOutcome, MessageLog};

use super::command::HubCommand;
use super::dispatcher::{Dispatcher, HubError};
use super::handle::SubscriberHandle;
use crate::message::types::HubEvent;
use crate::metrics::HubMetrics;

/// Handle for submitting work to the dispatch loop.
#[derive(Debug, Clone)]
pub struct BroadcastHub {
    commands: mpsc::UnboundedSender<HubCommand>,
    metrics: Arc<HubMetrics>,
}

impl BroadcastHub {
    /// Spawns the dispatch loop on the current runtime.
    ///
    /// The loop stops when `shutdown` fires; the returned task completes
    /// once every subscriber has been closed.
    pub fn spawn(
        log: Arc<MessageLog>,
        config: &RealtimeConfig,
        metrics: Arc<HubMetrics>,
        shutdown: broadcast::Receiver<()>,
    ) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let dispatcher = Dispatcher::new(
            log,
            config.subscriber_queue_capacity,
            Arc::clone(&metrics),
            rx,
            tx.clone(),
            shutdown,
        );
        let task = tokio::spawn(dispatcher.run());

        (
            Self {
                commands: tx,
                metrics,
            },
            task,
        )
    }

    /// Hub metrics.
    pub fn metrics(&self) -> &Arc<HubMetrics> {
        &self.metrics
    }

    fn submit(&self, command: HubCommand) -> Result<(), HubError> {
        self.commands.send(command).map_err(|_| HubError::Stopped)
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> HubCommand,
    ) -> Result<T, HubError> {
        let (reply, response) = oneshot::channel();
        self.submit(build(reply))?;
        response.await.map_err(|_| HubError::Stopped)
    }

    /// Registers a new subscriber. Its queue starts with the current chat
    /// history, ahead of any live event.
    pub async fn connect(&self) -> Result<SubscriberHandle, HubError> {
        self.request(|reply| HubCommand::Connect { reply }).await
    }

    /// Sends `event` to every live subscriber and returns how many took it.
    pub async fn broadcast(&self, event: HubEvent) -> Result<usize, HubError> {
        self.request(|reply| HubCommand::Broadcast { event, reply })
            .await
    }

    /// Appends a message to the chat log and broadcasts it in one step.
    pub async fn publish_chat(
        &self,
        author_id: Option<UserId>,
        author_name: String,
        body: String,
        kind: MessageKind,
    ) -> Result<ChatMessage, HubError> {
        self.request(|reply| HubCommand::PublishChat {
            author_id,
            author_name,
            body,
            kind,
            reply,
        })
        .await
    }

    /// Clears the chat log and announces it to live subscribers.
    pub async fn clear_log(&self, retain_system_messages: bool) -> Result<ClearOutcome, HubError> {
        self.request(|reply| HubCommand::ClearLog {
            retain_system_messages,
            reply,
        })
        .await
    }

    /// Removes a subscriber. Idempotent.
    pub fn disconnect(&self, id: SubscriberId) {
        let _ = self.submit(HubCommand::Disconnect { id });
    }

    /// Number of live subscribers.
    pub async fn subscriber_count(&self) -> Result<usize, HubError> {
        self.request(|reply| HubCommand::SubscriberCount { reply })
            .await
    }
}
