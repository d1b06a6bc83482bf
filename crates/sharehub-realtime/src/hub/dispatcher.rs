//! The dispatch loop: sole owner of the live subscriber set.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use sharehub_core::error::AppError;
use sharehub_core::types::id::SubscriberId;
use sharehub_service::chat::MessageLog;

use super::command::HubCommand;
use super::handle::{StateCell, SubscriberHandle, SubscriberState};
use crate::message::types::HubEvent;
use crate::metrics::HubMetrics;

/// Hub-side failures.
///
/// Delivery failures only ever remove the affected subscriber; they are
/// never returned to the broadcaster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HubError {
    /// The subscriber's queue was full.
    #[error("subscriber queue overflow")]
    QueueOverflow,
    /// The subscriber's receiving side is gone.
    #[error("subscriber transport closed")]
    TransportClosed,
    /// The dispatch loop is no longer running.
    #[error("broadcast hub is stopped")]
    Stopped,
}

impl From<HubError> for AppError {
    fn from(err: HubError) -> Self {
        match err {
            HubError::Stopped => AppError::service_unavailable(err.to_string()),
            HubError::QueueOverflow | HubError::TransportClosed => {
                AppError::internal(err.to_string())
            }
        }
    }
}

/// A live subscriber as the loop sees it.
#[derive(Debug)]
struct Subscriber {
    sender: mpsc::Sender<HubEvent>,
    state: Arc<StateCell>,
    connected_at: DateTime<Utc>,
}

/// Serialized owner of hub state.
pub(crate) struct Dispatcher {
    log: Arc<MessageLog>,
    subscribers: HashMap<SubscriberId, Subscriber>,
    queue_capacity: usize,
    metrics: Arc<HubMetrics>,
    commands: mpsc::UnboundedReceiver<HubCommand>,
    /// Embedded in every handle so dropping it disconnects.
    handle_commands: mpsc::UnboundedSender<HubCommand>,
    shutdown: broadcast::Receiver<()>,
}

impl Dispatcher {
    pub(crate) fn new(
        log: Arc<MessageLog>,
        queue_capacity: usize,
        metrics: Arc<HubMetrics>,
        commands: mpsc::UnboundedReceiver<HubCommand>,
        handle_commands: mpsc::UnboundedSender<HubCommand>,
        shutdown: broadcast::Receiver<()>,
    ) -> Self {
        Self {
            log,
            subscribers: HashMap::new(),
            queue_capacity: queue_capacity.max(1),
            metrics,
            commands,
            handle_commands,
            shutdown,
        }
    }

    /// Runs until shutdown is signalled.
    pub(crate) async fn run(mut self) {
        info!(queue_capacity = self.queue_capacity, "Broadcast hub started");

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => self.handle(command).await,
                    None => break,
                },
                _ = self.shutdown.recv() => break,
            }
        }

        self.close_all();
        info!("Broadcast hub stopped");
    }

    async fn handle(&mut self, command: HubCommand) {
        match command {
            HubCommand::Connect { reply } => {
                let handle = self.connect().await;
                // A caller that gave up drops the returned handle, which
                // queues its own disconnect.
                let _ = reply.send(handle);
            }
            HubCommand::Broadcast { event, reply } => {
                let delivered = self.fan_out(&event);
                let _ = reply.send(delivered);
            }
            HubCommand::PublishChat {
                author_id,
                author_name,
                body,
                kind,
                reply,
            } => {
                let message = self.log.append(author_id, author_name, body, kind).await;
                self.metrics.record_chat();
                let delivered = self.fan_out(&HubEvent::chat(message.clone()));
                debug!(message_id = message.id, delivered, "Chat message published");
                let _ = reply.send(message);
            }
            HubCommand::ClearLog {
                retain_system_messages,
                reply,
            } => {
                let outcome = self.log.clear(retain_system_messages).await;
                self.fan_out(&HubEvent::Cleared {
                    removed: outcome.removed,
                    retained: outcome.retained,
                    timestamp: Utc::now(),
                });
                if let Some(notice) = &outcome.notice {
                    self.fan_out(&HubEvent::chat(notice.clone()));
                }
                let _ = reply.send(outcome);
            }
            HubCommand::Disconnect { id } => {
                if let Some(subscriber) = self.subscribers.remove(&id) {
                    subscriber.state.advance(SubscriberState::Closed);
                    self.metrics.record_disconnect();
                    info!(
                        subscriber_id = %id,
                        connected_for_ms = (Utc::now() - subscriber.connected_at).num_milliseconds(),
                        remaining = self.subscribers.len(),
                        "Subscriber disconnected"
                    );
                }
            }
            HubCommand::SubscriberCount { reply } => {
                let _ = reply.send(self.subscribers.len());
            }
        }
    }

    /// Registers a subscriber whose queue already holds the full history.
    ///
    /// The queue is sized for the replay plus the live capacity, and the
    /// subscriber joins the live set only after the replay is enqueued.
    async fn connect(&mut self) -> SubscriberHandle {
        let id = SubscriberId::new();
        let history = self.log.snapshot().await;
        let (sender, receiver) = mpsc::channel(self.queue_capacity + history.len());
        let state = Arc::new(StateCell::new(SubscriberState::Connecting));

        let mut replayed = 0;
        for message in history {
            if sender.try_send(HubEvent::chat(message)).is_err() {
                break;
            }
            replayed += 1;
        }

        state.advance(SubscriberState::Active);
        self.subscribers.insert(
            id,
            Subscriber {
                sender,
                state: Arc::clone(&state),
                connected_at: Utc::now(),
            },
        );
        self.metrics.record_connect();
        self.metrics.record_deliveries(replayed);

        info!(
            subscriber_id = %id,
            replayed,
            live = self.subscribers.len(),
            "Subscriber connected"
        );

        SubscriberHandle::new(id, receiver, state, replayed, self.handle_commands.clone())
    }

    /// Enqueues `event` for every live subscriber and evicts the ones that
    /// cannot take it. Returns how many received it.
    fn fan_out(&mut self, event: &HubEvent) -> usize {
        let mut delivered = 0;
        let mut failed = Vec::new();

        for (id, subscriber) in &self.subscribers {
            match subscriber.sender.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    failed.push((*id, HubError::QueueOverflow));
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    failed.push((*id, HubError::TransportClosed));
                }
            }
        }

        for (id, cause) in failed {
            self.evict(id, cause);
        }

        self.metrics.record_broadcast(delivered);
        delivered
    }

    fn evict(&mut self, id: SubscriberId, cause: HubError) {
        let Some(subscriber) = self.subscribers.remove(&id) else {
            return;
        };
        subscriber.state.advance(SubscriberState::Closed);
        self.metrics.record_disconnect();

        self.metrics.record_drop(cause);

        warn!(
            subscriber_id = %id,
            cause = %cause,
            remaining = self.subscribers.len(),
            "Subscriber dropped"
        );
    }

    fn close_all(&mut self) {
        for (_, subscriber) in self.subscribers.drain() {
            subscriber.state.advance(SubscriberState::Closed);
            self.metrics.record_disconnect();
        }
    }
}
