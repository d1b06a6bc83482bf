//! Subscriber handle held by the connection layer.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use sharehub_core::types::id::SubscriberId;

use super::command::HubCommand;
use crate::message::types::HubEvent;

/// Lifecycle of a subscriber. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum SubscriberState {
    /// Registered, history replay in progress.
    Connecting = 0,
    /// Eligible for live broadcasts.
    Active = 1,
    /// Removed from the live set.
    Closed = 2,
}

/// State shared between the dispatch loop and the handle.
#[derive(Debug)]
pub(crate) struct StateCell(AtomicU8);

impl StateCell {
    pub(crate) fn new(state: SubscriberState) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    pub(crate) fn get(&self) -> SubscriberState {
        match self.0.load(Ordering::Acquire) {
            0 => SubscriberState::Connecting,
            1 => SubscriberState::Active,
            _ => SubscriberState::Closed,
        }
    }

    /// Moves forward only; a closed subscriber never reopens.
    pub(crate) fn advance(&self, next: SubscriberState) {
        self.0.fetch_max(next as u8, Ordering::AcqRel);
    }
}

/// A live subscription to the hub.
///
/// The connection layer pumps events out of [`recv`](Self::recv) onto its
/// own wire. Dropping the handle disconnects the subscriber.
#[derive(Debug)]
pub struct SubscriberHandle {
    id: SubscriberId,
    receiver: mpsc::Receiver<HubEvent>,
    state: Arc<StateCell>,
    replayed: usize,
    commands: mpsc::UnboundedSender<HubCommand>,
}

impl SubscriberHandle {
    pub(crate) fn new(
        id: SubscriberId,
        receiver: mpsc::Receiver<HubEvent>,
        state: Arc<StateCell>,
        replayed: usize,
        commands: mpsc::UnboundedSender<HubCommand>,
    ) -> Self {
        Self {
            id,
            receiver,
            state,
            replayed,
            commands,
        }
    }

    /// Subscriber identifier.
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SubscriberState {
        self.state.get()
    }

    /// Number of history messages queued ahead of live traffic.
    pub fn replayed(&self) -> usize {
        self.replayed
    }

    /// Waits for the next event. `None` once the subscriber is closed and
    /// its queue is drained.
    pub async fn recv(&mut self) -> Option<HubEvent> {
        self.receiver.recv().await
    }

    /// Takes the next queued event without waiting.
    pub fn try_recv(&mut self) -> Option<HubEvent> {
        self.receiver.try_recv().ok()
    }

    /// Drains every event queued right now.
    pub fn drain(&mut self) -> Vec<HubEvent> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }

    /// Disconnects explicitly. Same as dropping the handle.
    pub fn disconnect(self) {}
}

impl Drop for SubscriberHandle {
    fn drop(&mut self) {
        self.receiver.close();
        let _ = self.commands.send(HubCommand::Disconnect { id: self.id });
    }
}
