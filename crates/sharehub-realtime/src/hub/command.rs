//! Commands submitted to the dispatch loop.

use tokio::sync::oneshot;

use sharehub_core::types::id::{SubscriberId, UserId};
use sharehub_entity::chat::{ChatMessage, MessageKind};
use sharehub_service::chat::ClearOutcome;

use super::handle::SubscriberHandle;
use crate::message::types::HubEvent;

/// Work item for the dispatch loop.
#[derive(Debug)]
pub enum HubCommand {
    /// Register a subscriber and replay history to it.
    Connect {
        reply: oneshot::Sender<SubscriberHandle>,
    },
    /// Fan an event out to every live subscriber.
    Broadcast {
        event: HubEvent,
        reply: oneshot::Sender<usize>,
    },
    /// Append a chat message to the log, then fan it out.
    PublishChat {
        author_id: Option<UserId>,
        author_name: String,
        body: String,
        kind: MessageKind,
        reply: oneshot::Sender<ChatMessage>,
    },
    /// Clear the log, then announce it.
    ClearLog {
        retain_system_messages: bool,
        reply: oneshot::Sender<ClearOutcome>,
    },
    /// Remove a subscriber. Unknown ids are ignored.
    Disconnect { id: SubscriberId },
    /// Report the live subscriber count.
    SubscriberCount { reply: oneshot::Sender<usize> },
}
