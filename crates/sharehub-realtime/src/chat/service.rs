//! Chat service: validates input and drives the hub.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use sharehub_core::config::ChatConfig;
use sharehub_core::error::AppError;
use sharehub_core::types::id::{ResourceId, SubscriberId};
use sharehub_entity::chat::{ChatMessage, MessageKind};
use sharehub_service::chat::{ClearOutcome, MessageLog};
use sharehub_service::context::RequestContext;

use crate::hub::{BroadcastHub, SubscriberHandle};

/// Request to post a chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    /// Message text.
    pub body: String,
    /// Uploaded file the message refers to.
    #[serde(default)]
    pub attachment: Option<ResourceId>,
}

/// Chat room operations.
#[derive(Debug, Clone)]
pub struct ChatService {
    hub: BroadcastHub,
    log: Arc<MessageLog>,
    config: ChatConfig,
}

impl ChatService {
    /// Creates a new chat service.
    pub fn new(hub: BroadcastHub, log: Arc<MessageLog>, config: ChatConfig) -> Self {
        Self { hub, log, config }
    }

    /// Posts a message and broadcasts it to every live subscriber.
    ///
    /// Subscriber delivery failures never fail the send.
    pub async fn send_chat_message(
        &self,
        ctx: &RequestContext,
        req: SendMessageRequest,
    ) -> Result<ChatMessage, AppError> {
        let visible = req.body.trim();
        if visible.is_empty() {
            return Err(AppError::validation("Message body must not be empty"));
        }
        if visible.chars().count() > self.config.max_body_chars {
            return Err(AppError::validation(format!(
                "Message body exceeds {} characters",
                self.config.max_body_chars
            )));
        }

        let author_name = match ctx.username.trim() {
            "" => self.config.anonymous_name.clone(),
            name => name.to_string(),
        };
        let kind = match req.attachment {
            Some(resource_id) => MessageKind::Attachment { resource_id },
            None => MessageKind::Text,
        };

        let message = self
            .hub
            .publish_chat(Some(ctx.user_id), author_name, req.body, kind)
            .await?;

        info!(
            user_id = %ctx.user_id,
            message_id = message.id,
            "Chat message sent"
        );
        Ok(message)
    }

    /// The chat history in order.
    pub async fn list_messages(&self) -> Vec<ChatMessage> {
        self.log.snapshot().await
    }

    /// Clears the history and notifies live subscribers.
    pub async fn clear_messages(
        &self,
        ctx: &RequestContext,
        retain_system_messages: bool,
    ) -> Result<ClearOutcome, AppError> {
        let outcome = self.hub.clear_log(retain_system_messages).await?;
        info!(
            user_id = %ctx.user_id,
            removed = outcome.removed,
            retained = outcome.retained,
            "Chat history cleared"
        );
        Ok(outcome)
    }

    /// Opens a subscription; its queue starts with the current history.
    pub async fn subscribe(&self) -> Result<SubscriberHandle, AppError> {
        Ok(self.hub.connect().await?)
    }

    /// Closes a subscription. Unknown or already closed ids are ignored.
    pub fn unsubscribe(&self, id: SubscriberId) {
        self.hub.disconnect(id);
    }
}
