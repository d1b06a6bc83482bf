//! Outbound hub event definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sharehub_core::error::AppError;
use sharehub_entity::chat::ChatMessage;

/// Events delivered to every live subscriber.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HubEvent {
    /// A chat message, live or replayed.
    Chat {
        /// The message.
        message: ChatMessage,
    },
    /// The chat log was cleared.
    Cleared {
        /// Messages dropped.
        removed: usize,
        /// System messages kept.
        retained: usize,
        /// When the clear happened.
        timestamp: DateTime<Utc>,
    },
}

impl HubEvent {
    /// Wraps a chat message.
    pub fn chat(message: ChatMessage) -> Self {
        Self::Chat { message }
    }

    /// The chat message carried, if any.
    pub fn as_chat(&self) -> Option<&ChatMessage> {
        match self {
            Self::Chat { message } => Some(message),
            Self::Cleared { .. } => None,
        }
    }

    /// Serializes the event for a text transport.
    pub fn to_json(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use sharehub_entity::chat::MessageKind;

    #[test]
    fn test_wire_shape() {
        let event = HubEvent::chat(ChatMessage {
            id: 7,
            author_id: None,
            author_name: "system".to_string(),
            body: "hello".to_string(),
            kind: MessageKind::System,
            created_at: Utc::now(),
        });
        let value: serde_json::Value = serde_json::from_str(&event.to_json().unwrap()).unwrap();
        assert_eq!(value["type"], "chat");
        assert_eq!(value["message"]["id"], 7);
        assert_eq!(value["message"]["kind"], "system");

        let cleared = HubEvent::Cleared {
            removed: 3,
            retained: 2,
            timestamp: Utc::now(),
        };
        let value = serde_json::to_value(&cleared).unwrap();
        assert_eq!(value["type"], "cleared");
        assert!(cleared.as_chat().is_none());
    }
}
