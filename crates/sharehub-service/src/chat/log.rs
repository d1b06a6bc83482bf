//! Append-only chat log with a monotonically increasing id counter.

use chrono::Utc;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::info;

use sharehub_core::config::ChatConfig;
use sharehub_core::types::id::UserId;
use sharehub_entity::chat::{ChatMessage, MessageKind};

/// Result of clearing the log.
#[derive(Debug, Clone, Serialize)]
pub struct ClearOutcome {
    /// Messages dropped.
    pub removed: usize,
    /// System messages kept.
    pub retained: usize,
    /// Notice injected into a wiped log.
    pub notice: Option<ChatMessage>,
}

#[derive(Debug)]
struct LogState {
    messages: Vec<ChatMessage>,
    next_id: u64,
}

impl Default for LogState {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            next_id: 1,
        }
    }
}

impl LogState {
    fn push(
        &mut self,
        author_id: Option<UserId>,
        author_name: String,
        body: String,
        kind: MessageKind,
    ) -> ChatMessage {
        let message = ChatMessage {
            id: self.next_id,
            author_id,
            author_name,
            body,
            kind,
            created_at: Utc::now(),
        };
        self.next_id += 1;
        self.messages.push(message.clone());
        message
    }
}

/// Chat history shared by every request and the broadcast hub.
///
/// Guarded by a single reader/writer lock: snapshots run concurrently,
/// appends and clears are exclusive.
#[derive(Debug)]
pub struct MessageLog {
    state: RwLock<LogState>,
    /// Author name on system notices.
    system_name: String,
    /// Notice injected by a full wipe.
    clear_notice: String,
}

impl Default for MessageLog {
    fn default() -> Self {
        let config = ChatConfig::default();
        Self::empty(config.system_name, config.clear_notice)
    }
}

impl MessageLog {
    fn empty(system_name: String, clear_notice: String) -> Self {
        Self::with_state(LogState::default(), system_name, clear_notice)
    }

    fn with_state(state: LogState, system_name: String, clear_notice: String) -> Self {
        Self {
            state: RwLock::new(state),
            system_name,
            clear_notice,
        }
    }

    /// Builds a log from chat settings, seeding the welcome notice if one
    /// is configured.
    pub fn from_config(config: &ChatConfig) -> Self {
        let mut state = LogState::default();
        if let Some(welcome) = config.welcome_message.as_deref().filter(|w| !w.is_empty()) {
            state.push(
                None,
                config.system_name.clone(),
                welcome.to_string(),
                MessageKind::System,
            );
        }
        Self::with_state(state, config.system_name.clone(), config.clear_notice.clone())
    }

    /// Appends a message and returns the stored value.
    pub async fn append(
        &self,
        author_id: Option<UserId>,
        author_name: impl Into<String>,
        body: impl Into<String>,
        kind: MessageKind,
    ) -> ChatMessage {
        let mut state = self.state.write().await;
        state.push(author_id, author_name.into(), body.into(), kind)
    }

    /// Appends a system notice.
    pub async fn append_system(&self, body: impl Into<String>) -> ChatMessage {
        self.append(None, self.system_name.clone(), body, MessageKind::System)
            .await
    }

    /// Copy of the log in insertion order.
    pub async fn snapshot(&self) -> Vec<ChatMessage> {
        self.state.read().await.messages.clone()
    }

    /// Number of stored messages.
    pub async fn len(&self) -> usize {
        self.state.read().await.messages.len()
    }

    /// Whether the log is empty.
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.messages.is_empty()
    }

    /// Id of the newest message, if any.
    pub async fn last_id(&self) -> Option<u64> {
        self.state.read().await.messages.last().map(|m| m.id)
    }

    /// Clears the log.
    ///
    /// With `retain_system_messages` the system notices survive and the id
    /// counter keeps running. Otherwise the log restarts at id 1 with a
    /// single clear notice.
    pub async fn clear(&self, retain_system_messages: bool) -> ClearOutcome {
        let mut state = self.state.write().await;
        let before = state.messages.len();

        let outcome = if retain_system_messages {
            state.messages.retain(|m| m.kind.is_system());
            let retained = state.messages.len();
            ClearOutcome {
                removed: before - retained,
                retained,
                notice: None,
            }
        } else {
            state.messages.clear();
            state.next_id = 1;
            let notice = state.push(
                None,
                self.system_name.clone(),
                self.clear_notice.clone(),
                MessageKind::System,
            );
            ClearOutcome {
                removed: before,
                retained: 0,
                notice: Some(notice),
            }
        };

        info!(
            removed = outcome.removed,
            retained = outcome.retained,
            next_id = state.next_id,
            "Chat log cleared"
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;
    use std::sync::Arc;

    async fn text(log: &MessageLog, body: &str) -> ChatMessage {
        log.append(Some(UserId::new()), "alice", body, MessageKind::Text)
            .await
    }

    #[tokio::test]
    async fn test_append_assigns_increasing_ids() {
        let log = MessageLog::default();
        let a = text(&log, "one").await;
        let b = text(&log, "two").await;
        assert_eq!((a.id, b.id), (1, 2));

        let snapshot = log.snapshot().await;
        assert_eq!(snapshot, vec![a, b]);
        assert_eq!(log.last_id().await, Some(2));
    }

    #[tokio::test]
    async fn test_from_config_seeds_welcome() {
        let log = MessageLog::from_config(&ChatConfig::default());
        let snapshot = log.snapshot().await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, 1);
        assert!(snapshot[0].kind.is_system());
        assert_eq!(snapshot[0].author_name, "system");

        let config = ChatConfig {
            welcome_message: None,
            ..ChatConfig::default()
        };
        assert!(MessageLog::from_config(&config).is_empty().await);
    }

    #[tokio::test]
    async fn test_clear_retaining_system_messages() {
        let log = MessageLog::default();
        let s1 = log.append_system("first notice").await;
        text(&log, "a").await;
        text(&log, "b").await;
        let s2 = log.append_system("second notice").await;
        text(&log, "c").await;

        let outcome = log.clear(true).await;
        assert_eq!(outcome.removed, 3);
        assert_eq!(outcome.retained, 2);
        assert!(outcome.notice.is_none());

        let kept = log.snapshot().await;
        assert_eq!(kept, vec![s1.clone(), s2.clone()]);

        let next = text(&log, "after").await;
        assert!(next.id != s1.id && next.id != s2.id);
        assert_eq!(next.id, 6);
    }

    #[tokio::test]
    async fn test_clear_without_retaining_restarts_ids() {
        let log = MessageLog::default();
        log.append_system("notice").await;
        text(&log, "a").await;

        let outcome = log.clear(false).await;
        assert_eq!(outcome.removed, 2);
        let notice = outcome.notice.unwrap();
        assert_eq!(notice.id, 1);
        assert_eq!(notice.body, "Chat history was cleared");

        assert_eq!(text(&log, "fresh").await.id, 2);
        assert_eq!(log.len().await, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_get_unique_ids() {
        let log = Arc::new(MessageLog::default());
        let tasks: Vec<_> = (0..50)
            .map(|i| {
                let log = Arc::clone(&log);
                tokio::spawn(async move {
                    log.append(None, "bot", format!("m{i}"), MessageKind::Text)
                        .await
                        .id
                })
            })
            .collect();

        let ids: HashSet<u64> = futures::future::join_all(tasks)
            .await
            .into_iter()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(ids.len(), 50);

        let snapshot = log.snapshot().await;
        assert!(snapshot.windows(2).all(|w| w[0].id < w[1].id));
    }
}
