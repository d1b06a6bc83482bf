//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use sharehub_auth::password::PasswordHasher;
use sharehub_core::config::AppConfig;
use sharehub_core::traits::ResourceCatalog;
use sharehub_core::types::id::UserId;
use sharehub_entity::resource::ResourceHandle;
use sharehub_realtime::{ChatService, RealtimeEngine, SendMessageRequest};
use sharehub_service::context::RequestContext;
use sharehub_service::share::{AccessGate, LinkService, MemoryShareRegistry, ShareService};
use sharehub_service::storage::MemoryResourceCatalog;

/// Test application context
pub struct TestApp {
    /// Share link operations
    pub shares: Arc<ShareService>,
    /// Stored resources
    pub catalog: Arc<MemoryResourceCatalog>,
    /// Hub and chat
    pub engine: Arc<RealtimeEngine>,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// Create a new test application with default settings
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a test application with an empty chat log
    pub fn without_welcome() -> Self {
        let mut config = AppConfig::default();
        config.chat.welcome_message = None;
        Self::with_config(config)
    }

    /// Create a test application from explicit settings
    pub fn with_config(config: AppConfig) -> Self {
        let hasher = Arc::new(PasswordHasher::new());
        let registry = Arc::new(MemoryShareRegistry::new(
            AccessGate::new(Arc::clone(&hasher)),
            Arc::new(LinkService::new(config.share.token_bytes)),
            config.share.max_token_attempts,
        ));
        let catalog = Arc::new(MemoryResourceCatalog::new());
        let shares = Arc::new(ShareService::new(
            registry,
            Arc::clone(&catalog) as Arc<dyn ResourceCatalog<ResourceHandle>>,
            hasher,
            config.share.clone(),
        ));
        let engine = Arc::new(RealtimeEngine::new(&config.realtime, &config.chat));

        Self {
            shares,
            catalog,
            engine,
            config,
        }
    }

    /// Chat operations
    pub fn chat(&self) -> &ChatService {
        &self.engine.chat
    }

    /// An authenticated caller
    pub fn user(&self, name: &str) -> RequestContext {
        RequestContext::new(UserId::new(), name)
    }

    /// Store a file and return its handle
    pub fn store_file(&self, name: &str) -> ResourceHandle {
        self.catalog
            .insert(ResourceHandle::new(name, 1024, format!("uploads/{name}")))
    }

    /// Post a text message as `ctx`
    pub async fn say(&self, ctx: &RequestContext, body: &str) -> sharehub_entity::chat::ChatMessage {
        self.chat()
            .send_chat_message(
                ctx,
                SendMessageRequest {
                    body: body.to_string(),
                    attachment: None,
                },
            )
            .await
            .expect("send chat message")
    }
}
