//! # sharehub-service
//!
//! Business logic for ShareHub: the share link access gate and registry,
//! the share service exposed to transports, the chat message log, and an
//! in-memory resource catalog.

pub mod chat;
pub mod context;
pub mod share;
pub mod storage;

pub use chat::{ClearOutcome, MessageLog};
pub use context::RequestContext;
pub use share::{
    AccessDenied, AccessGate, AccessGrant, CreateShareRequest, LinkService, MemoryShareRegistry,
    ShareLinkRegistry, ShareService,
};
pub use storage::MemoryResourceCatalog;
