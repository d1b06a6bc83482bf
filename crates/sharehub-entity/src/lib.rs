//! # sharehub-entity
//!
//! Domain entity models shared by the service and realtime crates.

pub mod chat;
pub mod resource;
pub mod share;

pub use chat::{ChatMessage, MessageKind};
pub use resource::ResourceHandle;
pub use share::{DeactivationReason, NewShareLink, ShareLink, ShareLinkView};
