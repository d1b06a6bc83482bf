//! # sharehub-realtime
//!
//! Real-time chat fan-out for ShareHub. Provides:
//!
//! - A broadcast hub driven by a single dispatch loop
//! - Bounded per-subscriber queues with history replay on connect
//! - Slow or dead subscriber eviction
//! - The chat service exposed to transports
//! - Hub metrics

pub mod chat;
pub mod hub;
pub mod message;
pub mod metrics;
pub mod server;

pub use chat::service::{ChatService, SendMessageRequest};
pub use hub::{BroadcastHub, HubError, SubscriberHandle, SubscriberState};
pub use message::types::HubEvent;
pub use metrics::{HubMetrics, MetricsSnapshot};
pub use server::RealtimeEngine;
