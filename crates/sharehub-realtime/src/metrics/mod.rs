//! Broadcast hub metrics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::hub::HubError;

/// Hub-level metrics counters.
#[derive(Debug, Default)]
pub struct HubMetrics {
    /// Total subscribers ever connected
    pub connections_total: AtomicU64,
    /// Subscribers currently live
    pub connections_active: AtomicU64,
    /// Broadcast passes run
    pub broadcasts_total: AtomicU64,
    /// Events enqueued to subscribers, replay included
    pub deliveries_total: AtomicU64,
    /// Subscribers dropped for a full queue
    pub dropped_overflow: AtomicU64,
    /// Subscribers dropped for a closed transport
    pub dropped_closed: AtomicU64,
    /// Chat messages published
    pub chat_messages_total: AtomicU64,
}

impl HubMetrics {
    /// Create new zeroed metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new subscriber
    pub fn record_connect(&self) {
        self.connections_total.fetch_add(1, Ordering::Relaxed);
        self.connections_active.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a subscriber leaving the live set
    pub fn record_disconnect(&self) {
        let _ = self
            .connections_active
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1));
    }

    /// Record one broadcast pass reaching `delivered` subscribers
    pub fn record_broadcast(&self, delivered: usize) {
        self.broadcasts_total.fetch_add(1, Ordering::Relaxed);
        self.record_deliveries(delivered);
    }

    /// Record events enqueued outside a broadcast pass
    pub fn record_deliveries(&self, count: usize) {
        self.deliveries_total
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Record a published chat message
    pub fn record_chat(&self) {
        self.chat_messages_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a subscriber evicted by the hub
    pub fn record_drop(&self, cause: HubError) {
        match cause {
            HubError::QueueOverflow => self.dropped_overflow.fetch_add(1, Ordering::Relaxed),
            HubError::TransportClosed | HubError::Stopped => {
                self.dropped_closed.fetch_add(1, Ordering::Relaxed)
            }
        };
    }

    /// Get a snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            connections_total: self.connections_total.load(Ordering::Relaxed),
            connections_active: self.connections_active.load(Ordering::Relaxed),
            broadcasts_total: self.broadcasts_total.load(Ordering::Relaxed),
            deliveries_total: self.deliveries_total.load(Ordering::Relaxed),
            dropped_overflow: self.dropped_overflow.load(Ordering::Relaxed),
            dropped_closed: self.dropped_closed.load(Ordering::Relaxed),
            chat_messages_total: self.chat_messages_total.load(Ordering::Relaxed),
        }
    }
}

/// Serializable metrics snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Total subscribers ever connected
    pub connections_total: u64,
    /// Subscribers currently live
    pub connections_active: u64,
    /// Broadcast passes run
    pub broadcasts_total: u64,
    /// Events enqueued to subscribers
    pub deliveries_total: u64,
    /// Subscribers dropped for a full queue
    pub dropped_overflow: u64,
    /// Subscribers dropped for a closed transport
    pub dropped_closed: u64,
    /// Chat messages published
    pub chat_messages_total: u64,
}
