//! Broadcast hub: subscriber membership, fan-out, and chat replay.
//!
//! All membership changes, chat appends, and log clears run on one
//! dispatch loop. Producers only submit commands.

pub mod broadcast;
mod command;
pub mod dispatcher;
pub mod handle;

pub use broadcast::BroadcastHub;
pub use dispatcher::HubError;
pub use handle::{SubscriberHandle, SubscriberState};
