//! Events pushed to subscribers.

pub mod types;
