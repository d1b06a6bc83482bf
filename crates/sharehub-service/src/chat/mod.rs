//! Chat message log.

pub mod log;

pub use log::{ClearOutcome, MessageLog};
