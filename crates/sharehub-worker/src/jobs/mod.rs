//! Built-in maintenance jobs.

pub mod sweep;

pub use sweep::{ShareSweepJob, SweepReport};
