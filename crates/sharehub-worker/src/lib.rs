//! Scheduled maintenance tasks for ShareHub.
//!
//! This crate provides:
//! - A cron scheduler for periodic maintenance tasks
//! - The expired share link sweep

pub mod jobs;
pub mod scheduler;

pub use jobs::ShareSweepJob;
pub use scheduler::CronScheduler;
