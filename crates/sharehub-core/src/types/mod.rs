//! Core type definitions used across the ShareHub workspace.

pub mod id;

pub use id::*;
