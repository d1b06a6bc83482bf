//! # sharehub-core
//!
//! Core crate for ShareHub. Contains configuration schemas, typed
//! identifiers, the storage collaborator trait, and the unified error
//! system.
//!
//! This crate has **no** internal dependencies on other ShareHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
