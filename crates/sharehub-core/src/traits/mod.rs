//! Core traits defined in `sharehub-core` and implemented by other crates.

pub mod catalog;

pub use catalog::ResourceCatalog;
