//! Storage-side collaborators.

pub mod catalog;

pub use catalog::MemoryResourceCatalog;
