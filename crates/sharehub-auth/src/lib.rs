//! # sharehub-auth
//!
//! Credential handling for ShareHub. Identity and token issuance belong to
//! an external collaborator; this crate only hashes and verifies share
//! link passwords.

pub mod password;

pub use password::PasswordHasher;
