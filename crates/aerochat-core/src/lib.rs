//! Core domain layer for Aerochat.
//!
//! This crate contains the domain models, error type, domain registry, and
//! the collaborator contracts (conversation store, answer service, voice
//! transport) that the application and interaction layers implement.

pub mod answer;
pub mod conversation;
pub mod domain;
pub mod error;
pub mod session;
pub mod voice;

// Re-export common error type
pub use error::AerochatError;
