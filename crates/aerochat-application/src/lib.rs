//! Application layer for Aerochat.
//!
//! This crate provides the per-domain session state machine and the use
//! case facade that coordinates it with the voice channel adapter and the
//! collaborator backends.

pub mod chat_usecase;
pub mod session;

pub use chat_usecase::ChatUseCase;
pub use session::{SessionService, SessionStore};
