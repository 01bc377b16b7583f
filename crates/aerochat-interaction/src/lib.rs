//! Interaction layer for Aerochat.
//!
//! This crate implements the outward-facing collaborator contracts: the
//! HTTP client for the retrieval-augmented answer backend and the adapter
//! that bridges the real-time voice channel into the session layer, plus
//! the routing configuration both consult.

pub mod answer;
pub mod config;
pub mod voice;

pub use answer::HttpAnswerService;
pub use config::{BackendHandle, RoutingConfig, VoiceProfile};
pub use voice::VoiceChannelAdapter;
