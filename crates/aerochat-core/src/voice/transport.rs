//! Voice transport traits.
//!
//! The real-time audio layer (microphone capture, transport negotiation,
//! raw audio) is an external collaborator. The session core only sees this
//! duplex abstraction: an opaque inbound event stream and an opaque
//! outbound command stream.

use super::event::{VoiceCommand, VoiceEvent};
use crate::error::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Parameters for opening a voice session.
#[derive(Debug, Clone)]
pub struct VoiceSessionConfig {
    /// Tag of the knowledge domain this session is scoped to.
    pub domain: String,
}

/// An open duplex voice connection.
///
/// Acquired from [`VoiceTransport::open`]; owns the microphone track and the
/// control sub-channel. `close` must release every acquired resource and be
/// safe to call more than once.
#[async_trait]
pub trait VoiceConnection: Send + Sync {
    /// Takes the inbound event stream.
    ///
    /// Returns `None` if the stream was already taken; the adapter takes it
    /// exactly once, right after opening.
    fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<VoiceEvent>>;

    /// Sends a control message to the remote end.
    async fn send(&self, command: VoiceCommand) -> Result<()>;

    /// Enables or disables the outbound microphone track without tearing
    /// down the session.
    async fn set_microphone_enabled(&self, enabled: bool) -> Result<()>;

    /// Tears down the transport and releases all resources.
    async fn close(&mut self) -> Result<()>;
}

/// Factory for voice connections.
#[async_trait]
pub trait VoiceTransport: Send + Sync {
    /// Establishes an audio session: acquires the microphone, negotiates the
    /// transport, and opens the control sub-channel.
    ///
    /// # Errors
    ///
    /// Returns `Connection` on microphone permission denial, negotiation
    /// failure, or remote rejection. Implementations must release any
    /// partially-acquired resources before returning the error.
    async fn open(&self, config: VoiceSessionConfig) -> Result<Box<dyn VoiceConnection>>;
}
