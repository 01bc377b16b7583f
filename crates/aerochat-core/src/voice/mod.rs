//! Voice channel boundary types.
//!
//! # Module Structure
//!
//! - `event`: Inbound event and outbound command unions (`VoiceEvent`,
//!   `VoiceCommand`)
//! - `transport`: Duplex transport traits (`VoiceTransport`,
//!   `VoiceConnection`, `VoiceSessionConfig`)

mod event;
mod transport;

// Re-export public API
pub use event::{VoiceCommand, VoiceEvent};
pub use transport::{VoiceConnection, VoiceSessionConfig, VoiceTransport};
