//! Voice channel adapter.

mod adapter;

pub use adapter::VoiceChannelAdapter;
