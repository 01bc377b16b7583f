use crate::config::VoiceProfile;
use aerochat_core::conversation::MessageRole;
use aerochat_core::error::{AerochatError, Result};
use aerochat_core::session::SessionSink;
use aerochat_core::voice::{
    VoiceCommand, VoiceConnection, VoiceEvent, VoiceSessionConfig, VoiceTransport,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Resources owned while a voice session is up.
struct ActiveVoiceSession {
    connection: Box<dyn VoiceConnection>,
    pump: JoinHandle<()>,
    cancel: CancellationToken,
    domain: String,
}

/// Bridges the real-time voice channel to the session state machine.
///
/// `VoiceChannelAdapter` is responsible for:
/// - Opening and tearing down the duplex audio session
/// - Configuring the remote model with domain-scoped instructions
/// - Pumping transcript events into the session append path
/// - Surfacing the assistant's speaking state to the UI
///
/// The adapter owns no conversation state. Transcripts go through the
/// [`SessionSink`], the same atomic update path text sends use, so the
/// session invariants hold regardless of which channel a message arrived
/// on. Resource discipline is scoped: everything acquired in `connect` is
/// released in `disconnect`, and a failure partway through `connect`
/// releases what was already acquired before the error is returned.
pub struct VoiceChannelAdapter {
    /// Transport implementation (external collaborator)
    transport: Arc<dyn VoiceTransport>,
    /// Append path into the session state machine
    sink: Arc<dyn SessionSink>,
    /// Per-domain voice instructions and knowledge-base handles
    profiles: HashMap<String, VoiceProfile>,
    /// The live session, if any; the lock also serializes connect/disconnect
    active: Mutex<Option<ActiveVoiceSession>>,
    /// Whether the outbound microphone track is muted
    muted: AtomicBool,
    /// Assistant speaking indicator (presentational only)
    speaking_tx: watch::Sender<bool>,
}

impl VoiceChannelAdapter {
    /// Creates a new adapter.
    ///
    /// # Arguments
    ///
    /// * `transport` - The real-time transport implementation
    /// * `sink` - The session append path for transcripts
    /// * `profiles` - Per-domain voice profiles
    pub fn new(
        transport: Arc<dyn VoiceTransport>,
        sink: Arc<dyn SessionSink>,
        profiles: HashMap<String, VoiceProfile>,
    ) -> Self {
        let (speaking_tx, _) = watch::channel(false);
        Self {
            transport,
            sink,
            profiles,
            active: Mutex::new(None),
            muted: AtomicBool::new(false),
            speaking_tx,
        }
    }

    /// Establishes the voice session for a domain.
    ///
    /// Idempotent: calling while already connected (or while another
    /// connect is in progress) is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `Connection` if no voice profile is configured for the
    /// domain, or if the transport fails to open, configure, or hand over
    /// its event stream. On error the adapter is fully disconnected; no
    /// partially-open connection survives.
    pub async fn connect(&self, domain: &str) -> Result<()> {
        let mut active = self.active.lock().await;
        if let Some(session) = active.as_ref() {
            tracing::debug!(
                "[VoiceChannelAdapter] Already connected to {}, ignoring connect",
                session.domain
            );
            return Ok(());
        }

        let profile = self.profiles.get(domain).ok_or_else(|| {
            AerochatError::connection(format!(
                "no voice profile configured for domain '{}'",
                domain
            ))
        })?;

        tracing::info!("[VoiceChannelAdapter] Connecting voice channel for {}", domain);

        // 1. Establish the transport (microphone, negotiation, event channel)
        let mut connection = self
            .transport
            .open(VoiceSessionConfig {
                domain: domain.to_string(),
            })
            .await?;

        // 2. Configure the remote model; release the transport on failure
        //    so no zombie connection survives
        if let Err(e) = connection
            .send(VoiceCommand::ConfigureSession {
                instructions: profile.instructions.clone(),
                knowledge_base: profile.knowledge_base.clone(),
            })
            .await
        {
            let _ = connection.close().await;
            return Err(AerochatError::connection(format!(
                "failed to configure voice session: {}",
                e
            )));
        }

        // 3. Take the event stream and start the pump
        let Some(events) = connection.take_events() else {
            let _ = connection.close().await;
            return Err(AerochatError::connection(
                "voice transport produced no event stream",
            ));
        };

        let cancel = CancellationToken::new();
        let pump = tokio::spawn(pump_events(
            events,
            self.sink.clone(),
            self.speaking_tx.clone(),
            domain.to_string(),
            cancel.clone(),
        ));

        self.muted.store(false, Ordering::SeqCst);
        *active = Some(ActiveVoiceSession {
            connection,
            pump,
            cancel,
            domain: domain.to_string(),
        });

        tracing::info!("[VoiceChannelAdapter] Voice channel connected for {}", domain);
        Ok(())
    }

    /// Tears down the voice session and releases all resources.
    ///
    /// Idempotent: calling twice, or when never connected, is a no-op.
    /// Must be invoked on component teardown regardless of exit path.
    pub async fn disconnect(&self) {
        let mut active = self.active.lock().await;
        let Some(session) = active.take() else {
            return;
        };

        tracing::info!(
            "[VoiceChannelAdapter] Disconnecting voice channel for {}",
            session.domain
        );

        session.cancel.cancel();
        let ActiveVoiceSession {
            mut connection,
            pump,
            ..
        } = session;
        if let Err(e) = connection.close().await {
            tracing::warn!("[VoiceChannelAdapter] Error closing voice transport: {}", e);
        }
        let _ = pump.await;

        let _ = self.speaking_tx.send(false);
        self.muted.store(false, Ordering::SeqCst);
    }

    /// Toggles the outbound microphone track without tearing down the
    /// session.
    ///
    /// # Returns
    ///
    /// The new muted state.
    ///
    /// # Errors
    ///
    /// Returns `Connection` when no session is up or the transport rejects
    /// the track change.
    pub async fn toggle_mute(&self) -> Result<bool> {
        let active = self.active.lock().await;
        let Some(session) = active.as_ref() else {
            return Err(AerochatError::connection("voice channel is not connected"));
        };

        let muted = !self.muted.load(Ordering::SeqCst);
        session.connection.set_microphone_enabled(!muted).await?;
        self.muted.store(muted, Ordering::SeqCst);

        tracing::debug!("[VoiceChannelAdapter] Microphone muted: {}", muted);
        Ok(muted)
    }

    /// Returns true while a voice session is up.
    pub async fn is_connected(&self) -> bool {
        self.active.lock().await.is_some()
    }

    /// Returns the domain of the live voice session, if any.
    pub async fn connected_domain(&self) -> Option<String> {
        self.active.lock().await.as_ref().map(|s| s.domain.clone())
    }

    /// Returns true if the outbound microphone track is muted.
    pub fn is_muted(&self) -> bool {
        self.muted.load(Ordering::SeqCst)
    }

    /// Returns a watch on the assistant's speaking indicator.
    pub fn speaking(&self) -> watch::Receiver<bool> {
        self.speaking_tx.subscribe()
    }
}

/// Drains transport events into the session sink until cancelled or the
/// stream closes.
async fn pump_events(
    mut events: mpsc::UnboundedReceiver<VoiceEvent>,
    sink: Arc<dyn SessionSink>,
    speaking_tx: watch::Sender<bool>,
    domain: String,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            event = events.recv() => {
                let Some(event) = event else { break };
                match event {
                    VoiceEvent::UserTranscript { transcript } => {
                        sink.append_voice_message(&domain, MessageRole::User, transcript)
                            .await;
                    }
                    VoiceEvent::AssistantTranscript { transcript } => {
                        sink.append_voice_message(&domain, MessageRole::Assistant, transcript)
                            .await;
                    }
                    VoiceEvent::SpeakingStarted => {
                        let _ = speaking_tx.send(true);
                    }
                    VoiceEvent::SpeakingStopped => {
                        let _ = speaking_tx.send(false);
                    }
                    VoiceEvent::Unknown { kind } => {
                        tracing::debug!(
                            "[VoiceChannelAdapter] Ignoring unrecognized event '{}'",
                            kind
                        );
                    }
                }
            }
        }
    }
    let _ = speaking_tx.send(false);
}

#[cfg(test)]
#[path = "adapter_test.rs"]
mod tests;
