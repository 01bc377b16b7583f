use super::*;
use std::sync::Mutex as StdMutex;
use std::sync::atomic::AtomicUsize;
use std::time::Duration;
use tokio::time::timeout;

// Shared recorder for everything the mock transport observes
#[derive(Default)]
struct TransportLog {
    opened: AtomicUsize,
    closed: AtomicUsize,
    commands: StdMutex<Vec<VoiceCommand>>,
    mic_states: StdMutex<Vec<bool>>,
    event_tx: StdMutex<Option<mpsc::UnboundedSender<VoiceEvent>>>,
}

impl TransportLog {
    fn event_sender(&self) -> mpsc::UnboundedSender<VoiceEvent> {
        self.event_tx.lock().unwrap().clone().expect("transport opened")
    }
}

// Mock VoiceTransport for testing
struct MockTransport {
    log: Arc<TransportLog>,
    fail_open: AtomicBool,
    fail_configure: AtomicBool,
}

impl MockTransport {
    fn new() -> (Arc<Self>, Arc<TransportLog>) {
        let log = Arc::new(TransportLog::default());
        let transport = Arc::new(Self {
            log: log.clone(),
            fail_open: AtomicBool::new(false),
            fail_configure: AtomicBool::new(false),
        });
        (transport, log)
    }
}

#[async_trait::async_trait]
impl VoiceTransport for MockTransport {
    async fn open(&self, _config: VoiceSessionConfig) -> Result<Box<dyn VoiceConnection>> {
        if self.fail_open.load(Ordering::SeqCst) {
            return Err(AerochatError::connection("microphone permission denied"));
        }
        self.log.opened.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = mpsc::unbounded_channel();
        *self.log.event_tx.lock().unwrap() = Some(tx);
        Ok(Box::new(MockConnection {
            log: self.log.clone(),
            events: Some(rx),
            fail_send: self.fail_configure.load(Ordering::SeqCst),
        }))
    }
}

// Mock VoiceConnection for testing
struct MockConnection {
    log: Arc<TransportLog>,
    events: Option<mpsc::UnboundedReceiver<VoiceEvent>>,
    fail_send: bool,
}

#[async_trait::async_trait]
impl VoiceConnection for MockConnection {
    fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<VoiceEvent>> {
        self.events.take()
    }

    async fn send(&self, command: VoiceCommand) -> Result<()> {
        if self.fail_send {
            return Err(AerochatError::connection("control channel rejected"));
        }
        self.log.commands.lock().unwrap().push(command);
        Ok(())
    }

    async fn set_microphone_enabled(&self, enabled: bool) -> Result<()> {
        self.log.mic_states.lock().unwrap().push(enabled);
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.log.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// Mock SessionSink recording every append
#[derive(Default)]
struct MockSink {
    appended: StdMutex<Vec<(String, MessageRole, String)>>,
}

#[async_trait::async_trait]
impl SessionSink for MockSink {
    async fn append_voice_message(&self, domain: &str, role: MessageRole, content: String) {
        self.appended
            .lock()
            .unwrap()
            .push((domain.to_string(), role, content));
    }
}

fn profiles() -> HashMap<String, VoiceProfile> {
    HashMap::from([(
        "a320".to_string(),
        VoiceProfile {
            instructions: "You are an A320 systems expert.".to_string(),
            knowledge_base: "kb-a320".to_string(),
        },
    )])
}

fn adapter_with(
    transport: Arc<MockTransport>,
) -> (VoiceChannelAdapter, Arc<MockSink>) {
    let sink = Arc::new(MockSink::default());
    let adapter = VoiceChannelAdapter::new(transport, sink.clone(), profiles());
    (adapter, sink)
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    timeout(Duration::from_secs(1), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

#[tokio::test]
async fn test_connect_is_idempotent() {
    let (transport, log) = MockTransport::new();
    let (adapter, _sink) = adapter_with(transport);

    adapter.connect("a320").await.unwrap();
    adapter.connect("a320").await.unwrap();

    assert_eq!(log.opened.load(Ordering::SeqCst), 1);
    let commands = log.commands.lock().unwrap();
    assert_eq!(commands.len(), 1);
    let VoiceCommand::ConfigureSession {
        instructions,
        knowledge_base,
    } = &commands[0];
    assert!(instructions.contains("A320"));
    assert_eq!(knowledge_base, "kb-a320");
}

#[tokio::test]
async fn test_connect_without_profile_fails() {
    let (transport, log) = MockTransport::new();
    let (adapter, _sink) = adapter_with(transport);

    let err = adapter.connect("b747").await.unwrap_err();

    assert!(err.is_connection());
    assert!(!adapter.is_connected().await);
    assert_eq!(log.opened.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_disconnect_is_idempotent() {
    let (transport, log) = MockTransport::new();
    let (adapter, _sink) = adapter_with(transport);

    // never connected: still a no-op
    adapter.disconnect().await;
    assert!(!adapter.is_connected().await);

    adapter.connect("a320").await.unwrap();
    adapter.disconnect().await;
    adapter.disconnect().await;

    assert!(!adapter.is_connected().await);
    assert_eq!(log.closed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_open_failure_leaves_disconnected() {
    let (transport, log) = MockTransport::new();
    let (adapter, _sink) = adapter_with(transport.clone());

    transport.fail_open.store(true, Ordering::SeqCst);
    let err = adapter.connect("a320").await.unwrap_err();
    assert!(err.is_connection());
    assert!(!adapter.is_connected().await);
    assert_eq!(log.closed.load(Ordering::SeqCst), 0);

    // a later attempt succeeds once the transport recovers
    transport.fail_open.store(false, Ordering::SeqCst);
    adapter.connect("a320").await.unwrap();
    assert!(adapter.is_connected().await);
}

#[tokio::test]
async fn test_configure_failure_releases_the_transport() {
    let (transport, log) = MockTransport::new();
    let (adapter, _sink) = adapter_with(transport.clone());

    transport.fail_configure.store(true, Ordering::SeqCst);
    let err = adapter.connect("a320").await.unwrap_err();

    assert!(err.is_connection());
    assert!(!adapter.is_connected().await);
    // the half-open connection was closed before the error returned
    assert_eq!(log.closed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_transcripts_flow_into_the_sink() {
    let (transport, log) = MockTransport::new();
    let (adapter, sink) = adapter_with(transport);

    adapter.connect("a320").await.unwrap();
    let events = log.event_sender();

    events
        .send(VoiceEvent::UserTranscript {
            transcript: "request descent".to_string(),
        })
        .unwrap();
    events
        .send(VoiceEvent::Unknown {
            kind: "keepalive".to_string(),
        })
        .unwrap();
    events
        .send(VoiceEvent::AssistantTranscript {
            transcript: "descent approved".to_string(),
        })
        .unwrap();

    wait_until(|| sink.appended.lock().unwrap().len() == 2).await;

    let appended = sink.appended.lock().unwrap();
    assert_eq!(
        appended[0],
        ("a320".to_string(), MessageRole::User, "request descent".to_string())
    );
    assert_eq!(
        appended[1],
        (
            "a320".to_string(),
            MessageRole::Assistant,
            "descent approved".to_string()
        )
    );
}

#[tokio::test]
async fn test_speaking_indicator_follows_events() {
    let (transport, log) = MockTransport::new();
    let (adapter, _sink) = adapter_with(transport);

    adapter.connect("a320").await.unwrap();
    let mut speaking = adapter.speaking();
    assert!(!*speaking.borrow());

    let events = log.event_sender();
    events.send(VoiceEvent::SpeakingStarted).unwrap();
    timeout(Duration::from_secs(1), speaking.changed())
        .await
        .unwrap()
        .unwrap();
    assert!(*speaking.borrow_and_update());

    events.send(VoiceEvent::SpeakingStopped).unwrap();
    timeout(Duration::from_secs(1), speaking.changed())
        .await
        .unwrap()
        .unwrap();
    assert!(!*speaking.borrow_and_update());
}

#[tokio::test]
async fn test_disconnect_resets_speaking_indicator() {
    let (transport, log) = MockTransport::new();
    let (adapter, _sink) = adapter_with(transport);

    adapter.connect("a320").await.unwrap();
    let mut speaking = adapter.speaking();

    log.event_sender().send(VoiceEvent::SpeakingStarted).unwrap();
    timeout(Duration::from_secs(1), speaking.changed())
        .await
        .unwrap()
        .unwrap();

    adapter.disconnect().await;
    assert!(!*speaking.borrow());
}

#[tokio::test]
async fn test_toggle_mute_flips_the_microphone_track() {
    let (transport, log) = MockTransport::new();
    let (adapter, _sink) = adapter_with(transport);

    assert!(adapter.toggle_mute().await.unwrap_err().is_connection());

    adapter.connect("a320").await.unwrap();
    assert!(!adapter.is_muted());

    assert!(adapter.toggle_mute().await.unwrap());
    assert!(adapter.is_muted());
    assert!(!adapter.toggle_mute().await.unwrap());
    assert!(!adapter.is_muted());

    // mute disables the track, unmute re-enables it
    assert_eq!(*log.mic_states.lock().unwrap(), vec![false, true]);
}
