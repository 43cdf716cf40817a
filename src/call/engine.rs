//! Vendor RTC engine boundary.
//!
//! The vendor SDK is modeled as an object-safe async trait plus a typed
//! event stream, so session code never touches vendor types directly and
//! tests can drive the session with synthetic events.

use async_trait::async_trait;
use tokio::sync::mpsc;

/// Failure reported by the engine for a single operation.
#[derive(Debug, Clone, thiserror::Error)]
#[error("engine error {code}: {message}")]
pub struct EngineError {
    pub code: i32,
    pub message: String,
}

impl EngineError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Channel profile requested from the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum ChannelProfile {
    /// Peer-style call where every participant both sends and receives.
    Communication,
    /// One-to-many broadcast.
    LiveBroadcasting,
}

/// Role of the local client within a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum ClientRole {
    Broadcaster,
    Audience,
}

/// Options passed alongside a join request.
#[derive(Debug, Clone, Copy)]
pub struct JoinOptions {
    pub client_role: ClientRole,
}

/// Why a remote participant left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum OfflineReason {
    Quit,
    Dropped,
    BecameAudience,
}

/// Event pushed asynchronously by the engine.
///
/// Delivery order is whatever the vendor provides; consumers must not
/// assume join-success arrives before user-joined or network-quality.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum EngineEvent {
    JoinSuccess { channel: String, elapsed_ms: u32 },
    UserJoined { uid: u32 },
    UserOffline { uid: u32, reason: OfflineReason },
    LeaveChannel { channel: String },
    Error { code: i32, message: String },
    NetworkQuality { tx: u8, rx: u8 },
    ConnectionStateChanged { state: i32 },
}

/// The vendor engine surface used by the session layer.
///
/// Production bindings wrap the native SDK; [`crate::call::loopback`]
/// provides an in-process stand-in.
#[async_trait]
pub trait RtcEngine: Send {
    async fn initialize(&mut self, app_id: &str) -> Result<(), EngineError>;

    /// Register the single event-handler set. Events flow through the
    /// sender for the lifetime of the engine instance.
    fn register_event_handler(&mut self, events: mpsc::UnboundedSender<EngineEvent>);

    async fn enable_video(&mut self) -> Result<(), EngineError>;
    async fn disable_video(&mut self) -> Result<(), EngineError>;
    async fn enable_audio(&mut self) -> Result<(), EngineError>;
    async fn set_channel_profile(&mut self, profile: ChannelProfile) -> Result<(), EngineError>;
    async fn set_client_role(&mut self, role: ClientRole) -> Result<(), EngineError>;
    async fn start_preview(&mut self) -> Result<(), EngineError>;
    async fn stop_preview(&mut self) -> Result<(), EngineError>;

    async fn join_channel(
        &mut self,
        token: &str,
        channel: &str,
        uid: u32,
        options: JoinOptions,
    ) -> Result<(), EngineError>;
    async fn leave_channel(&mut self) -> Result<(), EngineError>;

    async fn mute_local_audio_stream(&mut self, muted: bool) -> Result<(), EngineError>;
    async fn mute_local_video_stream(&mut self, muted: bool) -> Result<(), EngineError>;
    async fn switch_camera(&mut self) -> Result<(), EngineError>;
    async fn set_enable_speakerphone(&mut self, enabled: bool) -> Result<(), EngineError>;

    /// Release the native handle. Infallible by contract; the engine is
    /// unusable afterwards.
    async fn release(&mut self);
}

/// Constructor for engine instances, injected so call screens and tests
/// each own their engine rather than sharing a process-wide singleton.
pub type EngineFactory = Box<dyn Fn() -> Box<dyn RtcEngine> + Send>;

#[cfg(test)]
pub(crate) mod testing {
    //! Recording mock engine shared by adapter and controller tests.

    use super::*;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    pub struct MockState {
        /// Operation names in call order.
        pub calls: Vec<String>,
        /// Operations that should fail when invoked.
        pub fail: HashSet<&'static str>,
        /// How many engine instances the factory has built.
        pub constructed: u32,
        pub released: bool,
    }

    pub type SharedState = Arc<Mutex<MockState>>;

    pub struct MockEngine {
        state: SharedState,
        pub events: Option<mpsc::UnboundedSender<EngineEvent>>,
    }

    impl MockEngine {
        fn record(&self, op: &'static str) -> Result<(), EngineError> {
            let mut state = self.state.lock().unwrap();
            state.calls.push(op.to_string());
            if state.fail.contains(op) {
                return Err(EngineError::new(-1, format!("{} rejected", op)));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl RtcEngine for MockEngine {
        async fn initialize(&mut self, _app_id: &str) -> Result<(), EngineError> {
            self.record("initialize")
        }

        fn register_event_handler(&mut self, events: mpsc::UnboundedSender<EngineEvent>) {
            self.state
                .lock()
                .unwrap()
                .calls
                .push("register_event_handler".to_string());
            self.events = Some(events);
        }

        async fn enable_video(&mut self) -> Result<(), EngineError> {
            self.record("enable_video")
        }

        async fn disable_video(&mut self) -> Result<(), EngineError> {
            self.record("disable_video")
        }

        async fn enable_audio(&mut self) -> Result<(), EngineError> {
            self.record("enable_audio")
        }

        async fn set_channel_profile(
            &mut self,
            _profile: ChannelProfile,
        ) -> Result<(), EngineError> {
            self.record("set_channel_profile")
        }

        async fn set_client_role(&mut self, _role: ClientRole) -> Result<(), EngineError> {
            self.record("set_client_role")
        }

        async fn start_preview(&mut self) -> Result<(), EngineError> {
            self.record("start_preview")
        }

        async fn stop_preview(&mut self) -> Result<(), EngineError> {
            self.record("stop_preview")
        }

        async fn join_channel(
            &mut self,
            _token: &str,
            _channel: &str,
            _uid: u32,
            _options: JoinOptions,
        ) -> Result<(), EngineError> {
            self.record("join_channel")
        }

        async fn leave_channel(&mut self) -> Result<(), EngineError> {
            self.record("leave_channel")
        }

        async fn mute_local_audio_stream(&mut self, _muted: bool) -> Result<(), EngineError> {
            self.record("mute_local_audio_stream")
        }

        async fn mute_local_video_stream(&mut self, _muted: bool) -> Result<(), EngineError> {
            self.record("mute_local_video_stream")
        }

        async fn switch_camera(&mut self) -> Result<(), EngineError> {
            self.record("switch_camera")
        }

        async fn set_enable_speakerphone(&mut self, _enabled: bool) -> Result<(), EngineError> {
            self.record("set_enable_speakerphone")
        }

        async fn release(&mut self) {
            let mut state = self.state.lock().unwrap();
            state.calls.push("release".to_string());
            state.released = true;
        }
    }

    /// Build a factory producing mock engines that share one state.
    pub fn mock_factory() -> (EngineFactory, SharedState) {
        let state: SharedState = Arc::default();
        let shared = state.clone();
        let factory: EngineFactory = Box::new(move || {
            let mut st = shared.lock().unwrap();
            st.constructed += 1;
            Box::new(MockEngine {
                state: shared.clone(),
                events: None,
            }) as Box<dyn RtcEngine>
        });
        (factory, state)
    }

    /// Calls recorded so far.
    pub fn calls(state: &SharedState) -> Vec<String> {
        state.lock().unwrap().calls.clone()
    }
}
