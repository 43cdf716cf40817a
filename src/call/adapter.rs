//! Call engine adapter — the single point of contact with the vendor
//! RTC engine. No UI concerns live here.
//!
//! The adapter exclusively owns the engine handle. Lifecycle:
//! Uninitialized → Initialized → Joined → Left/Destroyed. Double-join is
//! rejected; leave and destroy are tolerant no-ops when there is nothing
//! to leave or destroy.

use tokio::sync::mpsc;

use super::engine::{
    ChannelProfile, ClientRole, EngineEvent, EngineFactory, JoinOptions, RtcEngine,
};
use super::{CallError, CallMode};

pub struct EngineAdapter {
    factory: EngineFactory,
    engine: Option<Box<dyn RtcEngine>>,
    events_tx: mpsc::UnboundedSender<EngineEvent>,
    initialized: bool,
    current_channel: Option<String>,
    current_mode: Option<CallMode>,
}

impl EngineAdapter {
    /// Build an adapter and the receiving end of its event stream.
    ///
    /// No engine exists until [`initialize`](Self::initialize) runs.
    pub fn new(factory: EngineFactory) -> (Self, mpsc::UnboundedReceiver<EngineEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        (
            Self {
                factory,
                engine: None,
                events_tx,
                initialized: false,
                current_channel: None,
                current_mode: None,
            },
            events_rx,
        )
    }

    /// Create and initialize the engine. Idempotent: a second call on a
    /// live adapter is a success no-op.
    ///
    /// Fails with [`CallError::SetupRequired`] when no application id is
    /// configured. On success the single event-handler set is registered,
    /// forwarding join-success, user-joined, user-offline, leave and
    /// error events (plus quality and connection-state) to the session.
    pub async fn initialize(&mut self, app_id: &str) -> Result<(), CallError> {
        if self.initialized {
            tracing::debug!("RTC engine already initialized");
            return Ok(());
        }
        if app_id.trim().is_empty() {
            return Err(CallError::SetupRequired);
        }

        let mut engine = (self.factory)();
        engine.initialize(app_id).await?;
        engine.register_event_handler(self.events_tx.clone());

        self.engine = Some(engine);
        self.initialized = true;
        tracing::info!("RTC engine initialized");
        Ok(())
    }

    /// Join a channel in the given mode.
    ///
    /// Steps run in order — media modules, channel profile, client role,
    /// preview (video only), join — and the first failure aborts the
    /// whole join. The engine guarantees whatever rollback it does; we
    /// add none.
    pub async fn join_channel(
        &mut self,
        token: &str,
        channel: &str,
        mode: CallMode,
        uid: u32,
    ) -> Result<(), CallError> {
        if let Some(current) = &self.current_channel {
            return Err(CallError::AlreadyInChannel(current.clone()));
        }
        let engine = self.engine.as_mut().ok_or(CallError::NotInitialized)?;

        match mode {
            CallMode::Video => engine.enable_video().await?,
            CallMode::Audio => {
                engine.enable_audio().await?;
                engine.disable_video().await?;
            }
        }
        engine
            .set_channel_profile(ChannelProfile::Communication)
            .await?;
        engine.set_client_role(ClientRole::Broadcaster).await?;
        if mode == CallMode::Video {
            engine.start_preview().await?;
        }
        let options = JoinOptions {
            client_role: ClientRole::Broadcaster,
        };
        tracing::debug!("Joining {} as {:?} (uid {})", channel, options.client_role, uid);
        engine.join_channel(token, channel, uid, options).await?;

        self.current_channel = Some(channel.to_string());
        self.current_mode = Some(mode);
        tracing::info!("Joined {} channel: {}", mode.as_str(), channel);
        Ok(())
    }

    /// Leave the current channel. No-op when none is joined; failures
    /// are logged, never raised.
    pub async fn leave_channel(&mut self) {
        if self.current_channel.is_none() {
            return;
        }
        let Some(engine) = self.engine.as_mut() else {
            return;
        };

        if self.current_mode == Some(CallMode::Video) {
            if let Err(e) = engine.stop_preview().await {
                tracing::warn!("Failed to stop preview: {}", e);
            }
        }
        if let Err(e) = engine.leave_channel().await {
            tracing::warn!("Failed to leave channel: {}", e);
        }

        self.current_channel = None;
        self.current_mode = None;
        tracing::info!("Left channel");
    }

    /// Mute or unmute the local audio stream. Non-fatal: failures are
    /// logged only.
    pub async fn toggle_local_audio(&mut self, muted: bool) {
        if let Some(engine) = self.engine.as_mut() {
            if let Err(e) = engine.mute_local_audio_stream(muted).await {
                tracing::warn!("Failed to toggle audio: {}", e);
            }
        }
    }

    /// Enable or disable the local video stream. Non-fatal.
    pub async fn toggle_local_video(&mut self, enabled: bool) {
        if let Some(engine) = self.engine.as_mut() {
            if let Err(e) = engine.mute_local_video_stream(!enabled).await {
                tracing::warn!("Failed to toggle video: {}", e);
            }
        }
    }

    /// Flip between front and rear cameras. Non-fatal.
    pub async fn switch_camera(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            if let Err(e) = engine.switch_camera().await {
                tracing::warn!("Failed to switch camera: {}", e);
            }
        }
    }

    /// Route audio to the speakerphone or the earpiece. Non-fatal.
    pub async fn enable_speakerphone(&mut self, enabled: bool) {
        if let Some(engine) = self.engine.as_mut() {
            if let Err(e) = engine.set_enable_speakerphone(enabled).await {
                tracing::warn!("Failed to enable speakerphone: {}", e);
            }
        }
    }

    /// Leave the channel if joined, release the engine handle, and reset
    /// the initialized flag. Safe to call any number of times.
    pub async fn destroy(&mut self) {
        if self.engine.is_none() {
            return;
        }
        self.leave_channel().await;
        if let Some(mut engine) = self.engine.take() {
            engine.release().await;
        }
        self.initialized = false;
        tracing::info!("RTC engine destroyed");
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn current_channel(&self) -> Option<&str> {
        self.current_channel.as_deref()
    }
}
