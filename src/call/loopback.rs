//! In-process loopback engine.
//!
//! Stands in for the vendor SDK when no native binding is linked, so the
//! call screens can run the full session lifecycle on any machine. It
//! acknowledges joins, mirrors the local user back as an echo participant,
//! and emits a steady network-quality signal; it moves no media and
//! reaches no network.

use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::engine::{
    ChannelProfile, ClientRole, EngineError, EngineEvent, EngineFactory, JoinOptions,
    OfflineReason, RtcEngine,
};

/// Interval between synthetic network-quality reports.
const QUALITY_REPORT_INTERVAL: Duration = Duration::from_secs(2);

/// Vendor connection-state code for "connected".
const CONNECTION_STATE_CONNECTED: i32 = 3;

#[derive(Default)]
pub struct LoopbackEngine {
    events: Option<mpsc::UnboundedSender<EngineEvent>>,
    current_channel: Option<String>,
    /// Uid of the echo participant, assigned on join.
    echo_uid: Option<u32>,
    reporter: Option<JoinHandle<()>>,
}

impl LoopbackEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn send(&self, event: EngineEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }

    fn stop_reporter(&mut self) {
        if let Some(handle) = self.reporter.take() {
            handle.abort();
        }
    }
}

/// Factory producing loopback engines for the call screens.
pub fn loopback_factory() -> EngineFactory {
    Box::new(|| Box::new(LoopbackEngine::new()) as Box<dyn RtcEngine>)
}

#[async_trait]
impl RtcEngine for LoopbackEngine {
    async fn initialize(&mut self, _app_id: &str) -> Result<(), EngineError> {
        Ok(())
    }

    fn register_event_handler(&mut self, events: mpsc::UnboundedSender<EngineEvent>) {
        self.events = Some(events);
    }

    async fn enable_video(&mut self) -> Result<(), EngineError> {
        Ok(())
    }

    async fn disable_video(&mut self) -> Result<(), EngineError> {
        Ok(())
    }

    async fn enable_audio(&mut self) -> Result<(), EngineError> {
        Ok(())
    }

    async fn set_channel_profile(&mut self, _profile: ChannelProfile) -> Result<(), EngineError> {
        Ok(())
    }

    async fn set_client_role(&mut self, _role: ClientRole) -> Result<(), EngineError> {
        Ok(())
    }

    async fn start_preview(&mut self) -> Result<(), EngineError> {
        Ok(())
    }

    async fn stop_preview(&mut self) -> Result<(), EngineError> {
        Ok(())
    }

    async fn join_channel(
        &mut self,
        _token: &str,
        channel: &str,
        uid: u32,
        _options: JoinOptions,
    ) -> Result<(), EngineError> {
        if let Some(current) = &self.current_channel {
            return Err(EngineError::new(
                17,
                format!("already in channel {}", current),
            ));
        }
        self.current_channel = Some(channel.to_string());
        // 0 asks the engine to assign a uid
        let echo_uid = if uid == 0 { 1 } else { uid };
        self.echo_uid = Some(echo_uid);

        self.send(EngineEvent::JoinSuccess {
            channel: channel.to_string(),
            elapsed_ms: 0,
        });
        self.send(EngineEvent::ConnectionStateChanged {
            state: CONNECTION_STATE_CONNECTED,
        });
        self.send(EngineEvent::UserJoined { uid: echo_uid });

        if let Some(tx) = self.events.clone() {
            self.stop_reporter();
            self.reporter = Some(tokio::spawn(async move {
                let mut interval = tokio::time::interval(QUALITY_REPORT_INTERVAL);
                interval.tick().await; // skip the immediate tick
                loop {
                    interval.tick().await;
                    if tx
                        .send(EngineEvent::NetworkQuality { tx: 1, rx: 1 })
                        .is_err()
                    {
                        break;
                    }
                }
            }));
        }
        Ok(())
    }

    async fn leave_channel(&mut self) -> Result<(), EngineError> {
        self.stop_reporter();
        if let Some(uid) = self.echo_uid.take() {
            self.send(EngineEvent::UserOffline {
                uid,
                reason: OfflineReason::Quit,
            });
        }
        if let Some(channel) = self.current_channel.take() {
            self.send(EngineEvent::LeaveChannel { channel });
        }
        Ok(())
    }

    async fn mute_local_audio_stream(&mut self, _muted: bool) -> Result<(), EngineError> {
        Ok(())
    }

    async fn mute_local_video_stream(&mut self, _muted: bool) -> Result<(), EngineError> {
        Ok(())
    }

    async fn switch_camera(&mut self) -> Result<(), EngineError> {
        Ok(())
    }

    async fn set_enable_speakerphone(&mut self, _enabled: bool) -> Result<(), EngineError> {
        Ok(())
    }

    async fn release(&mut self) {
        self.stop_reporter();
        self.events = None;
        self.current_channel = None;
        self.echo_uid = None;
    }
}

#[cfg(test)]
mod tests {
    use super::super::adapter::EngineAdapter;
    use super::super::CallMode;
    use super::*;

    #[tokio::test]
    async fn test_join_acknowledges_on_event_stream() {
        let (mut adapter, mut events) = EngineAdapter::new(loopback_factory());
        adapter.initialize("app-id").await.unwrap();
        adapter
            .join_channel("", "group_1", CallMode::Audio, 0)
            .await
            .unwrap();

        match events.recv().await {
            Some(EngineEvent::JoinSuccess { channel, .. }) => assert_eq!(channel, "group_1"),
            other => panic!("Expected JoinSuccess, got {:?}", other),
        }

        adapter.destroy().await;
    }

    #[tokio::test]
    async fn test_leave_emits_leave_event() {
        let (mut adapter, mut events) = EngineAdapter::new(loopback_factory());
        adapter.initialize("app-id").await.unwrap();
        adapter
            .join_channel("", "group_2", CallMode::Audio, 0)
            .await
            .unwrap();
        adapter.leave_channel().await;

        let mut saw_leave = false;
        while let Ok(event) = events.try_recv() {
            if matches!(event, EngineEvent::LeaveChannel { .. }) {
                saw_leave = true;
            }
        }
        assert!(saw_leave);
    }

    #[tokio::test]
    async fn test_echo_participant_joins_and_leaves() {
        let (mut adapter, mut events) = EngineAdapter::new(loopback_factory());
        adapter.initialize("app-id").await.unwrap();
        adapter
            .join_channel("", "group_4", CallMode::Video, 42)
            .await
            .unwrap();

        let mut joined = None;
        while let Ok(event) = events.try_recv() {
            if let EngineEvent::UserJoined { uid } = event {
                joined = Some(uid);
            }
        }
        assert_eq!(joined, Some(42));

        adapter.leave_channel().await;
        let mut offline = None;
        while let Ok(event) = events.try_recv() {
            if let EngineEvent::UserOffline { uid, .. } = event {
                offline = Some(uid);
            }
        }
        assert_eq!(offline, Some(42));
    }

    #[tokio::test]
    async fn test_zero_uid_gets_engine_assigned_echo() {
        let (mut adapter, mut events) = EngineAdapter::new(loopback_factory());
        adapter.initialize("app-id").await.unwrap();
        adapter
            .join_channel("", "group_5", CallMode::Audio, 0)
            .await
            .unwrap();

        let mut joined = None;
        while let Ok(event) = events.try_recv() {
            if let EngineEvent::UserJoined { uid } = event {
                joined = Some(uid);
            }
        }
        // The engine picked a uid on our behalf
        assert!(matches!(joined, Some(uid) if uid != 0));
    }
}
