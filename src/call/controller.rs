//! Call session controller — screen-level orchestration.
//!
//! Bridges the engine adapter to observable UI state: participant
//! bookkeeping, connection and network-quality tracking, local media
//! toggles, and the wall-clock call timer. One controller per call
//! screen; the screen owns the event loop and feeds engine events in.

use std::collections::HashSet;

use tokio::sync::mpsc;

use super::adapter::EngineAdapter;
use super::engine::{EngineEvent, EngineFactory};
use super::{channel_name, CallError, CallMode};

/// Session health as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Connected,
    Disconnected,
}

impl ConnectionState {
    /// Map a vendor connection-state code: 3 is connected, 1 is
    /// connecting, everything else reads as disconnected.
    pub fn from_code(code: i32) -> Self {
        match code {
            3 => ConnectionState::Connected,
            1 => ConnectionState::Connecting,
            _ => ConnectionState::Disconnected,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Connecting => "Connecting...",
            ConnectionState::Connected => "Connected",
            ConnectionState::Disconnected => "Disconnected",
        }
    }
}

/// Signal quality derived from the engine's per-direction scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkQuality {
    Excellent,
    Good,
    Poor,
    Bad,
    /// No quality event received yet.
    Unknown,
}

impl NetworkQuality {
    /// Bucket the worse of the two directions: ≤2 excellent, ≤3 good,
    /// ≤4 poor, anything above bad.
    pub fn from_scores(tx: u8, rx: u8) -> Self {
        match tx.max(rx) {
            0..=2 => NetworkQuality::Excellent,
            3 => NetworkQuality::Good,
            4 => NetworkQuality::Poor,
            _ => NetworkQuality::Bad,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NetworkQuality::Excellent => "Excellent",
            NetworkQuality::Good => "Good",
            NetworkQuality::Poor => "Poor",
            NetworkQuality::Bad => "Bad",
            NetworkQuality::Unknown => "-",
        }
    }
}

/// Everything a call screen needs to start a session.
pub struct CallParams {
    /// RTC application id from config; `None` means setup is required.
    pub app_id: Option<String>,
    /// Channel token, empty on app-id-only projects.
    pub token: String,
    pub group_id: u64,
    pub group_name: String,
    /// Local numeric uid; 0 lets the engine assign one.
    pub local_uid: u32,
    pub mode: CallMode,
}

pub struct CallController {
    adapter: EngineAdapter,
    app_id: String,
    token: String,
    channel: String,
    group_name: String,
    local_uid: u32,
    mode: CallMode,

    joined: bool,
    remote_uids: HashSet<u32>,
    pub connection: ConnectionState,
    pub quality: NetworkQuality,
    pub is_muted: bool,
    pub is_video_on: bool,
    pub is_speaker_on: bool,
    pub duration_secs: u64,
    /// Last engine error, shown as a status line.
    pub last_error: Option<String>,
}

/// Local media toggles flip regardless of whether the engine accepted
/// the change; device/UI divergence after a failed call is accepted.
fn optimistic(flag: bool) -> bool {
    !flag
}

impl CallController {
    /// Validate params and build the controller plus its event stream.
    ///
    /// Fails with [`CallError::SetupRequired`] before any engine is
    /// constructed when the application id is missing, so the screen can
    /// surface a setup alert instead of attempting a join.
    pub fn new(
        factory: EngineFactory,
        params: CallParams,
    ) -> Result<(Self, mpsc::UnboundedReceiver<EngineEvent>), CallError> {
        let app_id = params
            .app_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(CallError::SetupRequired)?
            .to_string();

        let (adapter, events_rx) = EngineAdapter::new(factory);
        Ok((
            Self {
                adapter,
                app_id,
                token: params.token,
                channel: channel_name(params.group_id),
                group_name: params.group_name,
                local_uid: params.local_uid,
                mode: params.mode,
                joined: false,
                remote_uids: HashSet::new(),
                connection: ConnectionState::Connecting,
                quality: NetworkQuality::Unknown,
                is_muted: false,
                is_video_on: params.mode == CallMode::Video,
                is_speaker_on: false,
                duration_secs: 0,
                last_error: None,
            },
            events_rx,
        ))
    }

    /// Initialize the engine and request the channel join.
    ///
    /// On failure the screen stays in Connecting and shows the error;
    /// there is no automatic retry.
    pub async fn connect(&mut self) -> Result<(), CallError> {
        self.adapter.initialize(&self.app_id).await?;
        self.adapter
            .join_channel(&self.token, &self.channel, self.mode, self.local_uid)
            .await
    }

    /// Apply one engine event to the session state.
    ///
    /// Events may arrive in any order, including before the local join
    /// is confirmed; all of them are treated as valid signals.
    pub fn handle_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::JoinSuccess { channel, elapsed_ms } => {
                tracing::info!("Join channel success: {} ({}ms)", channel, elapsed_ms);
                self.joined = true;
            }
            EngineEvent::UserJoined { uid } => {
                tracing::debug!("User joined: {}", uid);
                self.remote_uids.insert(uid);
                // A remote participant implies a live call
                self.connection = ConnectionState::Connected;
            }
            EngineEvent::UserOffline { uid, reason } => {
                tracing::debug!("User offline: {} ({:?})", uid, reason);
                self.remote_uids.remove(&uid);
            }
            EngineEvent::LeaveChannel { channel } => {
                tracing::info!("Left channel: {}", channel);
                self.remote_uids.clear();
                self.joined = false;
            }
            EngineEvent::Error { code, message } => {
                tracing::warn!("Engine error {}: {}", code, message);
                self.last_error = Some(message);
            }
            EngineEvent::NetworkQuality { tx, rx } => {
                self.quality = NetworkQuality::from_scores(tx, rx);
            }
            EngineEvent::ConnectionStateChanged { state } => {
                self.connection = ConnectionState::from_code(state);
            }
        }
    }

    /// One second of wall-clock call time. Purely presentational.
    pub fn tick(&mut self) {
        self.duration_secs += 1;
    }

    pub async fn toggle_mute(&mut self) {
        let next = optimistic(self.is_muted);
        self.adapter.toggle_local_audio(next).await;
        self.is_muted = next;
    }

    pub async fn toggle_video(&mut self) {
        let next = optimistic(self.is_video_on);
        self.adapter.toggle_local_video(next).await;
        self.is_video_on = next;
    }

    pub async fn toggle_speaker(&mut self) {
        let next = optimistic(self.is_speaker_on);
        self.adapter.enable_speakerphone(next).await;
        self.is_speaker_on = next;
    }

    pub async fn switch_camera(&mut self) {
        self.adapter.switch_camera().await;
    }

    /// Tear down the session: leave the channel and release the engine.
    /// Runs on every exit path; failures are logged, never surfaced.
    pub async fn teardown(&mut self) {
        self.remote_uids.clear();
        self.joined = false;
        self.adapter.destroy().await;
    }

    /// Everyone on the call, the local user included — never below 1.
    pub fn participant_count(&self) -> usize {
        1 + self.remote_uids.len()
    }

    pub fn is_joined(&self) -> bool {
        self.joined
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn group_name(&self) -> &str {
        &self.group_name
    }

    /// Call duration as MM:SS.
    pub fn format_duration(&self) -> String {
        format_duration(self.duration_secs)
    }
}

pub fn format_duration(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::super::engine::testing::{calls, mock_factory};
    use super::super::engine::OfflineReason;
    use super::*;

    fn params(mode: CallMode) -> CallParams {
        CallParams {
            app_id: Some("app-id".to_string()),
            token: String::new(),
            group_id: 12,
            group_name: "Youth Group".to_string(),
            local_uid: 7,
            mode,
        }
    }

    fn controller(mode: CallMode) -> CallController {
        let (factory, _state) = mock_factory();
        CallController::new(factory, params(mode)).unwrap().0
    }

    #[test]
    fn test_quality_bucket_tracks_worse_direction() {
        for tx in 0..=8u8 {
            for rx in 0..=8u8 {
                let expected = match tx.max(rx) {
                    0..=2 => NetworkQuality::Excellent,
                    3 => NetworkQuality::Good,
                    4 => NetworkQuality::Poor,
                    _ => NetworkQuality::Bad,
                };
                assert_eq!(
                    NetworkQuality::from_scores(tx, rx),
                    expected,
                    "tx={} rx={}",
                    tx,
                    rx
                );
            }
        }
    }

    #[test]
    fn test_connection_code_mapping() {
        assert_eq!(ConnectionState::from_code(3), ConnectionState::Connected);
        assert_eq!(ConnectionState::from_code(1), ConnectionState::Connecting);
        for other in [0, 2, 4, 5, -1, 99] {
            assert_eq!(
                ConnectionState::from_code(other),
                ConnectionState::Disconnected
            );
        }
    }

    #[test]
    fn test_participant_count_never_below_one() {
        let mut ctl = controller(CallMode::Audio);
        assert_eq!(ctl.participant_count(), 1);

        // Offline events without matching joins cannot push below the floor
        for uid in [5, 6, 7] {
            ctl.handle_event(EngineEvent::UserOffline {
                uid,
                reason: OfflineReason::Quit,
            });
        }
        assert_eq!(ctl.participant_count(), 1);
    }

    #[test]
    fn test_unknown_uid_offline_leaves_count_unchanged() {
        let mut ctl = controller(CallMode::Audio);
        ctl.handle_event(EngineEvent::UserJoined { uid: 21 });
        ctl.handle_event(EngineEvent::UserJoined { uid: 22 });
        assert_eq!(ctl.participant_count(), 3);

        ctl.handle_event(EngineEvent::UserOffline {
            uid: 999,
            reason: OfflineReason::Dropped,
        });
        assert_eq!(ctl.participant_count(), 3);
    }

    #[test]
    fn test_remote_join_forces_connected() {
        let mut ctl = controller(CallMode::Video);
        assert_eq!(ctl.connection, ConnectionState::Connecting);

        ctl.handle_event(EngineEvent::UserJoined { uid: 3 });
        assert_eq!(ctl.connection, ConnectionState::Connected);
    }

    #[test]
    fn test_events_before_join_success_are_valid() {
        let mut ctl = controller(CallMode::Video);
        assert!(!ctl.is_joined());

        // Quality and roster events may beat the join acknowledgement
        ctl.handle_event(EngineEvent::NetworkQuality { tx: 4, rx: 1 });
        ctl.handle_event(EngineEvent::UserJoined { uid: 2 });
        assert_eq!(ctl.quality, NetworkQuality::Poor);
        assert_eq!(ctl.participant_count(), 2);

        ctl.handle_event(EngineEvent::JoinSuccess {
            channel: "group_12".to_string(),
            elapsed_ms: 120,
        });
        assert!(ctl.is_joined());
    }

    #[test]
    fn test_leave_event_clears_roster() {
        let mut ctl = controller(CallMode::Audio);
        ctl.handle_event(EngineEvent::UserJoined { uid: 2 });
        ctl.handle_event(EngineEvent::JoinSuccess {
            channel: "group_12".to_string(),
            elapsed_ms: 0,
        });

        ctl.handle_event(EngineEvent::LeaveChannel {
            channel: "group_12".to_string(),
        });
        assert_eq!(ctl.participant_count(), 1);
        assert!(!ctl.is_joined());
    }

    #[test]
    fn test_setup_required_without_app_id() {
        let (factory, state) = mock_factory();
        let mut p = params(CallMode::Video);
        p.app_id = None;

        let err = match CallController::new(factory, p) {
            Err(e) => e,
            Ok(_) => panic!("expected SetupRequired"),
        };
        assert!(matches!(err, CallError::SetupRequired));
        // No engine constructed, no join attempted
        assert_eq!(state.lock().unwrap().constructed, 0);
    }

    #[tokio::test]
    async fn test_connect_joins_derived_channel() {
        let (factory, state) = mock_factory();
        let (mut ctl, _rx) = CallController::new(factory, params(CallMode::Video)).unwrap();

        ctl.connect().await.unwrap();
        assert_eq!(ctl.channel(), "group_12");
        assert!(calls(&state).contains(&"join_channel".to_string()));
    }

    #[tokio::test]
    async fn test_mute_flips_even_when_engine_rejects() {
        let (factory, state) = mock_factory();
        let (mut ctl, _rx) = CallController::new(factory, params(CallMode::Audio)).unwrap();
        ctl.connect().await.unwrap();

        state.lock().unwrap().fail.insert("mute_local_audio_stream");
        assert!(!ctl.is_muted);
        ctl.toggle_mute().await;
        assert!(ctl.is_muted, "optimistic flip must apply on failure");
        ctl.toggle_mute().await;
        assert!(!ctl.is_muted);
    }

    #[tokio::test]
    async fn test_video_toggle_inverts_engine_mute_flag() {
        let (factory, state) = mock_factory();
        let (mut ctl, _rx) = CallController::new(factory, params(CallMode::Video)).unwrap();
        ctl.connect().await.unwrap();

        assert!(ctl.is_video_on);
        ctl.toggle_video().await;
        assert!(!ctl.is_video_on);
        assert!(calls(&state).contains(&"mute_local_video_stream".to_string()));
    }

    #[tokio::test]
    async fn test_teardown_while_connecting_releases_engine() {
        let (factory, state) = mock_factory();
        let (mut ctl, _rx) = CallController::new(factory, params(CallMode::Video)).unwrap();
        ctl.connect().await.unwrap();
        // No join-success event has arrived; the screen is abandoned
        assert!(!ctl.is_joined());

        ctl.teardown().await;
        let recorded = calls(&state);
        assert!(recorded.contains(&"leave_channel".to_string()));
        assert!(state.lock().unwrap().released);
    }

    #[tokio::test]
    async fn test_teardown_twice_is_safe() {
        let (factory, state) = mock_factory();
        let (mut ctl, _rx) = CallController::new(factory, params(CallMode::Audio)).unwrap();
        ctl.connect().await.unwrap();

        ctl.teardown().await;
        ctl.teardown().await;
        assert_eq!(
            calls(&state).iter().filter(|c| *c == "release").count(),
            1
        );
    }

    #[test]
    fn test_engine_error_recorded_not_fatal() {
        let mut ctl = controller(CallMode::Video);
        ctl.handle_event(EngineEvent::UserJoined { uid: 4 });
        ctl.handle_event(EngineEvent::Error {
            code: 110,
            message: "token expired".to_string(),
        });

        // The call keeps going; the message is only kept for display
        assert_eq!(ctl.last_error.as_deref(), Some("token expired"));
        assert_eq!(ctl.connection, ConnectionState::Connected);
        assert_eq!(ctl.participant_count(), 2);
    }

    #[test]
    fn test_duration_formatting() {
        assert_eq!(format_duration(0), "00:00");
        assert_eq!(format_duration(59), "00:59");
        assert_eq!(format_duration(60), "01:00");
        assert_eq!(format_duration(61 * 60 + 5), "61:05");
    }

    #[test]
    fn test_timer_tick_is_one_second() {
        let mut ctl = controller(CallMode::Audio);
        for _ in 0..90 {
            ctl.tick();
        }
        assert_eq!(ctl.format_duration(), "01:30");
    }
}
