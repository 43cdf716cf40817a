//! Group call sessions over the vendor RTC engine.
//!
//! The engine itself (media transport, codecs) is an external collaborator
//! behind the [`engine::RtcEngine`] trait; this module owns the session
//! lifecycle around it: initialize, join, local media toggles, participant
//! and quality bookkeeping, teardown.

pub mod adapter;
pub mod controller;
pub mod engine;
pub mod loopback;

use self::engine::EngineError;

/// Media mode requested for a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallMode {
    Audio,
    Video,
}

impl CallMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallMode::Audio => "audio",
            CallMode::Video => "video",
        }
    }
}

/// Errors from call setup and join.
///
/// Toggle, leave, and destroy failures never surface here; they are
/// logged where they happen and the call continues.
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    #[error("no RTC application id configured")]
    SetupRequired,
    #[error("RTC engine not initialized")]
    NotInitialized,
    #[error("already in channel {0}")]
    AlreadyInChannel(String),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Channel shared by every participant of a group call.
///
/// The name is the wire-level identifier passed to the engine; all
/// clients of the same group must derive the same string.
pub fn channel_name(group_id: u64) -> String {
    format!("group_{}", group_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_name_is_deterministic() {
        assert_eq!(channel_name(0), "group_0");
        assert_eq!(channel_name(42), "group_42");
        assert_eq!(channel_name(u64::MAX), format!("group_{}", u64::MAX));
        // Same id, same name, every time
        assert_eq!(channel_name(7), channel_name(7));
    }
}
