//! Session token storage and management

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::models::User;

/// Stored backend session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    pub expires_at: Option<u64>,
}

impl StoredSession {
    pub fn new(token: String, expires_in_secs: Option<u64>) -> Self {
        let expires_at = expires_in_secs.map(|secs| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_secs()
                + secs
        });

        Self { token, expires_at }
    }

    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(exp) => {
                let now = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .unwrap()
                    .as_secs();
                // Consider expired if less than 5 minutes remaining
                now + 300 >= exp
            }
            None => false,
        }
    }
}

/// Session store trait for different storage backends
pub trait SessionStore {
    fn get_session(&self) -> Option<StoredSession>;
    fn set_session(&mut self, token: String, expires_in: Option<u64>);
    fn get_user(&self) -> Option<User>;
    fn set_user(&mut self, user: User);
    fn clear_session(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_expiry_never_expires() {
        let session = StoredSession::new("tok".into(), None);
        assert!(!session.is_expired());
    }

    #[test]
    fn test_short_expiry_counts_as_expired() {
        // Within the 5-minute refresh margin
        let session = StoredSession::new("tok".into(), Some(60));
        assert!(session.is_expired());
    }

    #[test]
    fn test_long_expiry_is_valid() {
        let session = StoredSession::new("tok".into(), Some(3600));
        assert!(!session.is_expired());
    }
}
