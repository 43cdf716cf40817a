//! Configuration and credential storage

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::auth::{SessionStore, StoredSession};
use crate::models::User;

/// Default backend API base URL
pub const DEFAULT_API_BASE: &str = "https://api.flock.church/api";

/// Application configuration
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Stored backend session token (from login/register/google exchange)
    pub session: Option<StoredSession>,
    /// Authenticated user record (from last login)
    pub user: Option<User>,
    /// Backend API base URL override
    pub api_base_url: Option<String>,
    /// RTC application id issued by the vendor console; calls refuse to
    /// start without it
    pub rtc_app_id: Option<String>,
    /// Optional RTC channel token (empty string sent when absent)
    pub rtc_token: Option<String>,
}

impl Config {
    /// Get config directory path
    fn config_dir() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("church", "flock", "flock-cli")
            .context("Could not determine config directory")?;
        Ok(proj_dirs.config_dir().to_path_buf())
    }

    /// Get config file path
    fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from disk
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir).context("Failed to create config directory")?;

        let path = Self::config_path()?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, content).context("Failed to write config file")?;

        // Set restrictive permissions on config file (contains the session token)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&path, perms).context("Failed to set config permissions")?;
        }

        Ok(())
    }

    /// Backend base URL, honoring the config override.
    pub fn api_base_url(&self) -> String {
        self.api_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
    }

    /// RTC application id, if configured.
    pub fn rtc_app_id(&self) -> Option<String> {
        self.rtc_app_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    }

    /// RTC channel token; the engine accepts an empty token on app-id-only
    /// projects.
    pub fn rtc_token(&self) -> String {
        self.rtc_token.clone().unwrap_or_default()
    }
}

impl SessionStore for Config {
    fn get_session(&self) -> Option<StoredSession> {
        self.session.clone()
    }

    fn set_session(&mut self, token: String, expires_in: Option<u64>) {
        self.session = Some(StoredSession::new(token, expires_in));
    }

    fn get_user(&self) -> Option<User> {
        self.user.clone()
    }

    fn set_user(&mut self, user: User) {
        self.user = Some(user);
    }

    fn clear_session(&mut self) {
        self.session = None;
        self.user = None;
    }
}
