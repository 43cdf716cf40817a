//! Authenticated HTTP client for the Flock backend
//!
//! Wraps reqwest::Client with bearer-token injection and session
//! invalidation on 401.

use anyhow::{bail, Context, Result};

use crate::auth::SessionStore;
use crate::config::Config;
use crate::models::User;

/// Authenticated client for the backend API.
pub struct ApiClient {
    http: reqwest::Client,
    config: Config,
    base_url: String,
}

impl ApiClient {
    /// Load config and build a client. Requires a valid stored session.
    pub fn new() -> Result<Self> {
        let config = Config::load()?;

        let session = config
            .get_session()
            .context("Not signed in. Run 'flock-cli login' first.")?;
        if session.is_expired() {
            bail!("Session expired. Run 'flock-cli login'.");
        }

        let base_url = config.api_base_url();
        Ok(Self {
            http: reqwest::Client::new(),
            config,
            base_url,
        })
    }

    fn token(&self) -> Result<String> {
        let session = self
            .config
            .get_session()
            .context("Not signed in. Run 'flock-cli login' first.")?;
        Ok(session.token)
    }

    /// The authenticated user stored alongside the session.
    pub fn current_user(&self) -> Option<User> {
        self.config.get_user()
    }

    /// GET request to the backend (bearer auth).
    pub async fn get(&self, path: &str) -> Result<reqwest::Response> {
        let token = self.token()?;
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("API GET {}", url);

        let resp = self
            .http
            .get(&url)
            .bearer_auth(&token)
            .send()
            .await
            .with_context(|| format!("API GET {} failed", url))?;

        self.check_response(resp, &url).await
    }

    /// Check HTTP response status and return a clear error on failure.
    ///
    /// A 401 means the token was invalidated server-side; the stored
    /// session is cleared so the next command prompts a fresh login.
    async fn check_response(
        &self,
        resp: reqwest::Response,
        url: &str,
    ) -> Result<reqwest::Response> {
        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            if let Ok(mut config) = Config::load() {
                config.clear_session();
                if let Err(e) = config.save() {
                    tracing::warn!("Failed to clear invalidated session: {:#}", e);
                }
            }
            bail!("401 Unauthorized for {}. Session cleared -- run 'flock-cli login'.", url);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!("HTTP {} for {}: {}", status.as_u16(), url, body);
        }
        Ok(resp)
    }
}
